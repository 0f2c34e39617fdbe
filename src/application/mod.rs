// Application layer - use cases and orchestration over the customer registry.

pub mod clock;
pub mod error;
pub mod service;

pub use clock::*;
pub use error::*;
pub use service::*;
