pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod storage;
pub mod telemetry;

pub use application::{AppError, LedgerService};
pub use domain::*;
pub use storage::CustomerRegistry;
