mod customer;
mod ledger;
mod money;
mod operation;
mod statement;

pub use customer::*;
pub use ledger::*;
pub use money::*;
pub use operation::*;
pub use statement::*;
