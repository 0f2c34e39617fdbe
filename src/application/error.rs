use thiserror::Error;

use crate::domain::{BalanceError, Cents};
use crate::storage::RegistryError;

/// Failures reported by [`LedgerService`](super::LedgerService).
///
/// Every variant is an expected, recoverable outcome of a single call and
/// only concerns the customer named in it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Customer already exists: {0}")]
    DuplicateCustomer(String),

    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds for customer {cpf}: balance {balance}, required {required}")]
    InsufficientFunds {
        cpf: String,
        balance: Cents,
        required: Cents,
    },

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

impl AppError {
    /// Stable identifier for the error kind, suitable for a transport layer
    /// to map onto its own status codes.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::DuplicateCustomer(_) => "duplicate_customer",
            AppError::CustomerNotFound(_) => "customer_not_found",
            AppError::InvalidAmount(_) => "invalid_amount",
            AppError::InsufficientFunds { .. } => "insufficient_funds",
            AppError::InvalidDate(_) => "invalid_date",
        }
    }

    pub(crate) fn from_balance(cpf: &str, err: BalanceError) -> Self {
        match err {
            BalanceError::InsufficientFunds { balance, requested } => AppError::InsufficientFunds {
                cpf: cpf.to_string(),
                balance,
                required: requested,
            },
            BalanceError::Overflow { .. } => AppError::InvalidAmount(err.to_string()),
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(cpf) => AppError::CustomerNotFound(cpf),
            RegistryError::Duplicate(cpf) => AppError::DuplicateCustomer(cpf),
        }
    }
}
