use super::{Cents, Operation};

/// Compute the balance of a statement.
/// Balance = sum of credits - sum of debits
///
/// Folds in insertion order, so every intermediate value is a balance the
/// account actually had.
pub fn compute_balance(operations: &[Operation]) -> Cents {
    operations
        .iter()
        .fold(0, |balance, operation| balance + operation.signed_amount())
}

/// Validate that a withdrawal of `amount` leaves the balance non-negative.
/// Returns the balance after the withdrawal.
pub fn validate_withdrawal(balance: Cents, amount: Cents) -> Result<Cents, BalanceError> {
    if balance < amount {
        return Err(BalanceError::InsufficientFunds {
            balance,
            requested: amount,
        });
    }
    Ok(balance - amount)
}

/// Validate that a deposit of `amount` keeps the balance representable.
/// Returns the balance after the deposit.
pub fn validate_deposit(balance: Cents, amount: Cents) -> Result<Cents, BalanceError> {
    balance
        .checked_add(amount)
        .ok_or(BalanceError::Overflow {
            balance,
            requested: amount,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    InsufficientFunds { balance: Cents, requested: Cents },
    Overflow { balance: Cents, requested: Cents },
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::InsufficientFunds { balance, requested } => write!(
                f,
                "Withdrawal of {} cents exceeds balance of {} cents",
                requested, balance
            ),
            BalanceError::Overflow { balance, requested } => write!(
                f,
                "Deposit of {} cents would overflow balance of {} cents",
                requested, balance
            ),
        }
    }
}

impl std::error::Error for BalanceError {}
