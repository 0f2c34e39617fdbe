use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Money entering the account (deposit)
    Credit,
    /// Money leaving the account (withdrawal)
    Debit,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Credit => "credit",
            OperationType::Debit => "debit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "credit" => Some(OperationType::Credit),
            "debit" => Some(OperationType::Debit),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single credit or debit recorded on a customer's statement.
/// Operations are immutable once appended; there is no reversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Free text supplied with a deposit. Withdrawals carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Amount in cents (always positive)
    pub amount: Cents,
    /// When the operation was appended to the statement
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: OperationType,
}

impl Operation {
    fn new(kind: OperationType, amount: Cents, created_at: DateTime<Utc>) -> Self {
        assert!(amount > 0, "Operation amount must be positive");
        Self {
            description: None,
            amount,
            created_at,
            kind,
        }
    }

    pub fn credit(amount: Cents, created_at: DateTime<Utc>) -> Self {
        Self::new(OperationType::Credit, amount, created_at)
    }

    pub fn debit(amount: Cents, created_at: DateTime<Utc>) -> Self {
        Self::new(OperationType::Debit, amount, created_at)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_credit(&self) -> bool {
        self.kind == OperationType::Credit
    }

    /// Amount with the sign it contributes to the balance.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            OperationType::Credit => self.amount,
            OperationType::Debit => -self.amount,
        }
    }
}
