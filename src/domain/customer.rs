use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Statement};

pub type CustomerId = Uuid;

/// An account holder. `id` and `cpf` never change after registration;
/// the statement is owned exclusively by this customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    /// Caller-supplied natural identifier, unique across the registry
    pub cpf: String,
    pub name: String,
    pub statement: Statement,
}

impl Customer {
    pub fn new(cpf: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cpf: cpf.into(),
            name: name.into(),
            statement: Statement::new(),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn balance(&self) -> Cents {
        self.statement.balance()
    }
}
