use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{validate_deposit, validate_withdrawal, Cents, Customer, Operation};
use crate::storage::CustomerRegistry;

use super::{AppError, Clock, SystemClock};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI session, HTTP layer, tests).
///
/// The service owns its registry; share it between callers through an
/// `Arc<LedgerService>`.
#[derive(Debug)]
pub struct LedgerService {
    registry: CustomerRegistry,
    clock: Arc<dyn Clock>,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerService {
    /// Create an empty ledger stamping operations with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: CustomerRegistry::new(),
            clock,
        }
    }

    // ========================
    // Account operations
    // ========================

    /// Register a new customer with an empty statement.
    pub fn create_account(&self, cpf: &str, name: &str) -> Result<Customer, AppError> {
        match self.registry.create(cpf, name) {
            Ok(customer) => {
                info!(cpf, id = %customer.id, "account created");
                Ok(customer)
            }
            Err(err) => {
                warn!(cpf, "account creation rejected: {err}");
                Err(err.into())
            }
        }
    }

    /// Get a snapshot of a customer, statement included.
    pub fn get_account(&self, cpf: &str) -> Result<Customer, AppError> {
        debug!(cpf, "get account");
        Ok(self.registry.find(cpf)?)
    }

    /// Change the customer's display name.
    pub fn rename_account(&self, cpf: &str, name: &str) -> Result<(), AppError> {
        self.registry.update(cpf, name)?;
        info!(cpf, name, "account renamed");
        Ok(())
    }

    /// Remove a customer together with its statement.
    pub fn close_account(&self, cpf: &str) -> Result<(), AppError> {
        let customer = self.registry.delete(cpf)?;
        info!(
            cpf,
            id = %customer.id,
            operations = customer.statement.len(),
            "account closed"
        );
        Ok(())
    }

    /// Number of live accounts.
    pub fn account_count(&self) -> usize {
        self.registry.len()
    }

    // ========================
    // Statement operations
    // ========================

    /// Current balance, recomputed from the statement.
    pub fn get_balance(&self, cpf: &str) -> Result<Cents, AppError> {
        debug!(cpf, "get balance");
        self.registry
            .with_customer(cpf, |customer| Ok(customer.balance()))
    }

    /// Full statement in insertion order.
    pub fn get_statement(&self, cpf: &str) -> Result<Vec<Operation>, AppError> {
        debug!(cpf, "get statement");
        self.registry
            .with_customer(cpf, |customer| Ok(customer.statement.all().to_vec()))
    }

    /// Operations recorded on the given UTC calendar day (`YYYY-MM-DD`).
    pub fn get_statement_by_date(&self, cpf: &str, date: &str) -> Result<Vec<Operation>, AppError> {
        debug!(cpf, date, "get statement by date");
        self.registry.with_customer(cpf, |customer| {
            let date = parse_statement_date(date)?;
            Ok(customer.statement.by_date(date).cloned().collect())
        })
    }

    // ========================
    // Money movements
    // ========================

    /// Record a credit on the customer's statement.
    pub fn deposit(
        &self,
        cpf: &str,
        description: Option<String>,
        amount: Cents,
    ) -> Result<Operation, AppError> {
        validate_amount(amount)?;

        let operation = self.registry.with_customer(cpf, |customer| {
            validate_deposit(customer.balance(), amount)
                .map_err(|err| AppError::from_balance(cpf, err))?;

            let mut operation = Operation::credit(amount, self.clock.now());
            if let Some(desc) = description {
                operation = operation.with_description(desc);
            }
            Ok::<_, AppError>(customer.statement.append(operation).clone())
        })?;

        info!(cpf, amount, "deposit recorded");
        Ok(operation)
    }

    /// Record a debit on the customer's statement.
    ///
    /// The balance check and the append happen under the same customer lock,
    /// so concurrent withdrawals can never jointly overdraw the account.
    pub fn withdraw(&self, cpf: &str, amount: Cents) -> Result<Operation, AppError> {
        validate_amount(amount)?;

        let result: Result<Operation, AppError> = self.registry.with_customer(cpf, |customer| {
            validate_withdrawal(customer.balance(), amount)
                .map_err(|err| AppError::from_balance(cpf, err))?;

            let operation = Operation::debit(amount, self.clock.now());
            Ok(customer.statement.append(operation).clone())
        });

        match result {
            Ok(operation) => {
                info!(cpf, amount, "withdrawal recorded");
                Ok(operation)
            }
            Err(err @ AppError::InsufficientFunds { .. }) => {
                warn!(cpf, amount, "withdrawal rejected: {err}");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}

fn validate_amount(amount: Cents) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::InvalidAmount(
            "Amount must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Parse a calendar date in `YYYY-MM-DD` format.
pub fn parse_statement_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(date.to_string()))
}
