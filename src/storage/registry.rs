use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use thiserror::Error;

use crate::domain::Customer;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("customer not found: {0}")]
    NotFound(String),

    #[error("customer already exists: {0}")]
    Duplicate(String),
}

/// One registered customer behind its own lock.
///
/// The slot is emptied when the customer is deleted, so a caller still holding
/// the handle after removal observes `None` instead of a dangling customer.
type Slot = Arc<Mutex<Option<Customer>>>;

/// In-memory store of customers keyed by CPF.
///
/// The map lock only guards the key space. Work on a customer happens under
/// that customer's own lock, so unrelated customers never contend. The map
/// lock is never held while waiting on a customer lock.
#[derive(Debug, Default)]
pub struct CustomerRegistry {
    customers: RwLock<HashMap<String, Slot>>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new customer. Uniqueness check and insert happen under a
    /// single write lock.
    pub fn create(&self, cpf: &str, name: &str) -> Result<Customer, RegistryError> {
        let mut customers = self
            .customers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match customers.entry(cpf.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate(cpf.to_string())),
            Entry::Vacant(entry) => {
                let customer = Customer::new(cpf, name);
                entry.insert(Arc::new(Mutex::new(Some(customer.clone()))));
                Ok(customer)
            }
        }
    }

    /// Snapshot of a customer, statement included.
    pub fn find(&self, cpf: &str) -> Result<Customer, RegistryError> {
        self.with_customer(cpf, |customer| Ok(customer.clone()))
    }

    /// Replace the customer's name, leaving everything else untouched.
    pub fn update(&self, cpf: &str, name: &str) -> Result<(), RegistryError> {
        self.with_customer(cpf, |customer| {
            customer.rename(name);
            Ok(())
        })
    }

    /// Remove a customer by key. Runs under the customer's lock, so it is
    /// ordered with respect to every other operation on the same customer.
    pub fn delete(&self, cpf: &str) -> Result<Customer, RegistryError> {
        let slot = self.slot(cpf)?;
        let mut guard = lock_slot(&slot);
        let customer = guard
            .take()
            .ok_or_else(|| RegistryError::NotFound(cpf.to_string()))?;

        let mut customers = self
            .customers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if customers
            .get(cpf)
            .is_some_and(|current| Arc::ptr_eq(current, &slot))
        {
            customers.remove(cpf);
        }

        Ok(customer)
    }

    /// Run `f` against the live customer while holding its lock.
    ///
    /// Everything `f` reads and writes is atomic with respect to other
    /// operations on the same customer, which is what makes check-then-append
    /// sequences such as withdrawals safe.
    pub fn with_customer<T, E>(
        &self,
        cpf: &str,
        f: impl FnOnce(&mut Customer) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<RegistryError>,
    {
        let slot = self.slot(cpf)?;
        let mut guard = lock_slot(&slot);
        match guard.as_mut() {
            Some(customer) => f(customer),
            None => Err(RegistryError::NotFound(cpf.to_string()).into()),
        }
    }

    pub fn contains(&self, cpf: &str) -> bool {
        self.customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(cpf)
    }

    pub fn len(&self) -> usize {
        self.customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, cpf: &str) -> Result<Slot, RegistryError> {
        self.customers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(cpf)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(cpf.to_string()))
    }
}

// Every mutation under these locks is a single insert, push or assignment,
// so a poisoned guard still protects consistent data.
fn lock_slot(slot: &Slot) -> MutexGuard<'_, Option<Customer>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
