// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tally::application::{LedgerService, ManualClock};

/// Helper to create a service on the system clock
pub fn test_service() -> LedgerService {
    LedgerService::new()
}

/// Helper to create a service whose clock starts at `start`
pub fn test_service_at(start: DateTime<Utc>) -> (LedgerService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start));
    let service = LedgerService::with_clock(clock.clone());
    (service, clock)
}

/// Helper to parse a date string into DateTime<Utc> at midnight
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Helper to parse an RFC 3339 timestamp into DateTime<Utc>
pub fn parse_time(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

/// Test fixture: Standard customer setup
pub struct StandardCustomers;

impl StandardCustomers {
    pub const ALICE: &'static str = "111";
    pub const BOB: &'static str = "222";

    /// Register Alice and Bob with empty statements
    pub fn create_basic(service: &LedgerService) -> Result<()> {
        service.create_account(Self::ALICE, "Alice")?;
        service.create_account(Self::BOB, "Bob")?;
        Ok(())
    }

    /// Register Alice and Bob, then fund Alice
    pub fn create_funded(service: &LedgerService, amount: i64) -> Result<()> {
        Self::create_basic(service)?;
        service.deposit(Self::ALICE, Some("opening balance".into()), amount)?;
        Ok(())
    }
}
