mod common;

use anyhow::Result;
use common::{test_service, StandardCustomers};
use tally::application::AppError;

#[test]
fn test_distinct_cpfs_both_register() -> Result<()> {
    let service = test_service();

    let alice = service.create_account("111", "Alice")?;
    let bob = service.create_account("222", "Bob")?;

    assert_ne!(alice.id, bob.id);
    assert_eq!(service.account_count(), 2);
    Ok(())
}

#[test]
fn test_duplicate_cpf_rejected() -> Result<()> {
    let service = test_service();
    service.create_account("111", "Alice")?;

    let err = service.create_account("111", "Impostor").unwrap_err();
    assert_eq!(err, AppError::DuplicateCustomer("111".into()));
    assert_eq!(err.kind(), "duplicate_customer");

    // The original registration is untouched
    assert_eq!(service.get_account("111")?.name, "Alice");
    assert_eq!(service.account_count(), 1);
    Ok(())
}

#[test]
fn test_get_account_returns_full_record() -> Result<()> {
    let service = test_service();
    StandardCustomers::create_funded(&service, 5000)?;

    let alice = service.get_account(StandardCustomers::ALICE)?;
    assert_eq!(alice.cpf, "111");
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.statement.len(), 1);
    assert_eq!(alice.balance(), 5000);
    Ok(())
}

#[test]
fn test_unknown_customer_everywhere() {
    let service = test_service();
    let missing = || AppError::CustomerNotFound("404".into());

    assert_eq!(service.get_account("404").unwrap_err(), missing());
    assert_eq!(service.rename_account("404", "x").unwrap_err(), missing());
    assert_eq!(service.close_account("404").unwrap_err(), missing());
    assert_eq!(service.get_balance("404").unwrap_err(), missing());
    assert_eq!(service.get_statement("404").unwrap_err(), missing());
    assert_eq!(
        service.get_statement_by_date("404", "2024-01-01").unwrap_err(),
        missing()
    );
    assert_eq!(service.deposit("404", None, 100).unwrap_err(), missing());
    assert_eq!(service.withdraw("404", 100).unwrap_err(), missing());
}

#[test]
fn test_rename_changes_only_name() -> Result<()> {
    let service = test_service();
    StandardCustomers::create_funded(&service, 5000)?;
    service.withdraw(StandardCustomers::ALICE, 1200)?;
    let before = service.get_account(StandardCustomers::ALICE)?;

    service.rename_account(StandardCustomers::ALICE, "Alice Smith")?;

    let after = service.get_account(StandardCustomers::ALICE)?;
    assert_eq!(after.name, "Alice Smith");
    assert_eq!(after.id, before.id);
    assert_eq!(after.cpf, before.cpf);
    assert_eq!(after.statement, before.statement);
    Ok(())
}

#[test]
fn test_close_account_then_everything_fails() -> Result<()> {
    let service = test_service();
    StandardCustomers::create_funded(&service, 5000)?;

    service.close_account(StandardCustomers::ALICE)?;

    let missing = || AppError::CustomerNotFound(StandardCustomers::ALICE.into());
    let cpf = StandardCustomers::ALICE;
    assert_eq!(service.get_account(cpf).unwrap_err(), missing());
    assert_eq!(service.get_balance(cpf).unwrap_err(), missing());
    assert_eq!(service.get_statement(cpf).unwrap_err(), missing());
    assert_eq!(service.deposit(cpf, None, 1).unwrap_err(), missing());
    assert_eq!(service.withdraw(cpf, 1).unwrap_err(), missing());
    assert_eq!(service.rename_account(cpf, "Ghost").unwrap_err(), missing());
    assert_eq!(service.close_account(cpf).unwrap_err(), missing());

    // Other customers are unaffected
    assert_eq!(service.get_account(StandardCustomers::BOB)?.name, "Bob");
    Ok(())
}

#[test]
fn test_close_removes_the_right_customer() -> Result<()> {
    let service = test_service();
    for (cpf, name) in [("1", "Ana"), ("2", "Bruno"), ("3", "Carla"), ("4", "Davi")] {
        service.create_account(cpf, name)?;
    }

    service.close_account("3")?;

    assert!(service.get_account("3").is_err());
    for cpf in ["1", "2", "4"] {
        assert!(service.get_account(cpf).is_ok(), "customer {cpf} vanished");
    }
    assert_eq!(service.account_count(), 3);
    Ok(())
}

#[test]
fn test_cpf_reusable_after_close() -> Result<()> {
    let service = test_service();
    let first = service.create_account("111", "Alice")?;
    service.deposit("111", None, 900)?;
    service.close_account("111")?;

    let second = service.create_account("111", "Alice Again")?;

    assert_ne!(first.id, second.id);
    assert_eq!(service.get_balance("111")?, 0);
    assert!(service.get_statement("111")?.is_empty());
    Ok(())
}
