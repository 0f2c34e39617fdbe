use anyhow::Result;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Customer, Operation};

/// Exporter for converting a customer's ledger data to CSV or JSON.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export a statement (optionally a single day of it) to CSV format
    pub fn export_statement_csv<W: Write>(
        &self,
        cpf: &str,
        date: Option<&str>,
        writer: W,
    ) -> Result<usize> {
        let operations = self.statement(cpf, date)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["created_at", "type", "amount", "description"])?;

        for operation in &operations {
            csv_writer.write_record([
                operation.created_at.to_rfc3339(),
                operation.kind.as_str().to_string(),
                operation.amount.to_string(),
                operation.description.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(operations.len())
    }

    /// Export a statement (optionally a single day of it) as a JSON array
    pub fn export_statement_json<W: Write>(
        &self,
        cpf: &str,
        date: Option<&str>,
        mut writer: W,
    ) -> Result<usize> {
        let operations = self.statement(cpf, date)?;

        let json = serde_json::to_string_pretty(&operations)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(operations.len())
    }

    /// Export the full customer record, statement included, as JSON
    pub fn export_account_json<W: Write>(&self, cpf: &str, mut writer: W) -> Result<Customer> {
        let customer = self.service.get_account(cpf)?;

        let json = serde_json::to_string_pretty(&customer)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(customer)
    }

    fn statement(&self, cpf: &str, date: Option<&str>) -> Result<Vec<Operation>> {
        let operations = match date {
            Some(date) => self.service.get_statement_by_date(cpf, date)?,
            None => self.service.get_statement(cpf)?,
        };
        Ok(operations)
    }
}
