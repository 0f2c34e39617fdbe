use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

use crate::application::{AppError, LedgerService};
use crate::domain::{format_cents, parse_cents, Cents, Operation};
use crate::io::Exporter;
use crate::telemetry;

/// Tally - in-memory customer ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "An in-memory customer ledger driven by a command session")]
#[command(version)]
pub struct Cli {
    /// Read session commands from a file instead of stdin
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// A single line of a session, parsed without a binary name.
#[derive(Parser, Debug)]
#[command(name = "tally", no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Show the current balance of an account
    Balance {
        /// Customer CPF
        #[arg(long)]
        cpf: String,
    },

    /// List the operations of an account
    Statement {
        /// Customer CPF
        #[arg(long)]
        cpf: String,

        /// Only operations recorded on this day (YYYY-MM-DD, UTC)
        #[arg(long)]
        date: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Credit an account
    Deposit {
        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,

        /// Customer CPF
        #[arg(long)]
        cpf: String,

        /// Description of the deposit
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Debit an account, if the balance covers it
    Withdraw {
        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,

        /// Customer CPF
        #[arg(long)]
        cpf: String,
    },

    /// End the session
    #[command(alias = "quit")]
    Exit,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Register a new account
    Create {
        /// Customer CPF (must be unique)
        #[arg(long)]
        cpf: String,

        /// Customer name
        name: String,
    },

    /// Show account details
    Show {
        /// Customer CPF
        #[arg(long)]
        cpf: String,

        /// Output format (csv is not supported for accounts)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Change the account holder's name
    Rename {
        /// Customer CPF
        #[arg(long)]
        cpf: String,

        /// New name
        name: String,
    },

    /// Close an account and discard its statement
    Close {
        /// Customer CPF
        #[arg(long)]
        cpf: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub commands: usize,
    pub failures: usize,
    pub open_accounts: usize,
}

enum Flow {
    Continue,
    Exit,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        telemetry::init(self.verbose);

        let service = LedgerService::new();
        let stdout = io::stdout();
        let mut out = stdout.lock();

        let summary = match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open script {}", path.display()))?;
                run_session(&service, BufReader::new(file), &mut out)?
            }
            None => run_session(&service, io::stdin().lock(), &mut out)?,
        };

        info!(
            commands = summary.commands,
            failures = summary.failures,
            open_accounts = summary.open_accounts,
            "session finished"
        );
        Ok(())
    }
}

/// Execute commands line by line against `service`.
///
/// A failing command is reported on `out` and the session carries on; only
/// I/O errors on `input`/`out` end it early. Blank lines and lines starting
/// with `#` are skipped.
pub fn run_session<R: BufRead, W: Write>(
    service: &LedgerService,
    input: R,
    out: &mut W,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    for line in input.lines() {
        let line = line.context("Failed to read session input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        summary.commands += 1;
        match run_line(service, line, out) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => {
                summary.failures += 1;
                writeln!(out, "error: {:#}", err)?;
            }
        }
    }

    summary.open_accounts = service.account_count();
    Ok(summary)
}

fn run_line<W: Write>(service: &LedgerService, line: &str, out: &mut W) -> Result<Flow> {
    let tokens = split_line(line)?;
    let parsed = match SessionLine::try_parse_from(tokens) {
        Ok(parsed) => parsed,
        Err(err) if !err.use_stderr() => {
            // --help and friends are not failures
            write!(out, "{}", err)?;
            return Ok(Flow::Continue);
        }
        Err(err) => {
            let message = err.to_string();
            let message = message.trim_end().trim_start_matches("error: ");
            return Err(anyhow::anyhow!(message.to_string()));
        }
    };

    execute(service, parsed.command, out)
}

fn execute<W: Write>(service: &LedgerService, command: Commands, out: &mut W) -> Result<Flow> {
    match command {
        Commands::Account(account_cmd) => run_account_command(service, account_cmd, out)?,

        Commands::Balance { cpf } => {
            let balance = service.get_balance(&cpf)?;
            writeln!(out, "{}: {}", cpf, format_cents(balance))?;
        }

        Commands::Statement { cpf, date, format } => {
            run_statement_command(service, &cpf, date.as_deref(), format, out)?;
        }

        Commands::Deposit {
            amount,
            cpf,
            description,
        } => {
            let amount = parse_amount(&amount)?;
            let operation = service.deposit(&cpf, description, amount)?;
            writeln!(
                out,
                "Deposited {} to {}",
                format_cents(operation.amount),
                cpf
            )?;
        }

        Commands::Withdraw { amount, cpf } => {
            let amount = parse_amount(&amount)?;
            let operation = service.withdraw(&cpf, amount)?;
            writeln!(
                out,
                "Withdrew {} from {}",
                format_cents(operation.amount),
                cpf
            )?;
        }

        Commands::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

fn run_account_command<W: Write>(
    service: &LedgerService,
    cmd: AccountCommands,
    out: &mut W,
) -> Result<()> {
    match cmd {
        AccountCommands::Create { cpf, name } => {
            let customer = service.create_account(&cpf, &name)?;
            writeln!(out, "Created account: {} ({})", customer.name, customer.cpf)?;
        }

        AccountCommands::Show { cpf, format } => match format {
            OutputFormat::Table => {
                let customer = service.get_account(&cpf)?;
                writeln!(out, "Name:       {}", customer.name)?;
                writeln!(out, "CPF:        {}", customer.cpf)?;
                writeln!(out, "ID:         {}", customer.id)?;
                writeln!(out, "Balance:    {}", format_cents(customer.balance()))?;
                writeln!(out, "Operations: {}", customer.statement.len())?;
            }
            OutputFormat::Json => {
                Exporter::new(service).export_account_json(&cpf, &mut *out)?;
            }
            OutputFormat::Csv => {
                anyhow::bail!("CSV output is only available for statements");
            }
        },

        AccountCommands::Rename { cpf, name } => {
            service.rename_account(&cpf, &name)?;
            writeln!(out, "Renamed account {}: {}", cpf, name)?;
        }

        AccountCommands::Close { cpf } => {
            service.close_account(&cpf)?;
            writeln!(out, "Closed account: {}", cpf)?;
        }
    }
    Ok(())
}

fn run_statement_command<W: Write>(
    service: &LedgerService,
    cpf: &str,
    date: Option<&str>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            Exporter::new(service).export_statement_json(cpf, date, &mut *out)?;
        }
        OutputFormat::Csv => {
            Exporter::new(service).export_statement_csv(cpf, date, &mut *out)?;
        }
        OutputFormat::Table => {
            let operations = match date {
                Some(date) => service.get_statement_by_date(cpf, date)?,
                None => service.get_statement(cpf)?,
            };
            write_statement_table(&operations, out)?;
        }
    }
    Ok(())
}

fn write_statement_table<W: Write>(operations: &[Operation], out: &mut W) -> Result<()> {
    if operations.is_empty() {
        writeln!(out, "No operations found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<20} {:<7} {:>12} DESCRIPTION",
        "DATE", "TYPE", "AMOUNT"
    )?;
    writeln!(out, "{}", "-".repeat(60))?;

    for operation in operations {
        writeln!(
            out,
            "{:<20} {:<7} {:>12} {}",
            operation.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            operation.kind.as_str(),
            format_cents(operation.signed_amount()),
            truncate(operation.description.as_deref().unwrap_or(""), 30)
        )?;
    }
    Ok(())
}

fn parse_amount(input: &str) -> Result<Cents, AppError> {
    parse_cents(input).map_err(|e| AppError::InvalidAmount(format!("'{}': {}", input, e)))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Split a session line into arguments. Single or double quotes group words;
/// there are no escape sequences.
fn split_line(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        anyhow::bail!("unterminated {} quote", q);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
