//! These structs provide the CLI interface for the fintrack CLI.

use crate::ledger::ListKind;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tracing_subscriber::filter::LevelFilter;

/// fintrack: A personal finance tracker backed by a Google sheet.
///
/// Expenses and debts/loans are stored one per row in the "Expenses" and "Debts" tabs of a Google
/// spreadsheet. The `serve` command runs an HTTP API that a web UI can call to list records, see a
/// dashboard and add records. The other commands do the same things once, from the command line.
///
/// You need a Google Sheets API key and the ID (or URL) of the spreadsheet. Without them the
/// program still runs, reads return empty data and writes are refused.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API.
    ///
    /// Endpoints:
    ///
    /// - GET /api/sheets?type=expenses|debts|summary (no type: the dashboard)
    ///
    /// - POST /api/sheets with {"type": "expense"|"debt", "data": {...}}
    ///
    /// - GET /health
    Serve(ServeArgs),
    /// Print the dashboard: totals, recent expenses and upcoming EMIs.
    Dashboard,
    /// Print the expenses, the debts or a summary of both.
    List(ListArgs),
    /// Add an expense or a debt/loan.
    Add(AddArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The Google Sheets API key.
    #[arg(long, env = "GOOGLE_SHEETS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// The spreadsheet ID, or the URL of the spreadsheet, which looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long, env = "SPREADSHEET_ID")]
    spreadsheet_id: Option<String>,

    /// Overrides the base URL of the Google Sheets API. Defaults to
    /// https://sheets.googleapis.com/v4/spreadsheets
    #[arg(long, env = "FINTRACK_SHEETS_BASE_URL")]
    sheets_base_url: Option<String>,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.spreadsheet_id.as_deref()
    }

    pub fn sheets_base_url(&self) -> Option<&str> {
        self.sheets_base_url.as_deref()
    }
}

/// (Not shown): Args for the `fintrack serve` command.
#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// The address to listen on.
    #[arg(long, env = "FINTRACK_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

impl ServeArgs {
    pub fn bind(&self) -> SocketAddr {
        self.bind
    }
}

/// (Not shown): Args for the `fintrack list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// What to list.
    #[arg(value_enum)]
    kind: ListKind,
}

impl ListArgs {
    pub fn kind(&self) -> ListKind {
        self.kind
    }
}

/// (Not shown): Args for the `fintrack add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    #[command(subcommand)]
    entity: AddSubcommand,
}

impl AddArgs {
    pub fn entity(&self) -> &AddSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum AddSubcommand {
    /// Add an expense to the Expenses tab.
    Expense(AddExpenseArgs),
    /// Add a debt or loan to the Debts tab.
    Debt(AddDebtArgs),
}

/// Args for `fintrack add expense`. Values are validated the same way as the HTTP API validates
/// them, so they are taken as strings here.
#[derive(Debug, Parser, Clone)]
pub struct AddExpenseArgs {
    /// The date of the expense, e.g. 2025-10-15.
    #[arg(long)]
    date: String,

    #[arg(long)]
    description: String,

    /// E.g. "Food & Dining", "Transportation", "Utilities".
    #[arg(long)]
    category: String,

    /// E.g. "Cash", "Credit Card", "UPI".
    #[arg(long)]
    payment_method: String,

    /// A positive amount, e.g. 12.50
    #[arg(long, allow_negative_numbers = true)]
    amount: String,

    #[arg(long)]
    notes: Option<String>,
}

impl AddExpenseArgs {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        payment_method: impl Into<String>,
        amount: impl Into<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            category: category.into(),
            payment_method: payment_method.into(),
            amount: amount.into(),
            notes,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Args for `fintrack add debt`.
#[derive(Debug, Parser, Clone)]
pub struct AddDebtArgs {
    /// The bank or person the money is owed to.
    #[arg(long)]
    lender: String,

    /// E.g. "Home Loan", "Car Loan", "Personal Loan".
    #[arg(long)]
    loan_type: String,

    #[arg(long, allow_negative_numbers = true)]
    principal_amount: String,

    #[arg(long, allow_negative_numbers = true)]
    current_balance: String,

    /// The equated monthly installment.
    #[arg(long, allow_negative_numbers = true)]
    emi_amount: String,

    /// The annual interest rate in percent, e.g. 8.5
    #[arg(long, allow_negative_numbers = true)]
    interest_rate: String,

    #[arg(long)]
    start_date: String,

    #[arg(long)]
    end_date: String,

    /// One of Active, Completed, Defaulted, Prepaid. Defaults to Active.
    #[arg(long)]
    status: Option<String>,

    #[arg(long)]
    notes: Option<String>,
}

impl AddDebtArgs {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lender: impl Into<String>,
        loan_type: impl Into<String>,
        principal_amount: impl Into<String>,
        current_balance: impl Into<String>,
        emi_amount: impl Into<String>,
        interest_rate: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        status: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            lender: lender.into(),
            loan_type: loan_type.into(),
            principal_amount: principal_amount.into(),
            current_balance: current_balance.into(),
            emi_amount: emi_amount.into(),
            interest_rate: interest_rate.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            status,
            notes,
        }
    }

    pub fn lender(&self) -> &str {
        &self.lender
    }

    pub fn loan_type(&self) -> &str {
        &self.loan_type
    }

    pub fn principal_amount(&self) -> &str {
        &self.principal_amount
    }

    pub fn current_balance(&self) -> &str {
        &self.current_balance
    }

    pub fn emi_amount(&self) -> &str {
        &self.emi_amount
    }

    pub fn interest_rate(&self) -> &str {
        &self.interest_rate
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
