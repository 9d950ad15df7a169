//! The read and write operations behind both the HTTP API and the command line.
//!
//! Reads never fail: a sheet that cannot be read is treated as empty, and a ledger without
//! credentials answers with a zeroed payload that explains what is missing. Writes are validated
//! before anything is sent, and any failure after that is reported to the caller.

use crate::aggregate::{Dashboard, DebtSummary, ExpenseSummary};
use crate::api::{self, ensure_header, Mode, Range, Sheet};
use crate::error::NOT_CONFIGURED;
use crate::model::{Debt, EntityKind, Expense, Record};
use crate::{Config, Error, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The message returned when a write names a record type other than `expense` or `debt`.
pub const INVALID_TYPE: &str = r#"Invalid request type. Use "expense" or "debt"."#;

/// Reads and appends `Expense` and `Debt` records in a spreadsheet.
#[derive(Clone)]
pub struct Ledger {
    sheet: Arc<dyn Sheet>,
}

impl Ledger {
    pub fn new(sheet: Arc<dyn Sheet>) -> Self {
        Self { sheet }
    }

    /// Creates a `Ledger` over the spreadsheet described by `config`, or over seeded in-memory data
    /// in `Mode::Test`.
    pub fn from_config(config: &Config, mode: Mode) -> Result<Self> {
        Ok(Self::new(api::sheet(config, mode)?))
    }

    pub fn is_configured(&self) -> bool {
        self.sheet.is_configured()
    }

    /// Reads every record of type `R` in sheet order. A sheet that cannot be read yields no records.
    pub async fn list<R: Record>(&self) -> Vec<R> {
        match self.sheet.read(&Range::sheet(R::SHEET)).await {
            Ok(grid) => R::decode_all(&grid),
            Err(e) => {
                warn!("Unable to read the {} sheet, treating it as empty: {e}", R::SHEET);
                Vec::new()
            }
        }
    }

    /// Answers a read request.
    pub async fn read(&self, kind: ListKind, now: DateTime<Local>) -> ReadResponse {
        if !self.is_configured() {
            return ReadResponse::NotConfigured(NotConfigured::default());
        }
        match kind {
            ListKind::Expenses => {
                let mut expenses = self.list::<Expense>().await;
                expenses.reverse();
                ReadResponse::Expenses { expenses }
            }
            ListKind::Debts => ReadResponse::Debts {
                debts: self.list::<Debt>().await,
            },
            ListKind::Summary => {
                let (expenses, debts) = tokio::join!(self.list::<Expense>(), self.list::<Debt>());
                ReadResponse::Summary {
                    expenses: ExpenseSummary::new(&expenses),
                    debts: DebtSummary::new(&debts),
                }
            }
            ListKind::Dashboard => {
                let (expenses, debts) = tokio::join!(self.list::<Expense>(), self.list::<Debt>());
                ReadResponse::Dashboard(Dashboard::new(&expenses, &debts, now))
            }
        }
    }

    /// Validates and appends the record described by `request`.
    ///
    /// # Errors
    /// - `Error::Config` when the ledger has no credentials.
    /// - `Error::Request` when `type` is not `expense` or `debt`.
    /// - `Error::Validation` when `data` does not describe a valid record. Nothing is written.
    /// - `Error::Remote` or `Error::Other` when the spreadsheet write fails.
    pub async fn append(&self, request: &WriteRequest) -> Result<WriteAck> {
        if !self.is_configured() {
            return Err(Error::not_configured());
        }
        let kind = request
            .kind
            .as_deref()
            .and_then(|s| EntityKind::from_str(s).ok())
            .ok_or_else(|| Error::Request(INVALID_TYPE.to_string()))?;

        match kind {
            EntityKind::Expense => {
                let expense = Expense::from_payload(&request.data).map_err(Error::Validation)?;
                self.append_record(&expense).await?;
                Ok(WriteAck::new("Expense added successfully to Google Sheets"))
            }
            EntityKind::Debt => {
                let debt = Debt::from_payload(&request.data).map_err(Error::Validation)?;
                self.append_record(&debt).await?;
                Ok(WriteAck::new("Debt/Loan added successfully to Google Sheets"))
            }
        }
    }

    /// Writes the header row of `R`'s sheet if it is missing, then appends `record` after the last
    /// row. A failure of the second step leaves the header in place.
    pub async fn append_record<R: Record + Sync>(&self, record: &R) -> Result<()> {
        let result = async {
            ensure_header(self.sheet.as_ref(), R::SHEET, &R::headers()).await?;
            self.sheet
                .append(&Range::sheet(R::SHEET), &[record.encode()])
                .await
        }
        .await;
        match &result {
            Ok(()) => info!("Appended a {} to the {} sheet", R::KIND, R::SHEET),
            Err(e) => error!("Failed to append a {} to the {} sheet: {e}", R::KIND, R::SHEET),
        }
        result
    }
}

/// Which view a read request asks for.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Totals, recent expenses and upcoming EMIs.
    #[default]
    #[value(skip)]
    Dashboard,
    /// Every expense, newest first.
    Expenses,
    /// Every debt, in sheet order.
    Debts,
    /// Count, total and average of expenses, and totals of active debts.
    Summary,
}

serde_plain::derive_display_from_serialize!(ListKind);
serde_plain::derive_fromstr_from_deserialize!(ListKind);

impl ListKind {
    /// Interprets the `type` query parameter. Anything unrecognized, including no value, is the
    /// dashboard.
    pub fn from_query(value: Option<&str>) -> Self {
        value
            .and_then(|s| ListKind::from_str(s).ok())
            .unwrap_or_default()
    }
}

/// The query string of a read request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl ReadQuery {
    pub fn list_kind(&self) -> ListKind {
        ListKind::from_query(self.kind.as_deref())
    }
}

/// The body of a write request: `{"type": "expense" | "debt", "data": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteRequest {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    data: Value,
}

impl WriteRequest {
    pub fn new(kind: EntityKind, data: Value) -> Self {
        Self {
            kind: Some(kind.to_string()),
            data,
        }
    }
}

/// The acknowledgement of a successful write.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct WriteAck {
    message: String,
}

impl WriteAck {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The answer to a read request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReadResponse {
    NotConfigured(NotConfigured),
    Dashboard(Dashboard),
    Expenses {
        expenses: Vec<Expense>,
    },
    Debts {
        debts: Vec<Debt>,
    },
    Summary {
        expenses: ExpenseSummary,
        debts: DebtSummary,
    },
}

/// Returned for every read while credentials are missing: an explanation and a zeroed payload that
/// fits any view.
#[derive(Debug, Clone, Serialize)]
pub struct NotConfigured {
    message: String,
    #[serde(flatten)]
    dashboard: Dashboard,
    expenses: Vec<Expense>,
    debts: Vec<Debt>,
}

impl Default for NotConfigured {
    fn default() -> Self {
        Self {
            message: NOT_CONFIGURED.to_string(),
            dashboard: Dashboard::default(),
            expenses: Vec::new(),
            debts: Vec::new(),
        }
    }
}

impl NotConfigured {
    pub fn message(&self) -> &str {
        &self.message
    }
}
