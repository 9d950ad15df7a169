//! Access to the spreadsheet that stores the records.
//!
//! The `Sheet` trait is the seam between the ledger and the remote spreadsheet. `GoogleSheet` talks
//! to the Google Sheets REST API; `TestSheet` keeps everything in memory so the whole app can run,
//! top-to-bottom, without Google.

mod google_sheet;
mod header;
mod test_sheet;

pub use google_sheet::GoogleSheet;
pub use header::{ensure_header, header_state, HeaderState};
pub use test_sheet::TestSheet;

use crate::{Config, Result};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const TEST_MODE_ENV: &str = "FINTRACK_IN_TEST_MODE";

/// Reads and appends rows of a single spreadsheet.
#[async_trait::async_trait]
pub trait Sheet: Send + Sync {
    /// Whether the credentials needed to reach the spreadsheet are available.
    fn is_configured(&self) -> bool {
        true
    }

    /// Reads the cells of `range` as rows of strings. An empty range is an empty grid.
    async fn read(&self, range: &Range) -> Result<Vec<Vec<String>>>;

    /// Appends `rows` after the last row of the sheet named by `range`. Not idempotent: calling it
    /// twice appends the rows twice.
    async fn append(&self, range: &Range, rows: &[Vec<String>]) -> Result<()>;
}

/// Which spreadsheet backend to use.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Google,
    /// An in-memory sheet seeded with sample data.
    Test,
}

impl Mode {
    /// `Mode::Test` when `FINTRACK_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Google`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Google,
        }
    }
}

/// Creates the `Sheet` implementation for `mode`.
pub fn sheet(config: &Config, mode: Mode) -> Result<Arc<dyn Sheet>> {
    Ok(match mode {
        Mode::Google => Arc::new(GoogleSheet::new(config)?),
        Mode::Test => Arc::new(TestSheet::seeded()?),
    })
}

/// An A1-notation range within one sheet.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Range {
    sheet: String,
    span: Span,
}

/// The part of a sheet a `Range` covers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Span {
    /// Every populated cell.
    All,
    /// The first row, `width` columns wide.
    HeaderRow(usize),
}

impl Range {
    pub fn sheet(name: impl Into<String>) -> Self {
        Self {
            sheet: name.into(),
            span: Span::All,
        }
    }

    pub fn header_row(name: impl Into<String>, width: usize) -> Self {
        Self {
            sheet: name.into(),
            span: Span::HeaderRow(width.max(1)),
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let plain = self
            .sheet
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain {
            write!(f, "{}", self.sheet)?;
        } else {
            write!(f, "'{}'", self.sheet.replace('\'', "''"))?;
        }
        match self.span {
            Span::All => Ok(()),
            Span::HeaderRow(width) => write!(f, "!A1:{}1", column_letter(width)),
        }
    }
}

/// Converts a 1-based column number to its letter name: 1 -> A, 26 -> Z, 27 -> AA.
fn column_letter(mut n: usize) -> String {
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}
