//! Types that represent the data model: `Expense` and `Debt` records, the `Amount` they are
//! measured in, and the codecs that move them in and out of sheet rows.
mod amount;
mod date;
mod debt;
mod expense;
mod validate;

pub use amount::{lenient_amount, lenient_percent, Amount, AmountError, Lenient};
pub use date::parse_sheet_date;
pub use debt::{Debt, DebtColumn, DebtStatus, DEBTS};
pub use expense::{Expense, ExpenseColumn, EXPENSES};
pub use validate::{FieldError, ValidationErrors};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A record kind that is stored one per row in its own sheet, preceded by a single header row.
pub trait Record: Sized + Serialize {
    /// The prefix of synthesized ids, e.g. `expense` in `expense_3`.
    const KIND: &'static str;

    /// The name of the sheet holding these records.
    const SHEET: &'static str;

    /// Rows with fewer cells than this are skipped when reading.
    const MIN_CELLS: usize;

    /// The header row, in column order.
    fn headers() -> Vec<String>;

    /// Encodes the record as one row of cells in column order. The `id` is not part of the row.
    fn encode(&self) -> Vec<String>;

    /// Decodes the row found at `row_index` of the sheet (the header is row 0). Returns `None` if
    /// the row is too short to hold a record.
    fn decode(row_index: usize, cells: &[String]) -> Option<Self>;

    /// Validates the `data` object of a write request and builds a record from it.
    fn from_payload(data: &Value) -> Result<Self, ValidationErrors>;

    /// The position-derived id of the record at `row_index`.
    fn id_for(row_index: usize) -> String {
        format!("{}_{row_index}", Self::KIND)
    }

    /// Decodes every data row of a sheet grid in sheet order, skipping the header row and any
    /// malformed rows.
    fn decode_all(grid: &[Vec<String>]) -> Vec<Self> {
        grid.iter()
            .enumerate()
            .skip(1)
            .filter_map(|(row_index, cells)| {
                let record = Self::decode(row_index, cells);
                if record.is_none() {
                    debug!(
                        "Skipping {} row {row_index}: {} cells, at least {} required",
                        Self::SHEET,
                        cells.len(),
                        Self::MIN_CELLS
                    );
                }
                record
            })
            .collect()
    }
}

/// The kinds of record that can be written.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Expense,
    Debt,
}

serde_plain::derive_display_from_serialize!(EntityKind);
serde_plain::derive_fromstr_from_deserialize!(EntityKind);

/// Returns the cell at `ix`, or the empty string if the row is shorter than that.
pub(crate) fn cell(cells: &[String], ix: usize) -> &str {
    cells.get(ix).map(String::as_str).unwrap_or_default()
}
