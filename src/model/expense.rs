use crate::model::validate::{Bound, Payload, ValidationErrors};
use crate::model::{cell, lenient_amount, Amount, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Represents a single row from the Expenses sheet.
///
/// The `id` is not stored in the sheet. It is derived from the row position when the sheet is read
/// (`expense_<row>`), so it changes if rows above it are inserted or removed.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub(crate) id: String,
    pub(crate) date: String,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) payment_method: String,
    pub(crate) amount: Amount,
    pub(crate) notes: String,
}

impl Expense {
    pub fn id(&self) -> &str {
        &self.id
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

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl Record for Expense {
    const KIND: &'static str = "expense";
    const SHEET: &'static str = EXPENSES;
    const MIN_CELLS: usize = 5;

    fn headers() -> Vec<String> {
        ExpenseColumn::ALL.iter().map(|c| c.to_string()).collect()
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.description.clone(),
            self.category.clone(),
            self.payment_method.clone(),
            self.amount.to_cell(),
            self.notes.clone(),
        ]
    }

    fn decode(row_index: usize, cells: &[String]) -> Option<Self> {
        if cells.len() < Self::MIN_CELLS {
            return None;
        }
        let amount = lenient_amount(cell(cells, ExpenseColumn::Amount as usize));
        if amount.is_defaulted() {
            debug!("{} row {row_index}: amount is not a number, using 0", Self::SHEET);
        }
        Some(Self {
            id: Self::id_for(row_index),
            date: cell(cells, ExpenseColumn::Date as usize).to_string(),
            description: cell(cells, ExpenseColumn::Description as usize).to_string(),
            category: cell(cells, ExpenseColumn::Category as usize).to_string(),
            payment_method: cell(cells, ExpenseColumn::PaymentMethod as usize).to_string(),
            amount: amount.value(),
            notes: cell(cells, ExpenseColumn::Notes as usize).to_string(),
        })
    }

    fn from_payload(data: &Value) -> Result<Self, ValidationErrors> {
        let mut p = Payload::new(data);
        let expense = Self {
            id: String::new(),
            date: p.date("date"),
            description: p.text("description", "Description is required"),
            category: p.text("category", "Category is required"),
            payment_method: p.text("paymentMethod", "Payment method is required"),
            amount: p.amount("amount", Bound::Positive("Amount must be positive")),
            notes: p.optional_text("notes"),
        };
        p.finish(expense)
    }
}

/// The name of the sheet that holds expenses.
pub const EXPENSES: &str = "Expenses";

/// The columns of the Expenses sheet, in order. The serialized name is the header text.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum ExpenseColumn {
    Date,
    Description,
    Category,
    #[serde(rename = "Payment Method")]
    PaymentMethod,
    Amount,
    Notes,
}

serde_plain::derive_display_from_serialize!(ExpenseColumn);
serde_plain::derive_fromstr_from_deserialize!(ExpenseColumn);

impl ExpenseColumn {
    pub const ALL: [ExpenseColumn; 6] = [
        ExpenseColumn::Date,
        ExpenseColumn::Description,
        ExpenseColumn::Category,
        ExpenseColumn::PaymentMethod,
        ExpenseColumn::Amount,
        ExpenseColumn::Notes,
    ];
}
