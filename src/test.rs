//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::api::TestSheet;
use crate::ledger::Ledger;
use crate::model::{Debt, Expense, Record, DEBTS, EXPENSES};
use chrono::{DateTime, Local, TimeZone};
use std::collections::HashMap;
use std::sync::Arc;

/// Converts string slices to a row of owned cells.
pub(crate) fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Prepends the header row of `R` to `rows`, producing a grid as it is read from the sheet.
pub(crate) fn with_header<R: Record>(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    std::iter::once(R::headers()).chain(rows).collect()
}

/// An Expenses row with filler category and payment method.
pub(crate) fn expense_row(date: &str, description: &str, amount: &str) -> Vec<String> {
    row(&[date, description, "Food", "Cash", amount, ""])
}

/// A Debts row with filler loan type, principal, rate and start date.
pub(crate) fn debt_row(
    lender: &str,
    balance: &str,
    emi: &str,
    end_date: &str,
    status: &str,
) -> Vec<String> {
    row(&[
        lender,
        "Personal Loan",
        "10000",
        balance,
        emi,
        "9.5",
        "2024-01-01",
        end_date,
        status,
        "",
    ])
}

/// A fixed "now" for aggregation tests: 2025-10-15 at noon, local time.
pub(crate) fn now() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2025, 10, 15, 12, 0, 0)
        .earliest()
        .unwrap()
}

/// Test environment holding a `Ledger` over an in-memory sheet. The sheet is kept so that tests can
/// inspect what was written.
pub(crate) struct TestEnv {
    sheet: Arc<TestSheet>,
    ledger: Ledger,
}

impl TestEnv {
    /// A ledger whose spreadsheet contains exactly `sheets`.
    pub(crate) fn new(sheets: HashMap<String, Vec<Vec<String>>>) -> Self {
        let sheet = Arc::new(TestSheet::new(sheets));
        let ledger = Ledger::new(sheet.clone());
        Self { sheet, ledger }
    }

    /// A ledger whose Expenses and Debts sheets hold a header followed by the given rows.
    pub(crate) fn with_rows(expenses: Vec<Vec<String>>, debts: Vec<Vec<String>>) -> Self {
        Self::new(HashMap::from([
            (EXPENSES.to_string(), with_header::<Expense>(expenses)),
            (DEBTS.to_string(), with_header::<Debt>(debts)),
        ]))
    }

    /// A ledger whose spreadsheet has no sheets at all.
    pub(crate) fn empty() -> Self {
        Self::new(HashMap::new())
    }

    pub(crate) fn sheet(&self) -> &TestSheet {
        &self.sheet
    }

    pub(crate) fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Moves the ledger out, e.g. to hand it to the HTTP router.
    pub(crate) fn into_parts(self) -> (Arc<TestSheet>, Ledger) {
        (self.sheet, self.ledger)
    }
}
