//! Implements the `Sheet` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without using Google Sheets.

use crate::api::{Range, Sheet, Span};
use crate::model::{DEBTS, EXPENSES};
use crate::{Error, Result};
use anyhow::Context;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// An implementation of the `Sheet` trait that does not use Google sheets. The map key is the sheet
/// name and the map value is the rows of the sheet.
///
/// Reading a sheet that does not exist fails the way the remote API does. Appending to a sheet
/// that does not exist creates it.
#[derive(Debug, Default)]
pub struct TestSheet {
    data: Mutex<HashMap<String, Vec<Vec<String>>>>,
    appends: AtomicUsize,
    fail_appends: AtomicBool,
}

impl TestSheet {
    pub fn new(data: HashMap<String, Vec<Vec<String>>>) -> Self {
        Self {
            data: Mutex::new(data),
            ..Self::default()
        }
    }

    /// A `TestSheet` loaded with the sample data from this module.
    pub fn seeded() -> Result<Self> {
        let mut map = HashMap::new();
        map.insert(EXPENSES.to_string(), load_csv(EXPENSE_DATA)?);
        map.insert(DEBTS.to_string(), load_csv(DEBT_DATA)?);
        Ok(Self::new(map))
    }

    /// Returns a copy of the rows of `sheet_name`, if that sheet exists.
    pub async fn rows(&self, sheet_name: &str) -> Option<Vec<Vec<String>>> {
        self.data.lock().await.get(sheet_name).cloned()
    }

    /// The number of `append` calls made so far, including failed ones.
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `append` fail with a server error.
    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Sheet for TestSheet {
    async fn read(&self, range: &Range) -> Result<Vec<Vec<String>>> {
        let data = self.data.lock().await;
        let grid = data
            .get(range.sheet_name())
            .ok_or_else(|| Error::Remote {
                status: 400,
                body: format!("Unable to parse range: {range}"),
            })?;
        Ok(match range.span() {
            Span::All => grid.clone(),
            Span::HeaderRow(width) => grid
                .first()
                .filter(|row| !row.is_empty())
                .map(|row| vec![row.iter().take(width).cloned().collect()])
                .unwrap_or_default(),
        })
    }

    async fn append(&self, range: &Range, rows: &[Vec<String>]) -> Result<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(Error::Remote {
                status: 500,
                body: "Internal error encountered.".to_string(),
            });
        }
        self.data
            .lock()
            .await
            .entry(range.sheet_name().to_string())
            .or_default()
            .extend(rows.iter().cloned());
        Ok(())
    }
}

/// Loads data from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false) // Ensure headers are treated as part of the data
        .flexible(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Unable to parse seed data")?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(rows)
}

/// Seed expense data. Amounts are rendered the way the sheet renders currency cells.
const EXPENSE_DATA: &str = r##"Date,Description,Category,Payment Method,Amount,Notes
9/28/2025,Whole Foods Market,Groceries,Credit Card,$87.43,
10/1/2025,City Water District,Utilities,Bank Transfer,$45.88,
10/3/2025,Shell Station,Transportation,Credit Card,$61.45,
10/5/2025,Costco Wholesale,Groceries,Debit Card,$118.56,monthly stock-up
10/9/2025,Blue Bottle Coffee,Food & Dining,UPI,$8.50,
10/12/2025,Panera Bread,Food & Dining,Cash,$12.40,
"##;

/// Seed debt data.
const DEBT_DATA: &str = r##"Lender,Loan Type,Principal Amount,Current Balance,EMI Amount,Interest Rate,Start Date,End Date,Status,Notes
City Bank,Car Loan,"$20,000.00","$12,500.00",$450.00,7.25,1/1/2023,12/31/2027,Active,
State Credit Union,Education Loan,"$35,000.00",$0.00,$600.00,5.5,9/1/2015,9/1/2022,Completed,paid off early
First Home Finance,Home Loan,"$250,000.00","$231,400.00","$1,800.00",6.5,3/1/2021,3/1/2046,Active,
"##;
