//! Views derived from the decoded records: the dashboard, per-list summaries and the
//! months-remaining estimate for a loan.
//!
//! Everything here is a pure function of the records and `now`.

use crate::model::{parse_sheet_date, Amount, Debt, DebtStatus, Expense};
use chrono::{DateTime, Datelike, Duration, Local};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// How many entries the dashboard lists for recent expenses and for upcoming EMIs.
pub const DASHBOARD_LIST_LEN: usize = 5;

/// The upcoming-EMI due date is not tracked; it is estimated this many days after `now`.
const EMI_DUE_IN_DAYS: i64 = 30;

/// The summary shown on the home page.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    total_expenses: Amount,
    total_debts: Amount,
    monthly_expenses: Amount,
    active_loans: usize,
    recent_expenses: Vec<RecentExpense>,
    #[serde(rename = "upcomingEMIs")]
    upcoming_emis: Vec<UpcomingEmi>,
}

impl Dashboard {
    /// Builds the dashboard from expenses and debts in sheet order.
    pub fn new(expenses: &[Expense], debts: &[Debt], now: DateTime<Local>) -> Self {
        Self {
            total_expenses: total_expenses(expenses),
            total_debts: total_debts(debts),
            monthly_expenses: monthly_expenses(expenses, now),
            active_loans: debts.iter().filter(|d| d.is_active()).count(),
            recent_expenses: recent_expenses(expenses),
            upcoming_emis: upcoming_emis(debts, now),
        }
    }

    pub fn total_expenses(&self) -> Amount {
        self.total_expenses
    }

    pub fn total_debts(&self) -> Amount {
        self.total_debts
    }

    pub fn monthly_expenses(&self) -> Amount {
        self.monthly_expenses
    }

    pub fn active_loans(&self) -> usize {
        self.active_loans
    }

    pub fn recent_expenses(&self) -> &[RecentExpense] {
        &self.recent_expenses
    }

    pub fn upcoming_emis(&self) -> &[UpcomingEmi] {
        &self.upcoming_emis
    }
}

/// An expense as listed on the dashboard.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentExpense {
    id: String,
    date: String,
    description: String,
    amount: Amount,
    category: String,
}

impl RecentExpense {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl From<&Expense> for RecentExpense {
    fn from(e: &Expense) -> Self {
        Self {
            id: e.id().to_string(),
            date: e.date().to_string(),
            description: e.description().to_string(),
            amount: e.amount(),
            category: e.category().to_string(),
        }
    }
}

/// The next installment of an active loan. `due_date` is an estimate, which `due_date_estimated`
/// tells the caller.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEmi {
    id: String,
    lender: String,
    amount: Amount,
    due_date: String,
    due_date_estimated: bool,
}

impl UpcomingEmi {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn due_date(&self) -> &str {
        &self.due_date
    }
}

/// Totals for the expenses list.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    count: usize,
    total: Amount,
    average: Amount,
}

impl ExpenseSummary {
    pub fn new(expenses: &[Expense]) -> Self {
        let count = expenses.len();
        let total = total_expenses(expenses);
        let average = if count == 0 {
            Amount::ZERO
        } else {
            Amount::new((total.value() / Decimal::from(count)).round_dp(2))
        };
        Self {
            count,
            total,
            average,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn average(&self) -> Amount {
        self.average
    }
}

/// Totals for the debts list. Balance and EMI are summed over active loans only.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtSummary {
    total_balance: Amount,
    monthly_emi: Amount,
    active_loans: usize,
    completed_loans: usize,
}

impl DebtSummary {
    pub fn new(debts: &[Debt]) -> Self {
        let active = || debts.iter().filter(|d| d.is_active());
        Self {
            total_balance: active().map(Debt::current_balance).sum(),
            monthly_emi: active().map(Debt::emi_amount).sum(),
            active_loans: active().count(),
            completed_loans: debts
                .iter()
                .filter(|d| *d.status() == DebtStatus::Completed)
                .count(),
        }
    }

    pub fn total_balance(&self) -> Amount {
        self.total_balance
    }

    pub fn monthly_emi(&self) -> Amount {
        self.monthly_emi
    }

    pub fn active_loans(&self) -> usize {
        self.active_loans
    }

    pub fn completed_loans(&self) -> usize {
        self.completed_loans
    }
}

pub fn total_expenses(expenses: &[Expense]) -> Amount {
    expenses.iter().map(Expense::amount).sum()
}

/// The sum of current balances over active debts.
pub fn total_debts(debts: &[Debt]) -> Amount {
    debts
        .iter()
        .filter(|d| d.is_active())
        .map(Debt::current_balance)
        .sum()
}

/// The sum of expenses dated in the same calendar month as `now`. Expenses whose date cannot be
/// parsed are not counted.
pub fn monthly_expenses(expenses: &[Expense], now: DateTime<Local>) -> Amount {
    expenses
        .iter()
        .filter(|e| {
            parse_sheet_date(e.date())
                .map(|d| d.year() == now.year() && d.month() == now.month())
                .unwrap_or(false)
        })
        .map(Expense::amount)
        .sum()
}

/// The last expenses appended to the sheet, newest first.
pub fn recent_expenses(expenses: &[Expense]) -> Vec<RecentExpense> {
    expenses
        .iter()
        .rev()
        .take(DASHBOARD_LIST_LEN)
        .map(RecentExpense::from)
        .collect()
}

/// The first active debts in sheet order, each due an estimated 30 days after `now`.
pub fn upcoming_emis(debts: &[Debt], now: DateTime<Local>) -> Vec<UpcomingEmi> {
    let due_date = (now + Duration::days(EMI_DUE_IN_DAYS)).to_rfc3339();
    debts
        .iter()
        .filter(|d| d.is_active())
        .take(DASHBOARD_LIST_LEN)
        .map(|d| UpcomingEmi {
            id: d.id().to_string(),
            lender: d.lender().to_string(),
            amount: d.emi_amount(),
            due_date: due_date.clone(),
            due_date_estimated: true,
        })
        .collect()
}

/// Estimates how many installments are left on `debt`.
///
/// The estimate is the number of EMIs needed to clear the balance, capped by the number of 30-day
/// periods until the end date. It is 0 when there is no balance or no EMI. An end date that cannot
/// be parsed does not cap the estimate.
pub fn months_remaining(debt: &Debt, now: DateTime<Local>) -> u64 {
    let balance = debt.current_balance().value();
    let emi = debt.emi_amount().value();
    if balance <= Decimal::ZERO || emi <= Decimal::ZERO {
        return 0;
    }
    let by_balance = balance
        .checked_div(emi)
        .and_then(|d| d.ceil().to_u64())
        .unwrap_or(u64::MAX);

    match parse_sheet_date(debt.end_date()) {
        Some(end) => {
            let days = (end - now.date_naive()).num_days();
            let by_date = if days <= 0 {
                0
            } else {
                (days as u64).div_ceil(EMI_DUE_IN_DAYS as u64)
            };
            by_balance.min(by_date)
        }
        None => by_balance,
    }
}
