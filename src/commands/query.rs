//! Read commands: the dashboard and the list views.

use crate::aggregate::months_remaining;
use crate::commands::Out;
use crate::ledger::{Ledger, ListKind, ReadResponse};
use crate::Result;
use chrono::{DateTime, Local};

/// Reads the dashboard.
pub async fn dashboard(ledger: &Ledger) -> Result<Out<ReadResponse>> {
    Ok(read(ledger, ListKind::Dashboard, Local::now()).await)
}

/// Reads the expenses, the debts or their summary.
pub async fn list(ledger: &Ledger, kind: ListKind) -> Result<Out<ReadResponse>> {
    Ok(read(ledger, kind, Local::now()).await)
}

async fn read(ledger: &Ledger, kind: ListKind, now: DateTime<Local>) -> Out<ReadResponse> {
    let response = ledger.read(kind, now).await;
    let message = describe(&response, now);
    Out::new(message, response)
}

/// A human-readable summary of `response`.
fn describe(response: &ReadResponse, now: DateTime<Local>) -> String {
    match response {
        ReadResponse::NotConfigured(payload) => payload.message().to_string(),
        ReadResponse::Dashboard(d) => format!(
            "Total expenses: {}, this month: {}, outstanding debt: {} across {} active loan(s)",
            d.total_expenses(),
            d.monthly_expenses(),
            d.total_debts(),
            d.active_loans()
        ),
        ReadResponse::Expenses { expenses } => format!("{} expense(s)", expenses.len()),
        ReadResponse::Debts { debts } => {
            let mut lines = vec![format!("{} debt(s)", debts.len())];
            for debt in debts.iter().filter(|d| d.is_active()) {
                lines.push(format!(
                    "  {}: {} outstanding, {} per month, about {} month(s) remaining",
                    debt.lender(),
                    debt.current_balance(),
                    debt.emi_amount(),
                    months_remaining(debt, now)
                ));
            }
            lines.join("\n")
        }
        ReadResponse::Summary { expenses, debts } => format!(
            "{} expense(s) totalling {} (average {}); {} active loan(s) with {} outstanding and \
             {} due monthly; {} completed loan(s)",
            expenses.count(),
            expenses.total(),
            expenses.average(),
            debts.active_loans(),
            debts.total_balance(),
            debts.monthly_emi(),
            debts.completed_loans()
        ),
    }
}
