//! Write commands: add an expense or a debt.
//!
//! The arguments are turned into the same JSON payload the HTTP API receives so that the command
//! line and the API share one validation path.

use crate::args::{AddDebtArgs, AddExpenseArgs};
use crate::commands::Out;
use crate::ledger::{Ledger, WriteRequest};
use crate::model::EntityKind;
use crate::Result;
use serde_json::{json, Value};

pub async fn add_expense(ledger: &Ledger, args: &AddExpenseArgs) -> Result<Out<Value>> {
    let mut data = json!({
        "date": args.date(),
        "description": args.description(),
        "category": args.category(),
        "paymentMethod": args.payment_method(),
        "amount": args.amount(),
    });
    insert_optional(&mut data, "notes", args.notes());
    append(ledger, EntityKind::Expense, data).await
}

pub async fn add_debt(ledger: &Ledger, args: &AddDebtArgs) -> Result<Out<Value>> {
    let mut data = json!({
        "lender": args.lender(),
        "loanType": args.loan_type(),
        "principalAmount": args.principal_amount(),
        "currentBalance": args.current_balance(),
        "emiAmount": args.emi_amount(),
        "interestRate": args.interest_rate(),
        "startDate": args.start_date(),
        "endDate": args.end_date(),
    });
    insert_optional(&mut data, "status", args.status());
    insert_optional(&mut data, "notes", args.notes());
    append(ledger, EntityKind::Debt, data).await
}

async fn append(ledger: &Ledger, kind: EntityKind, data: Value) -> Result<Out<Value>> {
    let ack = ledger
        .append(&WriteRequest::new(kind, data.clone()))
        .await?;
    Ok(Out::new(ack.message(), data))
}

fn insert_optional(data: &mut Value, key: &str, value: Option<&str>) {
    if let (Some(map), Some(value)) = (data.as_object_mut(), value) {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Debt, DebtStatus, Expense, Record, DEBTS, EXPENSES};
    use crate::test::TestEnv;
    use crate::Error;

    fn lunch(amount: &str, notes: Option<String>) -> AddExpenseArgs {
        AddExpenseArgs::new("2025-10-15", "Lunch", "Food & Dining", "Cash", amount, notes)
    }

    #[tokio::test]
    async fn test_add_expense() {
        let env = TestEnv::with_rows(vec![], vec![]);
        let out = add_expense(env.ledger(), &lunch("12.50", Some("team".into())))
            .await
            .unwrap();
        assert_eq!(out.message(), "Expense added successfully to Google Sheets");
        let rows = env.sheet().rows(EXPENSES).await.unwrap();
        let expense = Expense::decode(1, &rows[1]).unwrap();
        assert_eq!(expense.description(), "Lunch");
        assert_eq!(rows[1][5], "team");
    }

    #[tokio::test]
    async fn test_add_expense_rejects_negative_amount() {
        let env = TestEnv::with_rows(vec![], vec![]);
        let err = add_expense(env.ledger(), &lunch("-5", None))
            .await
            .unwrap_err();
        let Error::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.message_for("amount"), Some("Amount must be positive"));
        assert_eq!(env.sheet().append_count(), 0);
    }

    #[tokio::test]
    async fn test_add_debt() {
        let env = TestEnv::with_rows(vec![], vec![]);
        let args = AddDebtArgs::new(
            "City Bank",
            "Car Loan",
            "20000",
            "12500",
            "450",
            "7.25",
            "2023-01-01",
            "2027-12-31",
            Some("Prepaid".into()),
            None,
        );
        let out = add_debt(env.ledger(), &args).await.unwrap();
        assert_eq!(out.message(), "Debt/Loan added successfully to Google Sheets");
        let debts = Debt::decode_all(&env.sheet().rows(DEBTS).await.unwrap());
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].status(), &DebtStatus::Prepaid);
    }
}
