use crate::model::validate::{Bound, Payload, ValidationErrors};
use crate::model::{cell, lenient_amount, lenient_percent, Amount, Record};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use tracing::debug;

/// Represents a single row from the Debts sheet.
///
/// The `id` is not stored in the sheet. It is derived from the row position when the sheet is read
/// (`debt_<row>`), so it changes if rows above it are inserted or removed.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub(crate) id: String,
    pub(crate) lender: String,
    pub(crate) loan_type: String,
    pub(crate) principal_amount: Amount,
    pub(crate) current_balance: Amount,
    pub(crate) emi_amount: Amount,
    /// Annual rate in percent, e.g. `8.5`.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub(crate) interest_rate: Decimal,
    pub(crate) start_date: String,
    pub(crate) end_date: String,
    pub(crate) status: DebtStatus,
    pub(crate) notes: String,
}

impl Debt {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lender(&self) -> &str {
        &self.lender
    }

    pub fn current_balance(&self) -> Amount {
        self.current_balance
    }

    pub fn emi_amount(&self) -> Amount {
        self.emi_amount
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn status(&self) -> &DebtStatus {
        &self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == DebtStatus::Active
    }
}

impl Record for Debt {
    const KIND: &'static str = "debt";
    const SHEET: &'static str = DEBTS;
    const MIN_CELLS: usize = 9;

    fn headers() -> Vec<String> {
        DebtColumn::ALL.iter().map(|c| c.to_string()).collect()
    }

    fn encode(&self) -> Vec<String> {
        vec![
            self.lender.clone(),
            self.loan_type.clone(),
            self.principal_amount.to_cell(),
            self.current_balance.to_cell(),
            self.emi_amount.to_cell(),
            self.interest_rate.to_string(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.status.to_string(),
            self.notes.clone(),
        ]
    }

    fn decode(row_index: usize, cells: &[String]) -> Option<Self> {
        if cells.len() < Self::MIN_CELLS {
            return None;
        }
        let money = |col: DebtColumn| {
            let parsed = lenient_amount(cell(cells, col as usize));
            if parsed.is_defaulted() {
                debug!("{} row {row_index}: {col} is not a number, using 0", Self::SHEET);
            }
            parsed.value()
        };
        let interest_rate = lenient_percent(cell(cells, DebtColumn::InterestRate as usize));
        if interest_rate.is_defaulted() {
            debug!("{} row {row_index}: interest rate is not a number, using 0", Self::SHEET);
        }
        Some(Self {
            id: Self::id_for(row_index),
            lender: cell(cells, DebtColumn::Lender as usize).to_string(),
            loan_type: cell(cells, DebtColumn::LoanType as usize).to_string(),
            principal_amount: money(DebtColumn::PrincipalAmount),
            current_balance: money(DebtColumn::CurrentBalance),
            emi_amount: money(DebtColumn::EmiAmount),
            interest_rate: interest_rate.value(),
            start_date: cell(cells, DebtColumn::StartDate as usize).to_string(),
            end_date: cell(cells, DebtColumn::EndDate as usize).to_string(),
            status: cell(cells, DebtColumn::Status as usize).parse().unwrap_or_default(),
            notes: cell(cells, DebtColumn::Notes as usize).to_string(),
        })
    }

    fn from_payload(data: &Value) -> Result<Self, ValidationErrors> {
        let mut p = Payload::new(data);
        let status = match p.raw("status") {
            None => DebtStatus::Active,
            Some(Value::String(s)) => match DebtStatus::from_str(s).unwrap_or_default() {
                DebtStatus::Other(_) => {
                    p.reject("status", STATUS_MESSAGE);
                    DebtStatus::Active
                }
                known => known,
            },
            Some(_) => {
                p.reject("status", STATUS_MESSAGE);
                DebtStatus::Active
            }
        };
        let debt = Self {
            id: String::new(),
            lender: p.text("lender", "Lender name is required"),
            loan_type: p.text("loanType", "Loan type is required"),
            principal_amount: p.amount(
                "principalAmount",
                Bound::Positive("Principal amount must be positive"),
            ),
            current_balance: p.amount(
                "currentBalance",
                Bound::NonNegative("Current balance cannot be negative"),
            ),
            emi_amount: p.amount("emiAmount", Bound::Positive("EMI amount must be positive")),
            interest_rate: p.percent(
                "interestRate",
                Bound::NonNegative("Interest rate cannot be negative"),
            ),
            start_date: p.date("startDate"),
            end_date: p.date("endDate"),
            status,
            notes: p.optional_text("notes"),
        };
        p.finish(debt)
    }
}

const STATUS_MESSAGE: &str = "Status must be one of Active, Completed, Defaulted, Prepaid";

/// The lifecycle state of a loan. Cells holding anything other than the four known labels decode
/// to `Other`, which is never treated as active.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub enum DebtStatus {
    #[default]
    Active,
    Completed,
    Defaulted,
    Prepaid,
    Other(String),
}

impl DebtStatus {
    fn as_str(&self) -> &str {
        match self {
            DebtStatus::Active => "Active",
            DebtStatus::Completed => "Completed",
            DebtStatus::Defaulted => "Defaulted",
            DebtStatus::Prepaid => "Prepaid",
            DebtStatus::Other(s) => s,
        }
    }
}

impl Display for DebtStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebtStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "Active" => DebtStatus::Active,
            "Completed" => DebtStatus::Completed,
            "Defaulted" => DebtStatus::Defaulted,
            "Prepaid" => DebtStatus::Prepaid,
            other => DebtStatus::Other(other.to_string()),
        })
    }
}

impl Serialize for DebtStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DebtStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(DebtStatus::from_str(&s).unwrap_or_default())
    }
}

/// The name of the sheet that holds debts and loans.
pub const DEBTS: &str = "Debts";

/// The columns of the Debts sheet, in order. The serialized name is the header text.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum DebtColumn {
    Lender,
    #[serde(rename = "Loan Type")]
    LoanType,
    #[serde(rename = "Principal Amount")]
    PrincipalAmount,
    #[serde(rename = "Current Balance")]
    CurrentBalance,
    #[serde(rename = "EMI Amount")]
    EmiAmount,
    #[serde(rename = "Interest Rate")]
    InterestRate,
    #[serde(rename = "Start Date")]
    StartDate,
    #[serde(rename = "End Date")]
    EndDate,
    Status,
    Notes,
}

serde_plain::derive_display_from_serialize!(DebtColumn);
serde_plain::derive_fromstr_from_deserialize!(DebtColumn);

impl DebtColumn {
    pub const ALL: [DebtColumn; 10] = [
        DebtColumn::Lender,
        DebtColumn::LoanType,
        DebtColumn::PrincipalAmount,
        DebtColumn::CurrentBalance,
        DebtColumn::EmiAmount,
        DebtColumn::InterestRate,
        DebtColumn::StartDate,
        DebtColumn::EndDate,
        DebtColumn::Status,
        DebtColumn::Notes,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::row;
    use serde_json::json;

    fn car_loan() -> Debt {
        Debt {
            id: String::new(),
            lender: "City Bank".to_string(),
            loan_type: "Car Loan".to_string(),
            principal_amount: Amount::from_str("20000").unwrap(),
            current_balance: Amount::from_str("12500.50").unwrap(),
            emi_amount: Amount::from_str("450").unwrap(),
            interest_rate: Decimal::from_str("7.25").unwrap(),
            start_date: "2023-01-01".to_string(),
            end_date: "2027-12-31".to_string(),
            status: DebtStatus::Active,
            notes: String::new(),
        }
    }

    #[test]
    fn test_headers() {
        let headers = Debt::headers();
        assert_eq!(headers.len(), 10);
        assert_eq!(headers[4], "EMI Amount");
        assert_eq!(headers[9], "Notes");
    }

    #[test]
    fn test_round_trip() {
        let original = car_loan();
        let decoded = Debt::decode(1, &original.encode()).unwrap();
        assert_eq!(decoded.id, "debt_1");
        assert_eq!(Debt { id: String::new(), ..decoded }, original);
    }

    #[test]
    fn test_short_row_is_skipped() {
        let cells = row(&["Bank", "Home Loan", "1", "1", "1", "1", "2020-01-01", "2030-01-01"]);
        assert!(Debt::decode(1, &cells).is_none());
    }

    #[test]
    fn test_lenient_cells() {
        let cells = row(&[
            "Bank",
            "Home Loan",
            "$250,000.00",
            "oops",
            "1,800",
            "6.5%",
            "2020-01-01",
            "2045-01-01",
            "Paused",
        ]);
        let debt = Debt::decode(3, &cells).unwrap();
        assert_eq!(debt.principal_amount, Amount::from_str("250000").unwrap());
        assert_eq!(debt.current_balance, Amount::ZERO);
        assert_eq!(debt.emi_amount, Amount::from_str("1800").unwrap());
        assert_eq!(debt.interest_rate, Decimal::from_str("6.5").unwrap());
        assert_eq!(debt.status, DebtStatus::Other("Paused".to_string()));
        assert!(!debt.is_active());
        assert_eq!(debt.notes, "");
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["Active", "Completed", "Defaulted", "Prepaid"] {
            assert_eq!(DebtStatus::from_str(s).unwrap().to_string(), s);
        }
        assert_eq!(
            serde_json::to_value(DebtStatus::Prepaid).unwrap(),
            json!("Prepaid")
        );
    }

    #[test]
    fn test_from_payload_defaults_status() {
        let data = json!({
            "lender": "City Bank",
            "loanType": "Car Loan",
            "principalAmount": 20000,
            "currentBalance": "12500.50",
            "emiAmount": 450,
            "interestRate": 7.25,
            "startDate": "2023-01-01",
            "endDate": "2027-12-31"
        });
        let debt = Debt::from_payload(&data).unwrap();
        assert_eq!(debt, car_loan());
    }

    #[test]
    fn test_from_payload_errors() {
        let data = json!({
            "lender": "",
            "loanType": "Car Loan",
            "principalAmount": 0,
            "currentBalance": -1,
            "emiAmount": 450,
            "interestRate": -0.5,
            "startDate": "2023-01-01",
            "endDate": "2027-12-31",
            "status": "Paused"
        });
        let errors = Debt::from_payload(&data).unwrap_err();
        assert_eq!(errors.message_for("lender"), Some("Lender name is required"));
        assert_eq!(
            errors.message_for("principalAmount"),
            Some("Principal amount must be positive")
        );
        assert_eq!(
            errors.message_for("currentBalance"),
            Some("Current balance cannot be negative")
        );
        assert_eq!(
            errors.message_for("interestRate"),
            Some("Interest rate cannot be negative")
        );
        assert_eq!(errors.message_for("status"), Some(STATUS_MESSAGE));
        assert_eq!(errors.message_for("emiAmount"), None);
    }

    #[test]
    fn test_serialize() {
        let v = serde_json::to_value(car_loan()).unwrap();
        assert_eq!(v["loanType"], "Car Loan");
        assert_eq!(v["interestRate"], 7.25);
        assert_eq!(v["currentBalance"], 12500.5);
        assert_eq!(v["status"], "Active");
    }
}
