//! Validation of write payloads into typed records.
//!
//! The `data` object of a write request carries record fields as strings or numbers. `Payload`
//! reads those fields one at a time and collects every problem it finds, so the caller gets the
//! complete list of field errors in one response.

use crate::model::date::parse_sheet_date;
use crate::model::Amount;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A single problem with a single field of a write payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All of the problems found in a write payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Returns the message recorded for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// The lower bound a numeric field must satisfy.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Bound {
    /// Strictly greater than zero.
    Positive(&'static str),
    /// Zero or greater.
    NonNegative(&'static str),
}

impl Bound {
    fn check(&self, value: Decimal) -> Option<&'static str> {
        match self {
            Bound::Positive(msg) if value <= Decimal::ZERO => Some(*msg),
            Bound::NonNegative(msg) if value < Decimal::ZERO => Some(*msg),
            _ => None,
        }
    }
}

const REQUIRED: &str = "Required";
const EXPECTED_STRING: &str = "Expected string";
const EXPECTED_NUMBER: &str = "Expected number";
const INVALID_DATE: &str = "Invalid date";

/// Reads typed fields out of a JSON payload, accumulating errors as it goes.
pub(crate) struct Payload<'a> {
    fields: Option<&'a Map<String, Value>>,
    errors: ValidationErrors,
}

impl<'a> Payload<'a> {
    pub(crate) fn new(data: &'a Value) -> Self {
        let mut errors = ValidationErrors::default();
        let fields = data.as_object();
        if fields.is_none() {
            errors.push("data", "Expected object");
        }
        Self { fields, errors }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|m| m.get(field))
            .filter(|v| !v.is_null())
    }

    /// A required, non-empty text field. `required` is the message used when it is missing or
    /// empty.
    pub(crate) fn text(&mut self, field: &str, required: &str) -> String {
        match self.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) | None => {
                self.errors.push(field, required);
                String::new()
            }
            Some(_) => {
                self.errors.push(field, EXPECTED_STRING);
                String::new()
            }
        }
    }

    /// An optional text field; absent or null reads as the empty string.
    pub(crate) fn optional_text(&mut self, field: &str) -> String {
        match self.get(field) {
            Some(Value::String(s)) => s.clone(),
            None => String::new(),
            Some(_) => {
                self.errors.push(field, EXPECTED_STRING);
                String::new()
            }
        }
    }

    /// A required date field. The text is kept as entered once it is known to parse.
    pub(crate) fn date(&mut self, field: &str) -> String {
        match self.get(field) {
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.errors.push(field, REQUIRED);
                String::new()
            }
            Some(Value::String(s)) => {
                if parse_sheet_date(s).is_none() {
                    self.errors.push(field, INVALID_DATE);
                }
                s.trim().to_string()
            }
            None => {
                self.errors.push(field, REQUIRED);
                String::new()
            }
            Some(_) => {
                self.errors.push(field, EXPECTED_STRING);
                String::new()
            }
        }
    }

    /// A required money field that must satisfy `bound`.
    pub(crate) fn amount(&mut self, field: &str, bound: Bound) -> Amount {
        Amount::new(self.decimal(field, bound, |s| {
            Amount::from_str(s).ok().map(|a| a.value())
        }))
    }

    /// A required percentage field that must satisfy `bound`. A trailing `%` is accepted.
    pub(crate) fn percent(&mut self, field: &str, bound: Bound) -> Decimal {
        self.decimal(field, bound, |s| {
            let s = s.trim();
            Decimal::from_str(s.strip_suffix('%').unwrap_or(s).trim()).ok()
        })
    }

    fn decimal<F>(&mut self, field: &str, bound: Bound, parse_str: F) -> Decimal
    where
        F: Fn(&str) -> Option<Decimal>,
    {
        let parsed = match self.get(field) {
            None => {
                self.errors.push(field, REQUIRED);
                return Decimal::ZERO;
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.errors.push(field, REQUIRED);
                return Decimal::ZERO;
            }
            Some(Value::String(s)) => parse_str(s),
            Some(Value::Number(n)) => {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .ok()
            }
            Some(_) => None,
        };
        match parsed {
            Some(value) => {
                if let Some(msg) = bound.check(value) {
                    self.errors.push(field, msg);
                }
                value
            }
            None => {
                self.errors.push(field, EXPECTED_NUMBER);
                Decimal::ZERO
            }
        }
    }

    /// Records an error for `field` that was detected by the caller.
    pub(crate) fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(field, message);
    }

    pub(crate) fn raw(&self, field: &str) -> Option<&'a Value> {
        self.get(field)
    }

    /// Returns `value` if no errors were recorded, otherwise every error that was.
    pub(crate) fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}
