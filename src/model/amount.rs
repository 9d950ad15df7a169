//! Amount type for handling monetary values stored in sheet cells.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that may
//! or may not include a dollar sign and commas. Cells appended with `USER_ENTERED` semantics are
//! coerced by the remote sheet and can come back currency-formatted, e.g. `$1,234.50`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Represents a dollar amount.
///
/// Equality is numeric, so `Amount::from_str("$5,000.00")` equals `Amount::from_str("5000")`.
/// `Display` renders currency formatting for messages; `to_cell` renders the plain decimal that is
/// written to the sheet.
///
/// # Examples
///
/// ```
/// # use fintrack::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-$1,250.50").unwrap();
/// assert_eq!(amount.to_string(), "-$1,250.50");
/// assert_eq!(amount.to_cell(), "-1250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// The plain decimal representation written to a sheet cell, e.g. `1250.50`.
    pub fn to_cell(&self) -> String {
        self.0.to_string()
    }
}

/// An error that can occur when parsing strings into `Decimal` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Remove dollar sign if present: "-$50.00", "$50.00" or "50.00"
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().to_f64().unwrap_or_default();
        write!(f, "{sign}${}", format_num::format_num!(",.2", num))
    }
}

/// Amounts travel as JSON numbers.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.0.to_f64().unwrap_or_default())
    }
}

/// Accepts either a JSON number or a string such as `"12.50"` or `"$1,200"`.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
        Decimal::try_from(v).map(Amount).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }
}

/// Addition saturates at `Decimal::MAX` and `Decimal::MIN`. Cells are edited by hand, so a sum
/// over them must not overflow.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

/// The outcome of reading a numeric cell leniently. A cell that cannot be parsed does not fail the
/// read; it decodes to zero, and the `Defaulted` tag keeps that distinguishable from a real zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lenient<T> {
    Parsed(T),
    Defaulted(T),
}

impl<T> Lenient<T> {
    pub fn value(self) -> T {
        match self {
            Lenient::Parsed(v) | Lenient::Defaulted(v) => v,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Lenient::Defaulted(_))
    }
}

/// Parses a money cell, defaulting to zero for blank or non-numeric content.
pub fn lenient_amount(cell: &str) -> Lenient<Amount> {
    if cell.trim().is_empty() {
        return Lenient::Defaulted(Amount::ZERO);
    }
    match Amount::from_str(cell) {
        Ok(amount) => Lenient::Parsed(amount),
        Err(_) => Lenient::Defaulted(Amount::ZERO),
    }
}

/// Parses a percentage cell such as `8.5` or `8.5%`, defaulting to zero.
pub fn lenient_percent(cell: &str) -> Lenient<Decimal> {
    let trimmed = cell.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    match Decimal::from_str(number) {
        Ok(value) => Lenient::Parsed(value),
        Err(_) => Lenient::Defaulted(Decimal::ZERO),
    }
}
