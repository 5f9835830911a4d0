use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reasons an amount column could not be turned into a [`Decimal`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("malformed amount {0:?}")]
    Malformed(String),
    #[error("amount {0:?} is out of range")]
    OutOfRange(String),
}

/// Parse a money or quantity string as entered in the farm UI.
///
/// Either `.` or `,` is accepted as the decimal separator (`"12,50"` and
/// `"12.50"` are the same amount), surrounding whitespace is ignored and a
/// leading sign is allowed. Thousands separators, exponents and anything with
/// more than one separator are rejected rather than guessed at.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (int_part, frac_part) = match unsigned.find(|c: char| c == '.' || c == ',') {
        Some(idx) => (&unsigned[..idx], &unsigned[idx + 1..]),
        None => (unsigned, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let no_digits = int_part.is_empty() && frac_part.is_empty();
    if !all_digits(int_part) || !all_digits(frac_part) || no_digits {
        return Err(AmountError::Malformed(raw.to_string()));
    }

    let mut normalized = String::with_capacity(unsigned.len() + 2);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        normalized.push('.');
        normalized.push_str(frac_part);
    }

    Decimal::from_str(&normalized).map_err(|_| AmountError::OutOfRange(raw.to_string()))
}

/// Round to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A numeric column exactly as the store returned it.
///
/// Older rows hold text (often with a comma separator) where newer rows hold
/// JSON numbers, so parsing is deferred until the value is used and a bad
/// value fails only the row it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    pub fn to_decimal(&self) -> Result<Decimal, AmountError> {
        match self {
            RawAmount::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Decimal::from(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Decimal::from(u))
                } else {
                    let f = n
                        .as_f64()
                        .ok_or_else(|| AmountError::Malformed(n.to_string()))?;
                    parse_amount(&f.to_string())
                }
            }
            RawAmount::Text(s) => parse_amount(s),
        }
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        match value.to_f64().and_then(serde_json::Number::from_f64) {
            Some(n) => RawAmount::Number(n),
            None => RawAmount::Text(value.to_string()),
        }
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Number(value.into())
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

/// Parse an optional column, treating an absent value as zero.
pub fn decimal_or_zero(value: Option<&RawAmount>) -> Result<Decimal, AmountError> {
    value.map_or(Ok(Decimal::ZERO), RawAmount::to_decimal)
}
