//! Money parsing for user-entered amounts.
//!
//! # Responsibility
//! - Turn free-form amount text into an exact `Decimal`.
//! - Keep one currency with cent precision.
//!
//! # Invariants
//! - Parsed amounts never carry more than `MONEY_SCALE` fractional digits.
//! - Parsing never goes through binary floating point.

use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Number of fractional digits a money value may carry.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a single money field may hold (one trillion).
///
/// Keeps sums over any realistic number of events far from `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

const CURRENCY_PREFIX: &str = "R$";

static PLAIN_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:[.,]\d{1,2})?$").expect("valid plain amount regex"));
static DOT_GROUPED_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?$").expect("valid dot-grouped amount regex")
});
static COMMA_GROUPED_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?$").expect("valid comma-grouped amount regex")
});

/// Parses an amount typed by the user.
///
/// Accepted shapes (optional `R$` prefix and leading `-`):
/// - `1500`, `1500.5`, `1500,50`
/// - `1.500`, `1.500,50` (dot thousands, comma decimals)
/// - `1,500`, `1,500.50` (comma thousands, dot decimals)
///
/// # Errors
/// - `ValidationError::InvalidAmount` for anything else, including blanks.
pub fn parse_amount(input: &str) -> Result<Decimal, ValidationError> {
    let invalid = || ValidationError::InvalidAmount(input.trim().to_string());

    let mut text = input.trim();
    let negative = text.starts_with('-');
    if negative {
        text = text[1..].trim_start();
    }
    if let Some(rest) = text.strip_prefix(CURRENCY_PREFIX) {
        text = rest.trim_start();
    }

    let canonical = if PLAIN_AMOUNT_RE.is_match(text) {
        text.replace(',', ".")
    } else if DOT_GROUPED_AMOUNT_RE.is_match(text) {
        text.replace('.', "").replace(',', ".")
    } else if COMMA_GROUPED_AMOUNT_RE.is_match(text) {
        text.replace(',', "")
    } else {
        return Err(invalid());
    };

    let value = Decimal::from_str(&canonical).map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

/// Parses an optional total; blank or unparseable input falls back to zero.
///
/// A parseable negative value is still reported so it never lands in the
/// ledger silently.
pub fn parse_total_or_zero(input: Option<&str>) -> Result<Decimal, ValidationError> {
    let Some(raw) = input else {
        return Ok(Decimal::ZERO);
    };
    match parse_amount(raw) {
        Ok(value) => ensure_non_negative("total_amount", value),
        Err(_) => Ok(Decimal::ZERO),
    }
}

/// Rejects values below zero.
pub fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::NegativeAmount { field, value });
    }
    Ok(value)
}

/// Rejects values above `MAX_AMOUNT`.
pub fn ensure_within_limit(value: Decimal) -> Result<Decimal, ValidationError> {
    if value > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(value));
    }
    Ok(value)
}

/// Rejects values with sub-cent precision.
pub fn ensure_money_scale(value: Decimal) -> Result<Decimal, ValidationError> {
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError::InvalidAmount(value.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{
        ensure_money_scale, ensure_within_limit, parse_amount, parse_total_or_zero, MAX_AMOUNT,
    };
    use crate::model::validation::ValidationError;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn parses_plain_and_decimal_comma_inputs() {
        assert_eq!(parse_amount("1500").unwrap(), d("1500"));
        assert_eq!(parse_amount("1500.5").unwrap(), d("1500.5"));
        assert_eq!(parse_amount(" 1500,50 ").unwrap(), d("1500.50"));
        assert_eq!(parse_amount("0,01").unwrap(), d("0.01"));
    }

    #[test]
    fn parses_grouped_inputs_and_currency_prefix() {
        assert_eq!(parse_amount("1.500,50").unwrap(), d("1500.50"));
        assert_eq!(parse_amount("1,500.50").unwrap(), d("1500.50"));
        assert_eq!(parse_amount("R$ 2.000").unwrap(), d("2000"));
        assert_eq!(parse_amount("12.345.678").unwrap(), d("12345678"));
    }

    #[test]
    fn keeps_leading_minus_for_later_rejection() {
        assert_eq!(parse_amount("-50").unwrap(), d("-50"));
    }

    #[test]
    fn rejects_garbage_and_sub_cent_text() {
        for input in ["", "abc", "12,345,67", "1.2.3", "10,1234", "1e5"] {
            let err = parse_amount(input).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidAmount(_)), "{input}");
        }
    }

    #[test]
    fn total_falls_back_to_zero_but_reports_negative() {
        assert_eq!(parse_total_or_zero(None).unwrap(), Decimal::ZERO);
        assert_eq!(parse_total_or_zero(Some("n/a")).unwrap(), Decimal::ZERO);
        assert_eq!(parse_total_or_zero(Some("800")).unwrap(), d("800"));
        assert!(matches!(
            parse_total_or_zero(Some("-1")),
            Err(ValidationError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn money_scale_rejects_fractions_of_a_cent() {
        assert!(ensure_money_scale(d("10.50")).is_ok());
        assert!(ensure_money_scale(d("10.500")).is_ok());
        assert!(ensure_money_scale(d("10.001")).is_err());
    }

    #[test]
    fn amount_limit_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, d("1000000000000"));
        assert!(ensure_within_limit(MAX_AMOUNT).is_ok());
        assert!(matches!(
            ensure_within_limit(d("1000000000000.01")),
            Err(ValidationError::AmountTooLarge(_))
        ));
    }
}
