//! Input validation errors shared by all gigbook records.
//!
//! Every variant is detectable without touching storage, except the two
//! balance checks which compare against the row read inside the write
//! transaction.

use crate::model::event::EventStatus;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Client-detectable bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    EmptyField(&'static str),
    /// Calendar date is not a valid `YYYY-MM-DD` value.
    InvalidDate(String),
    /// Time of day is not a valid `HH:MM` value.
    InvalidTime(String),
    /// Amount text cannot be parsed as a money value.
    InvalidAmount(String),
    /// Money value is above the supported maximum.
    AmountTooLarge(Decimal),
    /// Money field is below zero.
    NegativeAmount {
        field: &'static str,
        value: Decimal,
    },
    /// Payment amount is zero or negative.
    NonPositivePayment(Decimal),
    /// Payment would push `paid_amount` above `total_amount`.
    PaymentExceedsBalance { amount: Decimal, remaining: Decimal },
    /// Edited total is lower than what was already received.
    TotalBelowPaid { total: Decimal, paid: Decimal },
    /// Template has no non-blank item left after filtering.
    EmptyTemplateItems,
    /// Status change rejected by the strict transition policy.
    StatusTransition { from: EventStatus, to: EventStatus },
    /// Nil UUID supplied where a stable identity is required.
    NilId,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidTime(value) => write!(f, "invalid time `{value}`; expected HH:MM"),
            Self::InvalidAmount(value) => write!(f, "invalid amount `{value}`"),
            Self::AmountTooLarge(value) => {
                write!(f, "amount {value} exceeds the supported maximum")
            }
            Self::NegativeAmount { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::NonPositivePayment(amount) => {
                write!(f, "payment amount must be positive, got {amount}")
            }
            Self::PaymentExceedsBalance { amount, remaining } => write!(
                f,
                "payment of {amount} exceeds the remaining balance of {remaining}"
            ),
            Self::TotalBelowPaid { total, paid } => write!(
                f,
                "total_amount {total} is below the {paid} already received"
            ),
            Self::EmptyTemplateItems => {
                write!(f, "template needs at least one non-empty item")
            }
            Self::StatusTransition { from, to } => write!(
                f,
                "status change from {} to {} is not allowed",
                from.as_code(),
                to.as_code()
            ),
            Self::NilId => write!(f, "id must not be nil"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims optional text and collapses blank values to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}
