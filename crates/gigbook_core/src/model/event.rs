//! Event (booking) domain model.
//!
//! # Responsibility
//! - Define the booking record, its status variant and the edit shapes.
//! - Own the paid/total accounting rule.
//!
//! # Invariants
//! - `0 <= paid_amount <= total_amount` for every valid event.
//! - `paid_amount` only moves through `apply_payment`; drafts and patches
//!   cannot set it.
//! - `client_name`/`client_phone` are a snapshot taken at creation, not a
//!   reference to a client record.

use crate::identity::UserId;
use crate::model::money::{
    ensure_money_scale, ensure_non_negative, ensure_within_limit, parse_total_or_zero,
};
use crate::model::validation::{optional_text, require_text, ValidationError};
use chrono::{DateTime, NaiveDate, NaiveTime, SubsecRound, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one event.
pub type EventId = Uuid;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
const TIME_FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

/// Start time used when a draft leaves it out.
pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

/// Booking lifecycle state.
///
/// Serialized with the codes already present in the hosted data set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventStatus {
    /// Price sent, not yet accepted.
    #[default]
    #[serde(rename = "orcado")]
    Quoted,
    /// Client accepted the booking.
    #[serde(rename = "confirmado")]
    Confirmed,
    /// Work delivered.
    #[serde(rename = "concluido")]
    Completed,
    /// Booking called off.
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 4] = [
        EventStatus::Quoted,
        EventStatus::Confirmed,
        EventStatus::Completed,
        EventStatus::Cancelled,
    ];

    /// Persisted/wire code for this status.
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Quoted => "orcado",
            Self::Confirmed => "confirmado",
            Self::Completed => "concluido",
            Self::Cancelled => "cancelado",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value {
            "orcado" => Some(Self::Quoted),
            "confirmado" => Some(Self::Confirmed),
            "concluido" => Some(Self::Completed),
            "cancelado" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether the booking still lies ahead (not completed, not cancelled).
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Rule set for status changes made through event updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any status may be replaced by any other.
    #[default]
    Open,
    /// Quoted -> Confirmed -> Completed, any status -> Cancelled.
    Strict,
}

impl StatusPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn allows(self, from: EventStatus, to: EventStatus) -> bool {
        if from == to {
            return true;
        }
        match self {
            Self::Open => true,
            Self::Strict => matches!(
                (from, to),
                (EventStatus::Quoted, EventStatus::Confirmed)
                    | (EventStatus::Confirmed, EventStatus::Completed)
                    | (_, EventStatus::Cancelled)
            ),
        }
    }
}

/// Canonical booking record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub user_id: UserId,
    pub client_name: String,
    #[serde(default)]
    pub client_phone: String,
    pub title: String,
    /// Serialized as `type` to match the persisted schema.
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm_opt", default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub location: Option<String>,
    pub status: EventStatus,
    /// Agreed price.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Cumulative amount received.
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw creation input, shaped like the booking form.
///
/// Text fields are parsed and validated by `Event::from_draft`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub client_name: String,
    pub client_phone: String,
    pub title: String,
    pub event_type: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`; defaults to 09:00.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    /// Defaults to `EventStatus::Quoted`.
    pub status: Option<EventStatus>,
    /// Blank or unparseable text becomes zero.
    pub total_amount: Option<String>,
    /// Ignored: new events always start unpaid.
    pub paid_amount: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for an existing event.
///
/// `None` leaves a field untouched. For nullable fields, `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub event_type: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<Option<NaiveTime>>,
    pub location: Option<Option<String>>,
    pub status: Option<EventStatus>,
    pub total_amount: Option<Decimal>,
    pub notes: Option<Option<String>>,
}

impl EventPatch {
    /// Patch that only changes the status.
    pub fn status(status: EventStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Event {
    /// Builds a new event from form input for `user_id`.
    ///
    /// # Contract
    /// - `title`, `client_name` must be non-blank; `date` must parse.
    /// - `paid_amount` is zero whatever the draft says.
    /// - Unparseable/absent totals become zero; negative totals are rejected.
    /// - Status defaults to `Quoted`.
    pub fn from_draft(user_id: UserId, draft: &EventDraft) -> Result<Self, ValidationError> {
        let title = require_text("title", &draft.title)?;
        let client_name = require_text("client_name", &draft.client_name)?;
        let date = parse_date(&draft.date)?;
        let start_time = match optional_text(draft.start_time.as_deref()) {
            Some(raw) => parse_time(&raw)?,
            None => default_start_time(),
        };
        let end_time = optional_text(draft.end_time.as_deref())
            .map(|raw| parse_time(&raw))
            .transpose()?;
        let total_amount = parse_total_or_zero(draft.total_amount.as_deref())?;

        let event = Self {
            id: Uuid::new_v4(),
            user_id,
            client_name,
            client_phone: draft.client_phone.trim().to_string(),
            title,
            event_type: optional_text(draft.event_type.as_deref()),
            date,
            start_time,
            end_time,
            location: optional_text(draft.location.as_deref()),
            status: draft.status.unwrap_or_default(),
            total_amount,
            paid_amount: Decimal::ZERO,
            notes: optional_text(draft.notes.as_deref()),
            // Storage keeps microseconds; truncate so read-back compares equal.
            created_at: Utc::now().trunc_subsecs(6),
        };
        event.validate()?;
        Ok(event)
    }

    /// Validates record-level invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        require_text("title", &self.title)?;
        require_text("client_name", &self.client_name)?;
        ensure_non_negative("total_amount", self.total_amount)?;
        ensure_non_negative("paid_amount", self.paid_amount)?;
        ensure_money_scale(self.total_amount)?;
        ensure_money_scale(self.paid_amount)?;
        ensure_within_limit(self.total_amount)?;
        ensure_within_limit(self.paid_amount)?;
        if self.paid_amount > self.total_amount {
            return Err(ValidationError::TotalBelowPaid {
                total: self.total_amount,
                paid: self.paid_amount,
            });
        }
        Ok(())
    }

    /// `total_amount - paid_amount`.
    pub fn remaining_balance(&self) -> Decimal {
        self.total_amount - self.paid_amount
    }

    pub fn is_fully_paid(&self) -> bool {
        self.paid_amount >= self.total_amount
    }

    /// Adds one received payment.
    ///
    /// # Errors
    /// - `NonPositivePayment` when `amount <= 0`.
    /// - `PaymentExceedsBalance` when `amount > remaining_balance()`.
    ///
    /// The event is left untouched on error.
    pub fn apply_payment(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePayment(amount));
        }
        ensure_money_scale(amount)?;
        ensure_within_limit(amount)?;
        let remaining = self.remaining_balance();
        if amount > remaining {
            return Err(ValidationError::PaymentExceedsBalance { amount, remaining });
        }
        self.paid_amount += amount;
        Ok(())
    }

    /// Applies a partial update, all-or-nothing.
    ///
    /// Status changes are checked against `policy`. A new total must still
    /// cover what has already been paid.
    pub fn apply_patch(
        &mut self,
        patch: &EventPatch,
        policy: StatusPolicy,
    ) -> Result<(), ValidationError> {
        let mut next = self.clone();

        if let Some(title) = patch.title.as_deref() {
            next.title = require_text("title", title)?;
        }
        if let Some(client_name) = patch.client_name.as_deref() {
            next.client_name = require_text("client_name", client_name)?;
        }
        if let Some(client_phone) = patch.client_phone.as_deref() {
            next.client_phone = client_phone.trim().to_string();
        }
        if let Some(event_type) = patch.event_type.as_ref() {
            next.event_type = optional_text(event_type.as_deref());
        }
        if let Some(date) = patch.date {
            next.date = date;
        }
        if let Some(start_time) = patch.start_time {
            next.start_time = truncate_to_minute(start_time);
        }
        if let Some(end_time) = patch.end_time {
            next.end_time = end_time.map(truncate_to_minute);
        }
        if let Some(location) = patch.location.as_ref() {
            next.location = optional_text(location.as_deref());
        }
        if let Some(status) = patch.status {
            if !policy.allows(self.status, status) {
                return Err(ValidationError::StatusTransition {
                    from: self.status,
                    to: status,
                });
            }
            next.status = status;
        }
        if let Some(total_amount) = patch.total_amount {
            next.total_amount = ensure_non_negative("total_amount", total_amount)?;
        }
        if let Some(notes) = patch.notes.as_ref() {
            next.notes = optional_text(notes.as_deref());
        }

        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Parses an `HH:MM` (or `HH:MM:SS`) local time of day.
///
/// Seconds are dropped: times are stored at minute precision.
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, TIME_FORMAT_WITH_SECONDS))
        .map(truncate_to_minute)
        .map_err(|_| ValidationError::InvalidTime(trimmed.to_string()))
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(value.hour(), value.minute(), 0).unwrap_or(value)
}

/// Formats a time of day as `HH:MM`.
pub fn format_time(value: NaiveTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

mod hhmm {
    use super::{format_time, parse_time};
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_time(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time(&raw).map_err(serde::de::Error::custom)
    }
}

mod hhmm_opt {
    use super::{format_time, parse_time};
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_some(&format_time(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => {
                parse_time(&raw).map(Some).map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_date, parse_time, Event, EventDraft, EventPatch, EventStatus, StatusPolicy,
    };
    use crate::identity::UserId;
    use crate::model::validation::ValidationError;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn d(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn draft() -> EventDraft {
        EventDraft {
            client_name: "Ana Souza".to_string(),
            title: "Wedding shoot".to_string(),
            date: "2026-11-20".to_string(),
            total_amount: Some("5000".to_string()),
            ..EventDraft::default()
        }
    }

    fn user() -> UserId {
        UserId::parse("user-1").unwrap()
    }

    #[test]
    fn status_codes_roundtrip() {
        for status in EventStatus::ALL {
            assert_eq!(EventStatus::from_code(status.as_code()), Some(status));
        }
        assert_eq!(EventStatus::from_code("pending"), None);
    }

    #[test]
    fn open_policy_allows_any_change() {
        for from in EventStatus::ALL {
            for to in EventStatus::ALL {
                assert!(StatusPolicy::Open.allows(from, to));
            }
        }
    }

    #[test]
    fn strict_policy_blocks_backwards_and_terminal_moves() {
        let strict = StatusPolicy::Strict;
        assert!(strict.allows(EventStatus::Quoted, EventStatus::Confirmed));
        assert!(strict.allows(EventStatus::Confirmed, EventStatus::Completed));
        assert!(strict.allows(EventStatus::Confirmed, EventStatus::Cancelled));
        assert!(strict.allows(EventStatus::Completed, EventStatus::Cancelled));
        assert!(strict.allows(EventStatus::Completed, EventStatus::Completed));
        assert!(!strict.allows(EventStatus::Completed, EventStatus::Quoted));
        assert!(!strict.allows(EventStatus::Cancelled, EventStatus::Confirmed));
        assert!(!strict.allows(EventStatus::Quoted, EventStatus::Completed));
    }

    #[test]
    fn from_draft_applies_defaults() {
        let mut input = draft();
        input.paid_amount = Some("1000".to_string());
        let event = Event::from_draft(user(), &input).unwrap();

        assert_eq!(event.status, EventStatus::Quoted);
        assert_eq!(event.paid_amount, Decimal::ZERO);
        assert_eq!(event.total_amount, d("5000"));
        assert_eq!(super::format_time(event.start_time), "09:00");
        assert_eq!(event.end_time, None);
    }

    #[test]
    fn from_draft_rejects_missing_required_fields() {
        let mut no_title = draft();
        no_title.title = "  ".to_string();
        assert_eq!(
            Event::from_draft(user(), &no_title).unwrap_err(),
            ValidationError::EmptyField("title")
        );

        let mut bad_date = draft();
        bad_date.date = "20/11/2026".to_string();
        assert!(matches!(
            Event::from_draft(user(), &bad_date),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn apply_payment_accepts_exact_remaining_and_rejects_one_cent_more() {
        let mut event = Event::from_draft(user(), &draft()).unwrap();
        event.apply_payment(d("4999.99")).unwrap();

        let err = event.apply_payment(d("0.02")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::PaymentExceedsBalance {
                amount: d("0.02"),
                remaining: d("0.01"),
            }
        );
        event.apply_payment(d("0.01")).unwrap();
        assert!(event.is_fully_paid());
        assert_eq!(event.remaining_balance(), Decimal::ZERO);
    }

    #[test]
    fn apply_patch_is_all_or_nothing() {
        let mut event = Event::from_draft(user(), &draft()).unwrap();
        let before = event.clone();
        let patch = EventPatch {
            title: Some("Renamed".to_string()),
            client_name: Some("   ".to_string()),
            ..EventPatch::default()
        };

        assert!(event.apply_patch(&patch, StatusPolicy::Open).is_err());
        assert_eq!(event, before);
    }

    #[test]
    fn apply_patch_rejects_total_below_paid() {
        let mut event = Event::from_draft(user(), &draft()).unwrap();
        event.apply_payment(d("2500")).unwrap();
        let patch = EventPatch {
            total_amount: Some(d("2000")),
            ..EventPatch::default()
        };

        let err = event.apply_patch(&patch, StatusPolicy::Open).unwrap_err();
        assert!(matches!(err, ValidationError::TotalBelowPaid { .. }));
        assert_eq!(event.total_amount, d("5000"));
    }

    #[test]
    fn parse_helpers_accept_form_shapes() {
        assert!(parse_date("2026-02-29").is_err());
        assert!(parse_date("2028-02-29").is_ok());
        assert_eq!(super::format_time(parse_time("18:30:00").unwrap()), "18:30");
        assert_eq!(
            parse_time("18:30:45").unwrap(),
            NaiveTime::from_hms_opt(18, 30, 0).unwrap()
        );
        assert!(parse_time("25:00").is_err());
    }
}
