//! Column encoders/decoders shared by the SQLite repositories.
//!
//! Money is stored as canonical decimal text so amounts survive the round
//! trip exactly; dates, times and timestamps use their ISO text forms.

use crate::model::event::{format_time, DATE_FORMAT, TIME_FORMAT};
use crate::repo::{RepoError, RepoResult};
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn amount_to_db(value: Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) fn parse_amount(value: &str, column: &'static str) -> RepoResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid amount `{value}` in {column}")))
}

pub(crate) fn date_to_db(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &'static str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn time_to_db(value: NaiveTime) -> String {
    format_time(value)
}

pub(crate) fn parse_time(value: &str, column: &'static str) -> RepoResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| RepoError::InvalidData(format!("invalid time `{value}` in {column}")))
}

pub(crate) fn timestamp_to_db(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str, column: &'static str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn parse_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in {column}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{amount_to_db, parse_amount, parse_timestamp, timestamp_to_db};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn amount_text_is_canonical_and_exact() {
        let value = Decimal::from_str("2500.50").unwrap();
        assert_eq!(amount_to_db(value), "2500.5");
        assert_eq!(parse_amount("2500.5", "events.paid_amount").unwrap(), value);
        assert!(parse_amount("lots", "events.paid_amount").is_err());
    }

    #[test]
    fn timestamp_roundtrips_through_rfc3339() {
        let created = Utc.with_ymd_and_hms(2026, 10, 16, 12, 30, 0).unwrap();
        let text = timestamp_to_db(&created);
        assert_eq!(text, "2026-10-16T12:30:00.000000Z");
        assert_eq!(parse_timestamp(&text, "events.created_at").unwrap(), created);
    }
}
