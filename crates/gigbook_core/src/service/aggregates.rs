//! Dashboard and finance projections over event lists.
//!
//! Everything here is a pure function of its input; callers recompute on
//! every read instead of caching totals.

use crate::model::event::{Event, EventStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// Totals and the upcoming-events strip of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAggregates {
    /// Sum of `total_amount`.
    pub total_revenue: Decimal,
    /// Sum of `paid_amount`.
    pub total_received: Decimal,
    /// `total_revenue - total_received`.
    pub total_pending: Decimal,
    /// Distinct `client_name` values.
    pub client_count: usize,
    /// Open events by date, at most the requested count.
    pub upcoming: Vec<Event>,
}

/// Payment state badge of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settlement {
    /// `paid_amount >= total_amount`.
    Settled,
    /// Something received, something still owed.
    Partial,
    /// Nothing received on a non-zero total.
    Unpaid,
}

pub fn derive_aggregates(events: &[Event], upcoming_limit: usize) -> EventAggregates {
    let total_revenue: Decimal = events.iter().map(|event| event.total_amount).sum();
    let total_received: Decimal = events.iter().map(|event| event.paid_amount).sum();
    let client_count = events
        .iter()
        .map(|event| event.client_name.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let mut upcoming: Vec<Event> = events
        .iter()
        .filter(|event| event.status.is_open())
        .cloned()
        .collect();
    upcoming.sort_by(|left, right| {
        left.date
            .cmp(&right.date)
            .then(left.start_time.cmp(&right.start_time))
    });
    upcoming.truncate(upcoming_limit);

    EventAggregates {
        total_revenue,
        total_received,
        total_pending: total_revenue - total_received,
        client_count,
        upcoming,
    }
}

pub fn settlement(event: &Event) -> Settlement {
    if event.is_fully_paid() {
        Settlement::Settled
    } else if event.paid_amount.is_zero() {
        Settlement::Unpaid
    } else {
        Settlement::Partial
    }
}

/// Calendar day view.
pub fn events_on(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|event| event.date == date).collect()
}

/// Event count per status; statuses with no events are reported as zero.
pub fn status_breakdown(events: &[Event]) -> BTreeMap<EventStatus, usize> {
    let mut counts: BTreeMap<EventStatus, usize> =
        EventStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for event in events {
        *counts.entry(event.status).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::{derive_aggregates, events_on, settlement, status_breakdown, Settlement};
    use crate::identity::UserId;
    use crate::model::event::{Event, EventDraft, EventStatus};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn event(client: &str, date: &str, total: i64, paid: i64, status: EventStatus) -> Event {
        let draft = EventDraft {
            client_name: client.to_string(),
            title: format!("gig for {client}"),
            date: date.to_string(),
            status: Some(status),
            total_amount: Some(total.to_string()),
            ..EventDraft::default()
        };
        let mut event = Event::from_draft(UserId::parse("user-1").unwrap(), &draft).unwrap();
        event.paid_amount = Decimal::from(paid);
        event
    }

    #[test]
    fn totals_clients_and_upcoming() {
        let events = vec![
            event("Ana", "2026-11-20", 5000, 2500, EventStatus::Confirmed),
            event("Bruno", "2026-11-02", 800, 0, EventStatus::Quoted),
            event("Ana", "2026-10-01", 3500, 3500, EventStatus::Completed),
        ];

        let aggregates = derive_aggregates(&events, 5);
        assert_eq!(aggregates.total_revenue, Decimal::from(9300));
        assert_eq!(aggregates.total_received, Decimal::from(6000));
        assert_eq!(aggregates.total_pending, Decimal::from(3300));
        assert_eq!(aggregates.client_count, 2);
        let upcoming: Vec<&str> = aggregates
            .upcoming
            .iter()
            .map(|event| event.client_name.as_str())
            .collect();
        assert_eq!(upcoming, vec!["Bruno", "Ana"]);

        assert_eq!(derive_aggregates(&events, 1).upcoming.len(), 1);
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let aggregates = derive_aggregates(&[], 5);
        assert_eq!(aggregates.total_revenue, Decimal::ZERO);
        assert_eq!(aggregates.client_count, 0);
        assert!(aggregates.upcoming.is_empty());
    }

    #[test]
    fn settlement_badges() {
        assert_eq!(
            settlement(&event("A", "2026-11-01", 100, 100, EventStatus::Quoted)),
            Settlement::Settled
        );
        assert_eq!(
            settlement(&event("A", "2026-11-01", 100, 40, EventStatus::Quoted)),
            Settlement::Partial
        );
        assert_eq!(
            settlement(&event("A", "2026-11-01", 100, 0, EventStatus::Quoted)),
            Settlement::Unpaid
        );
        assert_eq!(
            settlement(&event("A", "2026-11-01", 0, 0, EventStatus::Quoted)),
            Settlement::Settled
        );
    }

    #[test]
    fn day_view_and_status_counts() {
        let events = vec![
            event("A", "2026-11-01", 10, 0, EventStatus::Quoted),
            event("B", "2026-11-01", 10, 0, EventStatus::Cancelled),
            event("C", "2026-11-02", 10, 0, EventStatus::Quoted),
        ];
        let day = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        assert_eq!(events_on(&events, day).len(), 2);

        let counts = status_breakdown(&events);
        assert_eq!(counts[&EventStatus::Quoted], 2);
        assert_eq!(counts[&EventStatus::Cancelled], 1);
        assert_eq!(counts[&EventStatus::Completed], 0);
    }
}
