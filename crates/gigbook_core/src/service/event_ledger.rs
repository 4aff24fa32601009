//! Event ledger use-case service.
//!
//! # Responsibility
//! - Create, edit, delete and list the caller's events.
//! - Record incremental payments.
//! - Serve the dashboard aggregates.
//!
//! # Invariants
//! - `paid_amount` changes only through `record_payment`, and every payment
//!   is checked against the balance read inside the write transaction.
//! - Updates never touch `paid_amount` and never leave it above the total.
//! - Status changes follow the configured `StatusPolicy`.

use crate::error::{CoreError, CoreResult};
use crate::identity::IdentityProvider;
use crate::model::event::{Event, EventDraft, EventId, EventPatch, StatusPolicy};
use crate::model::money::parse_amount;
use crate::model::validation::ValidationError;
use crate::notify::{NotificationBus, ViewScope};
use crate::repo::event_repo::{EventListQuery, EventRepository};
use crate::service::aggregates::{derive_aggregates, EventAggregates};
use crate::service::{log_outcome, require_user, Publisher};
use rust_decimal::Decimal;
use std::time::Instant;

const MODULE: &str = "ledger";

/// Event ledger facade over a repository and an identity provider.
pub struct EventLedger<R: EventRepository, I: IdentityProvider> {
    repo: R,
    identity: I,
    policy: StatusPolicy,
    publisher: Publisher,
}

impl<R: EventRepository, I: IdentityProvider> EventLedger<R, I> {
    /// Creates a ledger with the open status policy and no notifications.
    pub fn new(repo: R, identity: I) -> Self {
        Self {
            repo,
            identity,
            policy: StatusPolicy::default(),
            publisher: Publisher::default(),
        }
    }

    pub fn with_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_notifications(mut self, bus: NotificationBus) -> Self {
        self.publisher = Publisher::new(Some(bus));
        self
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Creates one event from form input.
    ///
    /// `paid_amount` starts at zero and status defaults to Quoted.
    pub fn create_event(&self, draft: &EventDraft) -> CoreResult<Event> {
        let started_at = Instant::now();
        let result = self.create_inner(draft);
        log_outcome("event_create", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Events, "event created", &result);
        result
    }

    fn create_inner(&self, draft: &EventDraft) -> CoreResult<Event> {
        let user_id = require_user(&self.identity)?;
        let event = Event::from_draft(user_id, draft)?;
        self.repo.create_event(&event)?;
        Ok(event)
    }

    /// Applies a partial update and returns the stored event.
    ///
    /// # Errors
    /// - `NotFound` for unknown ids.
    /// - `Validation` for bad fields, a disallowed status change, or a total
    ///   below the amount already received.
    pub fn update_event(&self, id: EventId, patch: &EventPatch) -> CoreResult<Event> {
        let started_at = Instant::now();
        let result = self.update_inner(id, patch);
        log_outcome("event_update", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Events, "event updated", &result);
        result
    }

    fn update_inner(&self, id: EventId, patch: &EventPatch) -> CoreResult<Event> {
        let user_id = require_user(&self.identity)?;
        let policy = self.policy;
        let event = self.repo.modify_event(&user_id, id, &mut |event: &mut Event| {
            event.apply_patch(patch, policy)
        })?;
        Ok(event)
    }

    /// Permanently deletes one event and its checklist.
    pub fn delete_event(&self, id: EventId) -> CoreResult<()> {
        let started_at = Instant::now();
        let result = require_user(&self.identity)
            .and_then(|user_id| Ok(self.repo.delete_event(&user_id, id)?));
        log_outcome("event_delete", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Events, "event deleted", &result);
        result
    }

    /// Adds `amount` to `paid_amount`.
    ///
    /// # Errors
    /// - `Validation(NonPositivePayment)` when `amount <= 0`; the store is
    ///   not touched.
    /// - `Validation(PaymentExceedsBalance)` when `amount` is above the
    ///   balance committed at the time the write lock is taken.
    pub fn record_payment(&self, id: EventId, amount: Decimal) -> CoreResult<Event> {
        let started_at = Instant::now();
        let result = self.record_payment_inner(id, amount);
        log_outcome("payment_record", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Events, "payment recorded", &result);
        result
    }

    fn record_payment_inner(&self, id: EventId, amount: Decimal) -> CoreResult<Event> {
        let user_id = require_user(&self.identity)?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePayment(amount).into());
        }
        let event = self.repo.modify_event(&user_id, id, &mut |event: &mut Event| {
            event.apply_payment(amount)
        })?;
        Ok(event)
    }

    /// Parses user-typed amount text (`1.500,50`, `R$ 200`) and records it.
    pub fn record_payment_input(&self, id: EventId, input: &str) -> CoreResult<Event> {
        let started_at = Instant::now();
        match parse_amount(input) {
            Ok(amount) => self.record_payment(id, amount),
            Err(err) => {
                let result: CoreResult<Event> = Err(err.into());
                log_outcome("payment_record", MODULE, started_at, &result);
                self.publisher
                    .after_mutation(ViewScope::Events, "payment recorded", &result);
                result
            }
        }
    }

    /// Loads one event.
    pub fn get_event(&self, id: EventId) -> CoreResult<Event> {
        let user_id = require_user(&self.identity)?;
        self.repo
            .get_event(&user_id, id)?
            .ok_or(CoreError::NotFound { entity: "event", id })
    }

    /// Lists events in schedule order (`date`, then `start_time`).
    pub fn list_events(&self, query: &EventListQuery) -> CoreResult<Vec<Event>> {
        let started_at = Instant::now();
        let result = require_user(&self.identity)
            .and_then(|user_id| Ok(self.repo.list_events(&user_id, query)?));
        log_outcome("event_list", MODULE, started_at, &result);
        result
    }

    /// Recomputes dashboard totals over every event of the caller.
    pub fn aggregates(&self, upcoming_limit: usize) -> CoreResult<EventAggregates> {
        let events = self.list_events(&EventListQuery::default())?;
        Ok(derive_aggregates(&events, upcoming_limit))
    }
}
