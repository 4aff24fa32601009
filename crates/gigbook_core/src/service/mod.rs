//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into ledger, checklist and template APIs.
//! - Resolve the caller through the identity seam before any store access.
//! - Publish invalidations after successful mutations.
//!
//! # Invariants
//! - An unauthenticated caller gets `CoreError::Unauthenticated` and the
//!   repository is never reached.
//! - Service log lines carry ids, counts and error codes only.

use crate::error::{CoreError, CoreResult};
use crate::identity::{IdentityProvider, UserId};
use crate::notify::{NotificationBus, ToastLevel, ViewScope};
use log::{info, warn};
use std::time::Instant;

pub mod aggregates;
pub mod checklist_engine;
pub mod event_ledger;
pub mod template_store;

pub(crate) fn require_user<I: IdentityProvider>(identity: &I) -> CoreResult<UserId> {
    identity.current_user().ok_or(CoreError::Unauthenticated)
}

/// Logs one operation outcome with its duration.
pub(crate) fn log_outcome<T>(
    event: &'static str,
    module: &'static str,
    started_at: Instant,
    result: &CoreResult<T>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!("event={event} module={module} status=ok duration_ms={duration_ms}"),
        Err(err) => warn!(
            "event={event} module={module} status=error duration_ms={duration_ms} error_code={}",
            err.code()
        ),
    }
}

/// Optional bus handle held by each service.
#[derive(Debug, Clone, Default)]
pub(crate) struct Publisher {
    bus: Option<NotificationBus>,
}

impl Publisher {
    pub(crate) fn new(bus: Option<NotificationBus>) -> Self {
        Self { bus }
    }

    /// Publishes `scope` plus a toast for a finished mutation.
    pub(crate) fn after_mutation<T>(
        &self,
        scope: ViewScope,
        success_message: &str,
        result: &CoreResult<T>,
    ) {
        let Some(bus) = self.bus.as_ref() else {
            return;
        };
        match result {
            Ok(_) => {
                bus.invalidate(scope);
                bus.toast(ToastLevel::Success, success_message);
            }
            Err(err) => self.failed(err),
        }
    }

    /// Publishes an error toast for a failed mutation.
    pub(crate) fn failed(&self, err: &CoreError) {
        if let Some(bus) = self.bus.as_ref() {
            bus.toast(ToastLevel::Error, err.to_string());
        }
    }
}
