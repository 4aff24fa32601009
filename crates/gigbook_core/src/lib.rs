//! Core domain logic for gigbook: bookings, payments and checklists.
//! This crate is the single source of truth for ledger invariants.

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError};
pub use error::{CoreError, CoreResult};
pub use identity::{IdentityProvider, StaticIdentity, UserId};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::checklist::{checklist_progress, ChecklistItem, ChecklistItemId, ChecklistProgress};
pub use model::event::{Event, EventDraft, EventId, EventPatch, EventStatus, StatusPolicy};
pub use model::template::{ChecklistTemplate, TemplateDraft, TemplateId};
pub use model::validation::ValidationError;
pub use notify::{Notification, NotificationBus, ToastLevel, ViewScope};
pub use repo::checklist_repo::{ChecklistRepository, SqliteChecklistRepository};
pub use repo::event_repo::{EventListQuery, EventRepository, SqliteEventRepository};
pub use repo::template_repo::{SqliteTemplateRepository, TemplateRepository};
pub use repo::{RepoError, RepoResult};
pub use service::aggregates::{
    derive_aggregates, events_on, settlement, status_breakdown, EventAggregates, Settlement,
};
pub use service::checklist_engine::ChecklistEngine;
pub use service::event_ledger::EventLedger;
pub use service::template_store::TemplateStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
