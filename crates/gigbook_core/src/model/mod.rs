//! Domain model for bookings, their checklists and checklist templates.
//!
//! # Responsibility
//! - Define canonical data structures used by the ledger and engines.
//! - Hold validation rules that do not need storage access.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Deletion is permanent; there are no tombstones.
//! - JSON field names match the persisted schema exactly.

pub mod checklist;
pub mod event;
pub mod money;
pub mod template;
pub mod validation;
