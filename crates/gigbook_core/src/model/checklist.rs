//! Per-event checklist items.
//!
//! # Invariants
//! - Each item belongs to exactly one event; deleting the event deletes it.
//! - `description` is non-blank after trimming.
//! - `order` defines display sequence and need not be unique.

use crate::model::event::EventId;
use crate::model::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one checklist item.
pub type ChecklistItemId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub event_id: EventId,
    pub description: String,
    pub is_done: bool,
    #[serde(default)]
    pub order: i64,
}

impl ChecklistItem {
    /// Creates a pending item for `event_id` at `order`.
    pub fn new(
        event_id: EventId,
        description: &str,
        order: i64,
    ) -> Result<Self, ValidationError> {
        let item = Self {
            id: Uuid::new_v4(),
            event_id,
            description: require_text("description", description)?,
            is_done: false,
            order,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() || self.event_id.is_nil() {
            return Err(ValidationError::NilId);
        }
        require_text("description", &self.description)?;
        Ok(())
    }
}

/// Done/total counts for one checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub done: usize,
    pub total: usize,
}

impl ChecklistProgress {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done == self.total
    }
}

/// Counts finished items.
pub fn checklist_progress(items: &[ChecklistItem]) -> ChecklistProgress {
    ChecklistProgress {
        done: items.iter().filter(|item| item.is_done).count(),
        total: items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::{checklist_progress, ChecklistItem};
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    #[test]
    fn new_trims_description_and_starts_pending() {
        let item = ChecklistItem::new(Uuid::new_v4(), "  charge batteries ", 3).unwrap();
        assert_eq!(item.description, "charge batteries");
        assert!(!item.is_done);
        assert_eq!(item.order, 3);
    }

    #[test]
    fn new_rejects_blank_description() {
        let err = ChecklistItem::new(Uuid::new_v4(), "   ", 0).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("description"));
    }

    #[test]
    fn progress_counts_done_items() {
        let event_id = Uuid::new_v4();
        let mut first = ChecklistItem::new(event_id, "a", 0).unwrap();
        let second = ChecklistItem::new(event_id, "b", 1).unwrap();
        first.is_done = true;

        let progress = checklist_progress(&[first, second]);
        assert_eq!((progress.done, progress.total), (1, 2));
        assert!(!progress.is_complete());
        assert!(!checklist_progress(&[]).is_complete());
    }
}
