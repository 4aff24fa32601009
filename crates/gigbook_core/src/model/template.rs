//! Reusable checklist templates.
//!
//! # Invariants
//! - `name` is non-blank.
//! - `items` holds at least one non-blank description, in display order.
//! - Items are plain values: applying a template copies them, nothing links
//!   back.

use crate::identity::UserId;
use crate::model::validation::{optional_text, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one template.
pub type TemplateId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTemplate {
    pub id: TemplateId,
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub items: Vec<String>,
}

/// Create/update input for a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<String>,
}

impl TemplateDraft {
    pub fn new<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl ChecklistTemplate {
    /// Builds a new template owned by `user_id`.
    pub fn from_draft(user_id: UserId, draft: &TemplateDraft) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), user_id, draft)
    }

    /// Builds a template keeping an existing identity (used by replace).
    ///
    /// # Contract
    /// - Name is trimmed and must be non-blank, whatever the items are.
    /// - Blank items are dropped, the rest trimmed; at least one must remain.
    pub fn with_id(
        id: TemplateId,
        user_id: UserId,
        draft: &TemplateDraft,
    ) -> Result<Self, ValidationError> {
        let name = require_text("name", &draft.name)?;
        let template = Self {
            id,
            user_id,
            name,
            description: optional_text(draft.description.as_deref()),
            items: normalize_items(&draft.items),
        };
        template.validate()?;
        Ok(template)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_nil() {
            return Err(ValidationError::NilId);
        }
        require_text("name", &self.name)?;
        if self.items.is_empty() {
            return Err(ValidationError::EmptyTemplateItems);
        }
        for item in &self.items {
            require_text("item", item)?;
        }
        Ok(())
    }
}

/// Trims items and drops blank ones, keeping order.
pub fn normalize_items(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{ChecklistTemplate, TemplateDraft};
    use crate::identity::UserId;
    use crate::model::validation::ValidationError;

    fn user() -> UserId {
        UserId::parse("user-1").unwrap()
    }

    #[test]
    fn from_draft_filters_blank_items_and_keeps_order() {
        let draft = TemplateDraft::new("Wedding", ["  lenses ", "", "   ", "tripod"])
            .with_description("  ");
        let template = ChecklistTemplate::from_draft(user(), &draft).unwrap();

        assert_eq!(template.items, vec!["lenses", "tripod"]);
        assert_eq!(template.description, None);
    }

    #[test]
    fn empty_name_is_rejected_even_with_items() {
        let draft = TemplateDraft::new("", ["lenses"]);
        assert_eq!(
            ChecklistTemplate::from_draft(user(), &draft).unwrap_err(),
            ValidationError::EmptyField("name")
        );
    }

    #[test]
    fn all_blank_items_are_rejected() {
        let draft = TemplateDraft::new("Wedding", ["", "  "]);
        assert_eq!(
            ChecklistTemplate::from_draft(user(), &draft).unwrap_err(),
            ValidationError::EmptyTemplateItems
        );
    }
}
