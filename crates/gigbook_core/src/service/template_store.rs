//! Checklist template use-case service.
//!
//! # Invariants
//! - Name must be non-blank and at least one non-blank item must remain,
//!   on create and on update alike.
//! - Update replaces the whole item list and resequences it from zero in a
//!   single store transaction; a rejected update leaves the old list intact.

use crate::error::{CoreError, CoreResult};
use crate::identity::IdentityProvider;
use crate::model::template::{ChecklistTemplate, TemplateDraft, TemplateId};
use crate::notify::{NotificationBus, ViewScope};
use crate::repo::template_repo::TemplateRepository;
use crate::service::{log_outcome, require_user, Publisher};
use std::time::Instant;

const MODULE: &str = "templates";

pub struct TemplateStore<R: TemplateRepository, I: IdentityProvider> {
    repo: R,
    identity: I,
    publisher: Publisher,
}

impl<R: TemplateRepository, I: IdentityProvider> TemplateStore<R, I> {
    pub fn new(repo: R, identity: I) -> Self {
        Self {
            repo,
            identity,
            publisher: Publisher::default(),
        }
    }

    pub fn with_notifications(mut self, bus: NotificationBus) -> Self {
        self.publisher = Publisher::new(Some(bus));
        self
    }

    pub fn create_template(&self, draft: &TemplateDraft) -> CoreResult<ChecklistTemplate> {
        let started_at = Instant::now();
        let result = require_user(&self.identity).and_then(|user_id| {
            let template = ChecklistTemplate::from_draft(user_id, draft)?;
            self.repo.create_template(&template)?;
            Ok(template)
        });
        log_outcome("template_create", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Templates, "template created", &result);
        result
    }

    /// Replaces name, description and items of an existing template.
    pub fn update_template(
        &self,
        id: TemplateId,
        draft: &TemplateDraft,
    ) -> CoreResult<ChecklistTemplate> {
        let started_at = Instant::now();
        let result = require_user(&self.identity).and_then(|user_id| {
            let template = ChecklistTemplate::with_id(id, user_id, draft)?;
            self.repo.replace_template(&template)?;
            Ok(template)
        });
        log_outcome("template_update", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Templates, "template updated", &result);
        result
    }

    /// Deletes the template; checklists it was applied to are unaffected.
    pub fn delete_template(&self, id: TemplateId) -> CoreResult<()> {
        let started_at = Instant::now();
        let result = require_user(&self.identity)
            .and_then(|user_id| Ok(self.repo.delete_template(&user_id, id)?));
        log_outcome("template_delete", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Templates, "template deleted", &result);
        result
    }

    pub fn get_template(&self, id: TemplateId) -> CoreResult<ChecklistTemplate> {
        let user_id = require_user(&self.identity)?;
        self.repo
            .get_template(&user_id, id)?
            .ok_or(CoreError::NotFound {
                entity: "template",
                id,
            })
    }

    /// Lists templates by name, case-insensitive.
    pub fn list_templates(&self) -> CoreResult<Vec<ChecklistTemplate>> {
        let user_id = require_user(&self.identity)?;
        Ok(self.repo.list_templates(&user_id)?)
    }
}
