//! Checklist engine use-case service.
//!
//! # Responsibility
//! - Manage the preparation checklist of each event.
//! - Expand templates into concrete items.
//!
//! # Invariants
//! - New items start pending; default `order` is the current item count.
//! - Batch adds (including template application) are all-or-nothing.
//! - Applied items are copies: later edits on either side do not propagate.

use crate::error::{CoreError, CoreResult};
use crate::identity::{IdentityProvider, UserId};
use crate::model::checklist::{
    checklist_progress, ChecklistItem, ChecklistItemId, ChecklistProgress,
};
use crate::model::event::EventId;
use crate::model::template::ChecklistTemplate;
use crate::model::validation::require_text;
use crate::notify::{NotificationBus, ViewScope};
use crate::repo::checklist_repo::ChecklistRepository;
use crate::service::{log_outcome, require_user, Publisher};
use log::debug;
use std::time::Instant;

const MODULE: &str = "checklist";

/// Checklist facade over a repository and an identity provider.
pub struct ChecklistEngine<R: ChecklistRepository, I: IdentityProvider> {
    repo: R,
    identity: I,
    publisher: Publisher,
}

impl<R: ChecklistRepository, I: IdentityProvider> ChecklistEngine<R, I> {
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

    /// Adds one pending item; `order` defaults to the current item count.
    pub fn add_item(
        &self,
        event_id: EventId,
        description: &str,
        order: Option<i64>,
    ) -> CoreResult<ChecklistItem> {
        let started_at = Instant::now();
        let result = self.add_item_inner(event_id, description, order);
        log_outcome("checklist_add_item", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Checklist(event_id), "item added", &result);
        result
    }

    fn add_item_inner(
        &self,
        event_id: EventId,
        description: &str,
        order: Option<i64>,
    ) -> CoreResult<ChecklistItem> {
        let user_id = require_user(&self.identity)?;
        require_text("description", description)?;
        self.ensure_event(&user_id, event_id)?;

        let order = match order {
            Some(order) => order,
            None => self.repo.count_items(&user_id, event_id)?,
        };
        let item = ChecklistItem::new(event_id, description, order)?;
        self.repo.insert_items(&user_id, std::slice::from_ref(&item))?;
        Ok(item)
    }

    /// Adds several pending items after the existing ones, in one transaction.
    pub fn add_items<S: AsRef<str>>(
        &self,
        event_id: EventId,
        descriptions: &[S],
    ) -> CoreResult<Vec<ChecklistItem>> {
        let started_at = Instant::now();
        let result = self.add_items_inner(event_id, descriptions);
        log_outcome("checklist_add_items", MODULE, started_at, &result);
        self.publisher
            .after_mutation(ViewScope::Checklist(event_id), "items added", &result);
        result
    }

    fn add_items_inner<S: AsRef<str>>(
        &self,
        event_id: EventId,
        descriptions: &[S],
    ) -> CoreResult<Vec<ChecklistItem>> {
        let user_id = require_user(&self.identity)?;
        for description in descriptions {
            require_text("description", description.as_ref())?;
        }
        self.ensure_event(&user_id, event_id)?;

        let first_order = self.repo.count_items(&user_id, event_id)?;
        let items = descriptions
            .iter()
            .zip(first_order..)
            .map(|(description, order)| ChecklistItem::new(event_id, description.as_ref(), order))
            .collect::<Result<Vec<_>, _>>()?;
        self.repo.insert_items(&user_id, &items)?;
        debug!(
            "event=checklist_add_items module={MODULE} status=ok event_id={event_id} count={}",
            items.len()
        );
        Ok(items)
    }

    /// Copies the template's items onto the event, after its current items.
    pub fn apply_template(
        &self,
        event_id: EventId,
        template: &ChecklistTemplate,
    ) -> CoreResult<Vec<ChecklistItem>> {
        debug!(
            "event=template_apply module={MODULE} status=start event_id={event_id} template_id={}",
            template.id
        );
        self.add_items(event_id, template.items.as_slice())
    }

    /// Flips `is_done` at the store and returns the stored item.
    pub fn toggle_done(&self, item_id: ChecklistItemId) -> CoreResult<ChecklistItem> {
        let started_at = Instant::now();
        let result = require_user(&self.identity)
            .and_then(|user_id| Ok(self.repo.toggle_done(&user_id, item_id)?));
        log_outcome("checklist_toggle", MODULE, started_at, &result);
        match &result {
            Ok(item) => self.publisher.after_mutation(
                ViewScope::Checklist(item.event_id),
                "item updated",
                &result,
            ),
            Err(err) => self.publisher.failed(err),
        }
        result
    }

    /// Replaces one item's description.
    pub fn edit_description(
        &self,
        item_id: ChecklistItemId,
        description: &str,
    ) -> CoreResult<ChecklistItem> {
        let started_at = Instant::now();
        let result = require_user(&self.identity).and_then(|user_id| {
            let description = require_text("description", description)?;
            Ok(self
                .repo
                .update_description(&user_id, item_id, &description)?)
        });
        log_outcome("checklist_edit", MODULE, started_at, &result);
        match &result {
            Ok(item) => self.publisher.after_mutation(
                ViewScope::Checklist(item.event_id),
                "item updated",
                &result,
            ),
            Err(err) => self.publisher.failed(err),
        }
        result
    }

    /// Permanently deletes one item.
    pub fn delete_item(&self, item_id: ChecklistItemId) -> CoreResult<()> {
        let started_at = Instant::now();
        let result = self.delete_item_inner(item_id);
        log_outcome("checklist_delete_item", MODULE, started_at, &result);
        match &result {
            Ok(event_id) => self.publisher.after_mutation(
                ViewScope::Checklist(*event_id),
                "item deleted",
                &result,
            ),
            Err(err) => self.publisher.failed(err),
        }
        result.map(|_| ())
    }

    fn delete_item_inner(&self, item_id: ChecklistItemId) -> CoreResult<EventId> {
        let user_id = require_user(&self.identity)?;
        let item = self
            .repo
            .get_item(&user_id, item_id)?
            .ok_or(CoreError::NotFound {
                entity: "checklist item",
                id: item_id,
            })?;
        self.repo.delete_item(&user_id, item_id)?;
        Ok(item.event_id)
    }

    /// Lists the event's items by `order`.
    pub fn list_items(&self, event_id: EventId) -> CoreResult<Vec<ChecklistItem>> {
        let user_id = require_user(&self.identity)?;
        self.ensure_event(&user_id, event_id)?;
        Ok(self.repo.list_items(&user_id, event_id)?)
    }

    /// Done/total counts for the event's checklist.
    pub fn progress(&self, event_id: EventId) -> CoreResult<ChecklistProgress> {
        let items = self.list_items(event_id)?;
        Ok(checklist_progress(&items))
    }

    fn ensure_event(&self, user_id: &UserId, event_id: EventId) -> CoreResult<()> {
        if self.repo.event_exists(user_id, event_id)? {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "event",
                id: event_id,
            })
        }
    }
}
