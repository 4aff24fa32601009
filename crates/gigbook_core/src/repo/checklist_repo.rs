//! Checklist item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-event checklist items.
//! - Scope every item access to events owned by the caller.
//!
//! # Invariants
//! - Item listing order is `order ASC, rowid ASC` (insertion order breaks
//!   ties between equal `order` values).
//! - Batch inserts are all-or-nothing.
//! - `toggle_done` flips the stored value in SQL, never a client copy.

use crate::identity::UserId;
use crate::model::checklist::{ChecklistItem, ChecklistItemId};
use crate::model::event::EventId;
use crate::model::validation::require_text;
use crate::repo::codec::{bool_to_int, parse_bool, parse_uuid};
use crate::repo::schema::{ensure_connection_ready, CHECKLIST_ITEMS_TABLE, EVENTS_TABLE};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const ITEM_SELECT_SQL: &str = r#"SELECT
    ci.id AS id,
    ci.event_id AS event_id,
    ci.description AS description,
    ci.is_done AS is_done,
    ci."order" AS item_order
FROM checklist_items ci
INNER JOIN events e ON e.id = ci.event_id"#;

const ENTITY: &str = "checklist item";
const EVENT_ENTITY: &str = "event";

/// Repository interface for checklist items.
pub trait ChecklistRepository {
    /// Whether `event_id` exists and belongs to `user_id`.
    fn event_exists(&self, user_id: &UserId, event_id: EventId) -> RepoResult<bool>;
    /// Number of items currently attached to the event.
    fn count_items(&self, user_id: &UserId, event_id: EventId) -> RepoResult<i64>;
    /// Lists the event's items in display order.
    fn list_items(&self, user_id: &UserId, event_id: EventId) -> RepoResult<Vec<ChecklistItem>>;
    /// Loads one item.
    fn get_item(&self, user_id: &UserId, id: ChecklistItemId)
        -> RepoResult<Option<ChecklistItem>>;
    /// Inserts all items in one transaction; none are stored on failure.
    fn insert_items(&self, user_id: &UserId, items: &[ChecklistItem]) -> RepoResult<()>;
    /// Flips `is_done` and returns the stored item.
    fn toggle_done(&self, user_id: &UserId, id: ChecklistItemId) -> RepoResult<ChecklistItem>;
    /// Replaces the description and returns the stored item.
    fn update_description(
        &self,
        user_id: &UserId,
        id: ChecklistItemId,
        description: &str,
    ) -> RepoResult<ChecklistItem>;
    /// Permanently deletes one item.
    fn delete_item(&self, user_id: &UserId, id: ChecklistItemId) -> RepoResult<()>;
}

/// SQLite-backed checklist repository.
pub struct SqliteChecklistRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteChecklistRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[EVENTS_TABLE, CHECKLIST_ITEMS_TABLE])?;
        Ok(Self { conn })
    }
}

impl ChecklistRepository for SqliteChecklistRepository<'_> {
    fn event_exists(&self, user_id: &UserId, event_id: EventId) -> RepoResult<bool> {
        event_exists(self.conn, user_id, event_id)
    }

    fn count_items(&self, user_id: &UserId, event_id: EventId) -> RepoResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM checklist_items ci
             INNER JOIN events e ON e.id = ci.event_id
             WHERE ci.event_id = ?1
               AND e.user_id = ?2;",
            params![event_id.to_string(), user_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_items(&self, user_id: &UserId, event_id: EventId) -> RepoResult<Vec<ChecklistItem>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"{ITEM_SELECT_SQL}
             WHERE ci.event_id = ?1
               AND e.user_id = ?2
             ORDER BY ci."order" ASC, ci.rowid ASC;"#
        ))?;
        let mut rows = stmt.query(params![event_id.to_string(), user_id.as_str()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn get_item(
        &self,
        user_id: &UserId,
        id: ChecklistItemId,
    ) -> RepoResult<Option<ChecklistItem>> {
        load_item(self.conn, user_id, id)
    }

    fn insert_items(&self, user_id: &UserId, items: &[ChecklistItem]) -> RepoResult<()> {
        for item in items {
            item.validate()?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut checked_events: Vec<EventId> = Vec::new();
        for item in items {
            if !checked_events.contains(&item.event_id) {
                if !event_exists(&tx, user_id, item.event_id)? {
                    return Err(RepoError::NotFound {
                        entity: EVENT_ENTITY,
                        id: item.event_id,
                    });
                }
                checked_events.push(item.event_id);
            }

            tx.execute(
                r#"INSERT INTO checklist_items (
                    id,
                    event_id,
                    description,
                    is_done,
                    "order"
                ) VALUES (?1, ?2, ?3, ?4, ?5);"#,
                params![
                    item.id.to_string(),
                    item.event_id.to_string(),
                    item.description.as_str(),
                    bool_to_int(item.is_done),
                    item.order,
                ],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    fn toggle_done(&self, user_id: &UserId, id: ChecklistItemId) -> RepoResult<ChecklistItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE checklist_items
             SET is_done = 1 - is_done
             WHERE id = ?1
               AND event_id IN (SELECT id FROM events WHERE user_id = ?2);",
            params![id.to_string(), user_id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }

        let item = load_item(&tx, user_id, id)?.ok_or(RepoError::NotFound { entity: ENTITY, id })?;
        tx.commit()?;
        Ok(item)
    }

    fn update_description(
        &self,
        user_id: &UserId,
        id: ChecklistItemId,
        description: &str,
    ) -> RepoResult<ChecklistItem> {
        let description = require_text("description", description)?;
        let changed = self.conn.execute(
            "UPDATE checklist_items
             SET description = ?3
             WHERE id = ?1
               AND event_id IN (SELECT id FROM events WHERE user_id = ?2);",
            params![id.to_string(), user_id.as_str(), description],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }

        load_item(self.conn, user_id, id)?.ok_or(RepoError::NotFound { entity: ENTITY, id })
    }

    fn delete_item(&self, user_id: &UserId, id: ChecklistItemId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM checklist_items
             WHERE id = ?1
               AND event_id IN (SELECT id FROM events WHERE user_id = ?2);",
            params![id.to_string(), user_id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }
        Ok(())
    }
}

fn event_exists(conn: &Connection, user_id: &UserId, event_id: EventId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM events
            WHERE id = ?1
              AND user_id = ?2
        );",
        params![event_id.to_string(), user_id.as_str()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_item(
    conn: &Connection,
    user_id: &UserId,
    id: ChecklistItemId,
) -> RepoResult<Option<ChecklistItem>> {
    let mut stmt = conn.prepare(&format!(
        "{ITEM_SELECT_SQL}
         WHERE ci.id = ?1
           AND e.user_id = ?2;"
    ))?;
    let mut rows = stmt.query(params![id.to_string(), user_id.as_str()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_item_row(row)?));
    }
    Ok(None)
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<ChecklistItem> {
    let id_text: String = row.get("id")?;
    let event_text: String = row.get("event_id")?;
    let is_done: i64 = row.get("is_done")?;

    Ok(ChecklistItem {
        id: parse_uuid(&id_text, "checklist_items.id")?,
        event_id: parse_uuid(&event_text, "checklist_items.event_id")?,
        description: row.get("description")?,
        is_done: parse_bool(is_done, "checklist_items.is_done")?,
        order: row.get("item_order")?,
    })
}
