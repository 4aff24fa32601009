//! Event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide user-scoped CRUD and ordered listing over `events`.
//! - Offer a serialized read-modify-write primitive for ledger updates.
//!
//! # Invariants
//! - Listing order is `date ASC, start_time ASC, created_at ASC, id ASC`.
//! - `modify_event` re-reads the row inside an IMMEDIATE transaction, so a
//!   payment is always validated against committed state, never a stale copy.
//! - Deleting an event deletes its checklist items (FK cascade).
//! - Listing skips rows that fail decoding or validation and logs them;
//!   single-row reads still report them as `InvalidData`.

use crate::identity::UserId;
use crate::model::event::{Event, EventId, EventStatus};
use crate::model::validation::ValidationError;
use crate::repo::codec::{
    amount_to_db, date_to_db, parse_amount, parse_date, parse_time, parse_timestamp, parse_uuid,
    time_to_db, timestamp_to_db,
};
use crate::repo::schema::{ensure_connection_ready, EVENTS_TABLE};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    client_name,
    client_phone,
    title,
    type,
    date,
    start_time,
    end_time,
    location,
    status,
    total_amount,
    paid_amount,
    notes,
    created_at
FROM events";

const ENTITY: &str = "event";

/// Query options for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventListQuery {
    /// Exact status filter.
    pub status: Option<EventStatus>,
    /// Case-insensitive substring match over title and location.
    pub search: Option<String>,
    /// Exact calendar day filter.
    pub date: Option<NaiveDate>,
    /// Maximum rows to return after filtering.
    pub limit: Option<u32>,
}

/// Callback applied to the freshly read row inside `modify_event`.
pub type EventMutation<'a> = dyn FnMut(&mut Event) -> Result<(), ValidationError> + 'a;

/// Repository interface for event persistence.
pub trait EventRepository {
    /// Inserts a validated event.
    fn create_event(&self, event: &Event) -> RepoResult<()>;
    /// Loads one event owned by `user_id`.
    fn get_event(&self, user_id: &UserId, id: EventId) -> RepoResult<Option<Event>>;
    /// Lists events owned by `user_id` in schedule order.
    fn list_events(&self, user_id: &UserId, query: &EventListQuery) -> RepoResult<Vec<Event>>;
    /// Reads, mutates and writes one event in a single serialized transaction.
    ///
    /// Returns the stored event. Nothing is written when `mutate` fails.
    fn modify_event(
        &self,
        user_id: &UserId,
        id: EventId,
        mutate: &mut EventMutation<'_>,
    ) -> RepoResult<Event>;
    /// Permanently deletes one event and its checklist items.
    fn delete_event(&self, user_id: &UserId, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[EVENTS_TABLE])?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<()> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO events (
                id,
                user_id,
                client_name,
                client_phone,
                title,
                type,
                date,
                start_time,
                end_time,
                location,
                status,
                total_amount,
                paid_amount,
                notes,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            params![
                event.id.to_string(),
                event.user_id.as_str(),
                event.client_name.as_str(),
                event.client_phone.as_str(),
                event.title.as_str(),
                event.event_type.as_deref(),
                date_to_db(event.date),
                time_to_db(event.start_time),
                event.end_time.map(time_to_db),
                event.location.as_deref(),
                event.status.as_code(),
                amount_to_db(event.total_amount),
                amount_to_db(event.paid_amount),
                event.notes.as_deref(),
                timestamp_to_db(&event.created_at),
            ],
        )?;

        Ok(())
    }

    fn get_event(&self, user_id: &UserId, id: EventId) -> RepoResult<Option<Event>> {
        load_event(self.conn, user_id, id)
    }

    fn list_events(&self, user_id: &UserId, query: &EventListQuery) -> RepoResult<Vec<Event>> {
        let mut sql = format!("{EVENT_SELECT_SQL} WHERE user_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(user_id.as_str().to_string())];

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_code().to_string()));
        }
        if let Some(date) = query.date {
            sql.push_str(" AND date = ?");
            bind_values.push(Value::Text(date_to_db(date)));
        }
        sql.push_str(" ORDER BY date ASC, start_time ASC, created_at ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);
        let limit = query.limit.map(|value| value as usize);

        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            if limit.is_some_and(|limit| events.len() >= limit) {
                break;
            }
            let event = match parse_event_row(row) {
                Ok(event) => event,
                Err(RepoError::InvalidData(_)) => {
                    warn!(
                        "event=event_row_skipped module=repo status=error error_code=invalid_data"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            };
            if let Some(needle) = needle.as_deref() {
                if !matches_search(&event, needle) {
                    continue;
                }
            }
            events.push(event);
        }

        Ok(events)
    }

    fn modify_event(
        &self,
        user_id: &UserId,
        id: EventId,
        mutate: &mut EventMutation<'_>,
    ) -> RepoResult<Event> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut event = load_event(&tx, user_id, id)?.ok_or(RepoError::NotFound {
            entity: ENTITY,
            id,
        })?;

        mutate(&mut event)?;
        if event.id != id || &event.user_id != user_id {
            return Err(RepoError::InvalidData(
                "event identity cannot change during modify".to_string(),
            ));
        }
        event.validate()?;
        write_event(&tx, &event)?;

        tx.commit()?;
        Ok(event)
    }

    fn delete_event(&self, user_id: &UserId, id: EventId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM events WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }

        Ok(())
    }
}

fn load_event(conn: &Connection, user_id: &UserId, id: EventId) -> RepoResult<Option<Event>> {
    let mut stmt = conn.prepare(&format!(
        "{EVENT_SELECT_SQL}
         WHERE id = ?1
           AND user_id = ?2;"
    ))?;

    let mut rows = stmt.query(params![id.to_string(), user_id.as_str()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_event_row(row)?));
    }

    Ok(None)
}

fn write_event(tx: &Transaction<'_>, event: &Event) -> RepoResult<()> {
    let changed = tx.execute(
        "UPDATE events
         SET
            client_name = ?3,
            client_phone = ?4,
            title = ?5,
            type = ?6,
            date = ?7,
            start_time = ?8,
            end_time = ?9,
            location = ?10,
            status = ?11,
            total_amount = ?12,
            paid_amount = ?13,
            notes = ?14
         WHERE id = ?1
           AND user_id = ?2;",
        params![
            event.id.to_string(),
            event.user_id.as_str(),
            event.client_name.as_str(),
            event.client_phone.as_str(),
            event.title.as_str(),
            event.event_type.as_deref(),
            date_to_db(event.date),
            time_to_db(event.start_time),
            event.end_time.map(time_to_db),
            event.location.as_deref(),
            event.status.as_code(),
            amount_to_db(event.total_amount),
            amount_to_db(event.paid_amount),
            event.notes.as_deref(),
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound {
            entity: ENTITY,
            id: event.id,
        });
    }

    Ok(())
}

fn matches_search(event: &Event, needle: &str) -> bool {
    event.title.to_lowercase().contains(needle)
        || event
            .location
            .as_deref()
            .is_some_and(|location| location.to_lowercase().contains(needle))
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let id_text: String = row.get("id")?;
    let user_text: String = row.get("user_id")?;
    let user_id = UserId::parse(&user_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid user id `{user_text}` in events.user_id"))
    })?;

    let status_text: String = row.get("status")?;
    let status = EventStatus::from_code(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in events.status"))
    })?;

    let date_text: String = row.get("date")?;
    let start_text: String = row.get("start_time")?;
    let end_time = match row.get::<_, Option<String>>("end_time")? {
        Some(value) if !value.is_empty() => Some(parse_time(&value, "events.end_time")?),
        _ => None,
    };
    let total_text: String = row.get("total_amount")?;
    let paid_text: String = row.get("paid_amount")?;
    let created_text: String = row.get("created_at")?;

    let event = Event {
        id: parse_uuid(&id_text, "events.id")?,
        user_id,
        client_name: row.get("client_name")?,
        client_phone: row.get("client_phone")?,
        title: row.get("title")?,
        event_type: row.get("type")?,
        date: parse_date(&date_text, "events.date")?,
        start_time: parse_time(&start_text, "events.start_time")?,
        end_time,
        location: row.get("location")?,
        status,
        total_amount: parse_amount(&total_text, "events.total_amount")?,
        paid_amount: parse_amount(&paid_text, "events.paid_amount")?,
        notes: row.get("notes")?,
        created_at: parse_timestamp(&created_text, "events.created_at")?,
    };
    event
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("event {}: {err}", event.id)))?;
    Ok(event)
}
