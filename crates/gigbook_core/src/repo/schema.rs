//! Connection readiness checks shared by the SQLite repositories.

use crate::db::migrations::{current_user_version, latest_version};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Table name plus the columns a repository reads or writes.
pub(crate) type TableShape = (&'static str, &'static [&'static str]);

pub(crate) const EVENTS_TABLE: TableShape = (
    "events",
    &[
        "id",
        "user_id",
        "client_name",
        "client_phone",
        "title",
        "type",
        "date",
        "start_time",
        "end_time",
        "location",
        "status",
        "total_amount",
        "paid_amount",
        "notes",
        "created_at",
    ],
);

pub(crate) const CHECKLIST_ITEMS_TABLE: TableShape = (
    "checklist_items",
    &["id", "event_id", "description", "is_done", "order"],
);

pub(crate) const TEMPLATES_TABLE: TableShape = (
    "checklist_templates",
    &["id", "user_id", "name", "description"],
);

pub(crate) const TEMPLATE_ITEMS_TABLE: TableShape = (
    "checklist_template_items",
    &["template_id", "user_id", "description", "order"],
);

/// Rejects connections that are not fully migrated or lack required columns.
pub(crate) fn ensure_connection_ready(conn: &Connection, tables: &[TableShape]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
