//! Checklist template repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist template heads and their ordered item rows.
//!
//! # Invariants
//! - Item rows are written with `order` equal to their position.
//! - Create and replace run in one IMMEDIATE transaction: a reader never
//!   sees a head without its items or a half-replaced item list.
//! - Deleting a template deletes its item rows (FK cascade).

use crate::identity::UserId;
use crate::model::template::{ChecklistTemplate, TemplateId};
use crate::repo::codec::parse_uuid;
use crate::repo::schema::{ensure_connection_ready, TEMPLATES_TABLE, TEMPLATE_ITEMS_TABLE};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};

const ENTITY: &str = "template";

/// Repository interface for checklist templates.
pub trait TemplateRepository {
    /// Inserts head plus items.
    fn create_template(&self, template: &ChecklistTemplate) -> RepoResult<()>;
    /// Loads one template with its items in order.
    fn get_template(&self, user_id: &UserId, id: TemplateId)
        -> RepoResult<Option<ChecklistTemplate>>;
    /// Lists the user's templates by name (case-insensitive).
    fn list_templates(&self, user_id: &UserId) -> RepoResult<Vec<ChecklistTemplate>>;
    /// Replaces name, description and the whole item list.
    fn replace_template(&self, template: &ChecklistTemplate) -> RepoResult<()>;
    /// Permanently deletes one template and its items.
    fn delete_template(&self, user_id: &UserId, id: TemplateId) -> RepoResult<()>;
}

/// SQLite-backed template repository.
pub struct SqliteTemplateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTemplateRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[TEMPLATES_TABLE, TEMPLATE_ITEMS_TABLE])?;
        Ok(Self { conn })
    }
}

impl TemplateRepository for SqliteTemplateRepository<'_> {
    fn create_template(&self, template: &ChecklistTemplate) -> RepoResult<()> {
        template.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO checklist_templates (id, user_id, name, description)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                template.id.to_string(),
                template.user_id.as_str(),
                template.name.as_str(),
                template.description.as_deref(),
            ],
        )?;
        insert_items(&tx, template)?;
        tx.commit()?;

        Ok(())
    }

    fn get_template(
        &self,
        user_id: &UserId,
        id: TemplateId,
    ) -> RepoResult<Option<ChecklistTemplate>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description
             FROM checklist_templates
             WHERE id = ?1
               AND user_id = ?2;",
        )?;
        let mut rows = stmt.query(params![id.to_string(), user_id.as_str()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let id_text: String = row.get(0)?;
        let mut template = ChecklistTemplate {
            id: parse_uuid(&id_text, "checklist_templates.id")?,
            user_id: user_id.clone(),
            name: row.get(1)?,
            description: row.get(2)?,
            items: Vec::new(),
        };
        template.items = load_items(self.conn, template.id)?;
        Ok(Some(template))
    }

    fn list_templates(&self, user_id: &UserId) -> RepoResult<Vec<ChecklistTemplate>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description
             FROM checklist_templates
             WHERE user_id = ?1
             ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?;
        let mut rows = stmt.query([user_id.as_str()])?;

        let mut templates = Vec::new();
        while let Some(row) = rows.next()? {
            let id_text: String = row.get(0)?;
            templates.push(ChecklistTemplate {
                id: parse_uuid(&id_text, "checklist_templates.id")?,
                user_id: user_id.clone(),
                name: row.get(1)?,
                description: row.get(2)?,
                items: Vec::new(),
            });
        }
        drop(rows);

        for template in &mut templates {
            template.items = load_items(self.conn, template.id)?;
        }
        Ok(templates)
    }

    fn replace_template(&self, template: &ChecklistTemplate) -> RepoResult<()> {
        template.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE checklist_templates
             SET name = ?3, description = ?4
             WHERE id = ?1
               AND user_id = ?2;",
            params![
                template.id.to_string(),
                template.user_id.as_str(),
                template.name.as_str(),
                template.description.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: ENTITY,
                id: template.id,
            });
        }

        tx.execute(
            "DELETE FROM checklist_template_items WHERE template_id = ?1;",
            [template.id.to_string()],
        )?;
        insert_items(&tx, template)?;
        tx.commit()?;

        Ok(())
    }

    fn delete_template(&self, user_id: &UserId, id: TemplateId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM checklist_templates WHERE id = ?1 AND user_id = ?2;",
            params![id.to_string(), user_id.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: ENTITY, id });
        }
        Ok(())
    }
}

fn insert_items(tx: &Transaction<'_>, template: &ChecklistTemplate) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        r#"INSERT INTO checklist_template_items (template_id, user_id, description, "order")
           VALUES (?1, ?2, ?3, ?4);"#,
    )?;
    for (index, description) in template.items.iter().enumerate() {
        stmt.execute(params![
            template.id.to_string(),
            template.user_id.as_str(),
            description.as_str(),
            index as i64,
        ])?;
    }
    Ok(())
}

fn load_items(conn: &Connection, template_id: TemplateId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        r#"SELECT description
           FROM checklist_template_items
           WHERE template_id = ?1
           ORDER BY "order" ASC, id ASC;"#,
    )?;
    let mut rows = stmt.query([template_id.to_string()])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(row.get(0)?);
    }
    Ok(items)
}
