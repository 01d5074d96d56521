use rusqlite::{params, ErrorCode, Row};

use crate::error::DbError;
use crate::models::Template;

use super::Database;

fn row_to_template(row: &Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
    })
}

/// Coerce a unique-constraint failure on `templates.name` into the typed
/// duplicate error so the UI can report the offending name. Other statement
/// failures pass through untouched.
fn map_duplicate_name(err: DbError, name: &str) -> DbError {
    match &err {
        DbError::Statement { source, .. }
            if matches!(source.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) =>
        {
            DbError::Duplicate {
                entity: "template",
                name: name.to_string(),
            }
        }
        _ => err,
    }
}

impl Database {
    /// Retrieve every template sorted by name.
    pub fn list_templates(&self) -> Result<Vec<Template>, DbError> {
        self.query(
            "SELECT id, name, content FROM templates ORDER BY name COLLATE NOCASE",
            [],
            row_to_template,
        )
    }

    /// Insert a new template, returning the hydrated struct so the caller can
    /// push it straight into the in-memory list.
    pub fn create_template(&self, name: &str, content: &str) -> Result<Template, DbError> {
        self.execute(
            "INSERT INTO templates (name, content) VALUES (?1, ?2)",
            params![name, content],
        )
        .map_err(|err| map_duplicate_name(err, name))?;
        Ok(Template {
            id: self.last_insert_id(),
            name: name.to_string(),
            content: content.to_string(),
        })
    }

    /// Update the name and content for an existing template.
    pub fn update_template(&self, id: i64, name: &str, content: &str) -> Result<(), DbError> {
        let updated = self
            .execute(
                "UPDATE templates SET name = ?1, content = ?2 WHERE id = ?3",
                params![name, content, id],
            )
            .map_err(|err| map_duplicate_name(err, name))?;
        if updated == 0 {
            Err(DbError::NotFound { entity: "template" })
        } else {
            Ok(())
        }
    }

    pub fn delete_template(&self, id: i64) -> Result<(), DbError> {
        let deleted = self.execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        if deleted == 0 {
            Err(DbError::NotFound { entity: "template" })
        } else {
            Ok(())
        }
    }
}
