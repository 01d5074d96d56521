use rusqlite::{params, Row};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::DbError;
use crate::models::Exam;

use super::Database;

const EXAM_COLUMNS: &str = "id, patient_id, exam_type, exam_data, created_at, updated_at";

fn row_to_exam(row: &Row<'_>) -> rusqlite::Result<Exam> {
    let id: i64 = row.get(0)?;
    let raw: Option<String> = row.get(3)?;
    Ok(Exam {
        id,
        patient_id: row.get(1)?,
        exam_type: row.get(2)?,
        data: parse_payload(id, raw),
        created_at: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        updated_at: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

/// Deserialize a stored payload. Malformed or missing text becomes an empty
/// JSON object so reads never fail on bad payload data; the substitution is
/// logged because it loses whatever the column held.
fn parse_payload(exam_id: i64, raw: Option<String>) -> Value {
    match raw {
        Some(text) if !text.trim().is_empty() => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                warn!(exam_id, error = %err, "malformed exam payload, substituting empty object");
                Value::Object(Map::new())
            }
        },
        _ => Value::Object(Map::new()),
    }
}

impl Database {
    /// All exams belonging to one patient, newest first.
    pub fn list_exams_for_patient(&self, patient_id: i64) -> Result<Vec<Exam>, DbError> {
        self.query(
            &format!(
                "SELECT {EXAM_COLUMNS} FROM exams
                 WHERE patient_id = ?1
                 ORDER BY created_at DESC, id DESC"
            ),
            params![patient_id],
            row_to_exam,
        )
    }

    /// Insert a new exam, serializing the payload to text before binding, and
    /// return the hydrated row. A `patient_id` that matches no patient is
    /// rejected by the foreign key and surfaces as a statement error.
    pub fn create_exam(
        &self,
        patient_id: i64,
        exam_type: &str,
        data: &Value,
    ) -> Result<Exam, DbError> {
        let payload = serde_json::to_string(data)?;
        self.execute(
            "INSERT INTO exams (patient_id, exam_type, exam_data) VALUES (?1, ?2, ?3)",
            params![patient_id, exam_type, payload],
        )?;
        let id = self.last_insert_id();
        self.get_exam(id)?
            .ok_or(DbError::NotFound { entity: "exam" })
    }

    /// Replace an exam's type and payload, refreshing `updated_at`.
    pub fn update_exam(&self, id: i64, exam_type: &str, data: &Value) -> Result<(), DbError> {
        let payload = serde_json::to_string(data)?;
        let updated = self.execute(
            "UPDATE exams SET exam_type = ?1, exam_data = ?2, updated_at = datetime('now')
             WHERE id = ?3",
            params![exam_type, payload, id],
        )?;
        if updated == 0 {
            Err(DbError::NotFound { entity: "exam" })
        } else {
            Ok(())
        }
    }

    /// Fetch one exam by id; `None` when no row matches.
    pub fn get_exam(&self, id: i64) -> Result<Option<Exam>, DbError> {
        self.query_optional(
            &format!("SELECT {EXAM_COLUMNS} FROM exams WHERE id = ?1"),
            params![id],
            row_to_exam,
        )
    }

    pub fn delete_exam(&self, id: i64) -> Result<(), DbError> {
        let deleted = self.execute("DELETE FROM exams WHERE id = ?1", params![id])?;
        if deleted == 0 {
            Err(DbError::NotFound { entity: "exam" })
        } else {
            Ok(())
        }
    }
}
