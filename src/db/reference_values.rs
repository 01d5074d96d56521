use rusqlite::{params, Row};

use crate::error::DbError;
use crate::models::ReferenceValue;

use super::Database;

const REFERENCE_COLUMNS: &str =
    "id, exam_type, species, organ, measurement, min_value, max_value, unit";

fn row_to_reference(row: &Row<'_>) -> rusqlite::Result<ReferenceValue> {
    Ok(ReferenceValue {
        id: row.get(0)?,
        exam_type: row.get(1)?,
        species: row.get(2)?,
        organ: row.get(3)?,
        measurement: row.get(4)?,
        min_value: row.get(5)?,
        max_value: row.get(6)?,
        unit: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    })
}

impl Database {
    /// Normal ranges applicable to one exam type and species, grouped the way
    /// the detail view presents them.
    pub fn list_reference_values(
        &self,
        exam_type: &str,
        species: &str,
    ) -> Result<Vec<ReferenceValue>, DbError> {
        self.query(
            &format!(
                "SELECT {REFERENCE_COLUMNS} FROM reference_values
                 WHERE exam_type = ?1 AND species = ?2
                 ORDER BY organ COLLATE NOCASE, measurement COLLATE NOCASE"
            ),
            params![exam_type, species],
            row_to_reference,
        )
    }

    /// Insert or refresh the range for one (exam_type, species, organ,
    /// measurement) quadruple. Returns the hydrated row, which on conflict is
    /// the existing row carrying the new bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn upsert_reference_value(
        &self,
        exam_type: &str,
        species: &str,
        organ: &str,
        measurement: &str,
        min_value: Option<f64>,
        max_value: Option<f64>,
        unit: &str,
    ) -> Result<ReferenceValue, DbError> {
        self.execute(
            "INSERT INTO reference_values
                 (exam_type, species, organ, measurement, min_value, max_value, unit)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(exam_type, species, organ, measurement) DO UPDATE SET
                 min_value = excluded.min_value,
                 max_value = excluded.max_value,
                 unit = excluded.unit",
            params![exam_type, species, organ, measurement, min_value, max_value, unit],
        )?;
        self.query_optional(
            &format!(
                "SELECT {REFERENCE_COLUMNS} FROM reference_values
                 WHERE exam_type = ?1 AND species = ?2 AND organ = ?3 AND measurement = ?4"
            ),
            params![exam_type, species, organ, measurement],
            row_to_reference,
        )?
        .ok_or(DbError::NotFound {
            entity: "reference value",
        })
    }

    pub fn delete_reference_value(&self, id: i64) -> Result<(), DbError> {
        let deleted = self.execute("DELETE FROM reference_values WHERE id = ?1", params![id])?;
        if deleted == 0 {
            Err(DbError::NotFound {
                entity: "reference value",
            })
        } else {
            Ok(())
        }
    }
}
