use rusqlite::{params, Row};

use crate::error::DbError;
use crate::models::Patient;

use super::Database;

fn row_to_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        species: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        breed: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        owner_name: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}

impl Database {
    /// Retrieve every patient sorted by name. The query doubles as the single
    /// source of truth for how the home screen orders its list.
    pub fn list_patients(&self) -> Result<Vec<Patient>, DbError> {
        self.query(
            "SELECT id, name, species, breed, owner_name, created_at
             FROM patients
             ORDER BY name COLLATE NOCASE",
            [],
            row_to_patient,
        )
    }

    /// Insert a new patient and return the hydrated row, so the caller sees
    /// the `created_at` value the database actually wrote.
    pub fn create_patient(
        &self,
        name: &str,
        species: &str,
        breed: &str,
        owner_name: &str,
    ) -> Result<Patient, DbError> {
        self.execute(
            "INSERT INTO patients (name, species, breed, owner_name) VALUES (?1, ?2, ?3, ?4)",
            params![name, species, breed, owner_name],
        )?;
        let id = self.last_insert_id();
        self.patient_by_id(id)?
            .ok_or(DbError::NotFound { entity: "patient" })
    }

    /// Update the full editable field set for an existing patient. Zero rows
    /// touched surfaces an explicit not-found error so the UI can show a
    /// message instead of silently continuing.
    pub fn update_patient(
        &self,
        id: i64,
        name: &str,
        species: &str,
        breed: &str,
        owner_name: &str,
    ) -> Result<(), DbError> {
        let updated = self.execute(
            "UPDATE patients SET name = ?1, species = ?2, breed = ?3, owner_name = ?4
             WHERE id = ?5",
            params![name, species, breed, owner_name, id],
        )?;
        if updated == 0 {
            Err(DbError::NotFound { entity: "patient" })
        } else {
            Ok(())
        }
    }

    /// Remove a patient row. The schema cascades to the patient's exams, so
    /// no manual cleanup is needed here.
    pub fn delete_patient(&self, id: i64) -> Result<(), DbError> {
        let deleted = self.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
        if deleted == 0 {
            Err(DbError::NotFound { entity: "patient" })
        } else {
            Ok(())
        }
    }

    fn patient_by_id(&self, id: i64) -> Result<Option<Patient>, DbError> {
        self.query_optional(
            "SELECT id, name, species, breed, owner_name, created_at
             FROM patients WHERE id = ?1",
            params![id],
            row_to_patient,
        )
    }
}
