use std::collections::HashMap;

use rusqlite::params;

use crate::error::DbError;

use super::Database;

impl Database {
    /// Fetch every setting row folded into a key/value map. The primary key
    /// on `key` means duplicates cannot occur; if one ever did, the fold
    /// keeps the last row read.
    pub fn all_settings(&self) -> Result<HashMap<String, String>, DbError> {
        let rows = self.query(
            "SELECT key, value FROM settings",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                ))
            },
        )?;
        Ok(rows.into_iter().collect())
    }

    /// Upsert a setting with replace-on-conflict semantics: writing the same
    /// key twice keeps only the latest value.
    pub fn save_setting(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
