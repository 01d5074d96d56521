//! The `Database` handle: connection setup plus the generic statement
//! primitives every entity module builds on. The handle is constructed once
//! during startup and injected into whatever needs it; there is no lazy or
//! implicit connecting anywhere else in the codebase.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use rusqlite::{Connection, OptionalExtension, Params, Row};
use tracing::error;

use crate::error::DbError;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".vet-exam-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "records.sqlite";

/// Table definitions, executed one at a time because the embedded engine's
/// `execute` handles a single statement per call. Every statement is
/// `IF NOT EXISTS` so schema setup can run on every startup.
const SCHEMA: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS patients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        species TEXT,
        breed TEXT,
        owner_name TEXT,
        created_at TEXT DEFAULT (datetime('now'))
    )",
    "CREATE TABLE IF NOT EXISTS exams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_id INTEGER NOT NULL,
        exam_type TEXT NOT NULL,
        exam_data TEXT,
        created_at TEXT DEFAULT (datetime('now')),
        updated_at TEXT DEFAULT (datetime('now')),
        FOREIGN KEY(patient_id) REFERENCES patients(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT
    )",
    "CREATE TABLE IF NOT EXISTS templates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        content TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS reference_values (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        exam_type TEXT NOT NULL,
        species TEXT NOT NULL,
        organ TEXT NOT NULL,
        measurement TEXT NOT NULL,
        min_value REAL,
        max_value REAL,
        unit TEXT,
        UNIQUE(exam_type, species, organ, measurement)
    )",
];

/// Single point of access to the embedded store. Owns the one connection the
/// application uses; the CRUD methods in the sibling modules are
/// `impl Database` blocks over these primitives.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at its packaged location under the user's home
    /// directory, creating the data directory if needed.
    pub fn open() -> Result<Self, DbError> {
        let dir = data_dir()?;
        fs::create_dir_all(&dir)
            .map_err(|err| DbError::DataDir(format!("{}: {err}", dir.display())))?;
        Self::open_at(dir.join(DB_FILE_NAME))
    }

    /// Open the database at an explicit path. Used by tooling and the on-disk
    /// tests; production code goes through [`Database::open`].
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|err| {
            error!(path = %path.display(), error = %err, "failed to open SQLite database");
            DbError::Open(err)
        })?;
        Self::from_connection(conn)
    }

    /// Open a throwaway in-memory database. Test-oriented, but kept in the
    /// public API so external tooling can exercise the facade without a file.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(|err| {
            error!(error = %err, "failed to open in-memory SQLite database");
            DbError::Open(err)
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        // Cascade deletes in the schema only fire with the pragma enabled.
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|err| statement_error("PRAGMA foreign_keys = ON", err))?;
        Ok(Self { conn })
    }

    /// Run a non-returning statement (insert/update/delete/DDL) with
    /// positional parameters. Returns the number of rows affected. Failures
    /// are logged with the statement text and returned to the caller.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize, DbError> {
        self.conn
            .execute(sql, params)
            .map_err(|err| statement_error(sql, err))
    }

    /// Run a returning statement, mapping every row through `map`. Same
    /// failure and logging contract as [`Database::execute`].
    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, DbError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|err| statement_error(sql, err))?;
        let rows = stmt
            .query_map(params, map)
            .map_err(|err| statement_error(sql, err))?;
        rows.collect::<rusqlite::Result<Vec<T>>>()
            .map_err(|err| statement_error(sql, err))
    }

    /// Run a single-row query, returning `None` when no row matches.
    pub fn query_optional<T, P, F>(
        &self,
        sql: &str,
        params: P,
        map: F,
    ) -> Result<Option<T>, DbError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.conn
            .query_row(sql, params, map)
            .optional()
            .map_err(|err| statement_error(sql, err))
    }

    /// Rowid of the most recent successful insert on this connection.
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Idempotently create the five tables, one sequential statement each.
    /// The first failing statement aborts setup and is returned to the
    /// caller, which treats it as fatal at startup; a partially created
    /// schema never goes unnoticed.
    pub fn ensure_schema(&self) -> Result<(), DbError> {
        for statement in SCHEMA {
            self.execute(statement, [])?;
        }
        Ok(())
    }
}

/// Resolve the application data directory inside the user's home. Shared by
/// [`Database::open`] and the log-file setup in `main`.
pub fn data_dir() -> Result<PathBuf, DbError> {
    let base_dirs = BaseDirs::new()
        .ok_or_else(|| DbError::DataDir("could not locate home directory".into()))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Log a failed statement with its text and wrap it in the typed error.
fn statement_error(sql: &str, source: rusqlite::Error) -> DbError {
    error!(statement = sql, error = %source, "database statement failed");
    DbError::Statement {
        statement: sql.to_string(),
        source,
    }
}
