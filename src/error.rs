//! Error types for the persistence layer.

use thiserror::Error;

/// Failures surfaced by [`crate::db::Database`] operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file or its parent directory could not be opened.
    #[error("failed to open database: {0}")]
    Open(#[source] rusqlite::Error),

    /// The application data directory could not be resolved or created.
    #[error("failed to prepare data directory: {0}")]
    DataDir(String),

    /// A statement failed to prepare or execute. Carries the statement text
    /// so callers and logs can tell which query went wrong.
    #[error("statement failed: {statement}: {source}")]
    Statement {
        statement: String,
        #[source]
        source: rusqlite::Error,
    },

    /// An update or delete matched zero rows.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A unique constraint rejected the given name.
    #[error("{entity} \"{name}\" already exists")]
    Duplicate { entity: &'static str, name: String },

    /// An outgoing exam payload could not be serialized.
    #[error("failed to serialize exam payload: {0}")]
    Payload(#[from] serde_json::Error),
}
