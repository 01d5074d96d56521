//! Core library surface for the veterinary exam manager.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the integration tests can reuse the same pieces.
pub mod db;
pub mod error;
pub mod models;
pub mod ui;

/// The persistence facade and the data-directory helper `main` shares with it.
pub use db::{data_dir, Database};

/// Typed failures surfaced by the facade.
pub use error::DbError;

/// The domain types other layers manipulate.
pub use models::{Exam, ExamPayload, Patient, ReferenceValue, Template};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
