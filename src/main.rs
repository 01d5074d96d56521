//! Binary entry point that glues the SQLite-backed domain model to the TUI:
//! bring up logging and the database, hydrate the initial app state, and
//! drive the Ratatui event loop until the user exits.

use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use vet_exam_manager::{data_dir, run_app, App, Database};

/// Log file name inside the application data directory.
const LOG_FILE_NAME: &str = "vet-exam-manager.log";

fn main() -> Result<()> {
    init_logging().context("failed to initialize logging")?;

    let db = Database::open()?;
    db.ensure_schema()?;

    let patients = db.list_patients()?;
    let settings = db.all_settings()?;

    let mut app = App::new(db, patients, settings)?;
    run_app(&mut app)
}

/// Route tracing output to a file inside the data directory. The TUI owns
/// the terminal, so logs cannot go to stderr.
fn init_logging() -> Result<()> {
    let dir = data_dir()?;
    fs::create_dir_all(&dir).context("failed to create data directory")?;
    let file = File::create(dir.join(LOG_FILE_NAME)).context("failed to create log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
