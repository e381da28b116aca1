//! CLI command implementations.

pub mod delete;
pub mod events;
pub mod get;
pub mod upsert;

use registers_model::{CompanyNumber, ModelError};
use registers_store::{FileStore, StoreError};
use registers_sync::{Failure, JournalNotifier, NotifyError, Outcome, RegistersService};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Journal file name used when `--journal` is not given.
const DEFAULT_JOURNAL: &str = "events.jsonl";

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid company number or delta body.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Store could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Journal could not be opened or read.
    #[error(transparent)]
    Journal(#[from] NotifyError),

    /// Input file or output stream failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Output encoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// No document for the company.
    #[error("no registers stored for company {0}")]
    NotFound(CompanyNumber),

    /// The store could not be read.
    #[error("{0}")]
    Unavailable(Failure),

    /// The service did not apply the change.
    #[error("change not applied: {0} ({status})", status = .0.status_code())]
    NotApplied(Outcome),
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// The document directory and journal a command operates on.
#[derive(Debug, Clone)]
pub struct Workspace {
    data_dir: PathBuf,
    journal: PathBuf,
}

impl Workspace {
    /// Creates a workspace; the journal defaults to a file in `data_dir`.
    pub fn new(data_dir: PathBuf, journal: Option<PathBuf>) -> Self {
        let journal = journal.unwrap_or_else(|| data_dir.join(DEFAULT_JOURNAL));
        Self { data_dir, journal }
    }

    /// Returns the journal path.
    pub fn journal(&self) -> &Path {
        &self.journal
    }

    /// Opens the service over the file store and journal.
    pub fn open_service(&self) -> CliResult<RegistersService<FileStore, JournalNotifier>> {
        let store = FileStore::open(&self.data_dir)?;
        let notifier = JournalNotifier::open(&self.journal)?;
        Ok(RegistersService::new(store, notifier))
    }
}

/// Prints `outcome` and fails unless it is `Applied`.
pub fn report(outcome: Outcome, out: &mut impl std::io::Write) -> CliResult<()> {
    writeln!(out, "{} ({})", outcome, outcome.status_code())?;
    if outcome.is_applied() {
        Ok(())
    } else {
        Err(CliError::NotApplied(outcome))
    }
}

/// Parses a company number argument.
pub fn company(raw: &str) -> CliResult<CompanyNumber> {
    Ok(CompanyNumber::parse(raw)?)
}
