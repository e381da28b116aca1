//! Services wired to test collaborators.

use crate::doubles::{CallLog, FaultyStore, LoggedNotifier, RecordingNotifier};
use crate::fixtures::epoch;
use registers_model::{ChangedResource, CompanyNumber, RegistersDelta, RegistersDocument};
use registers_store::{FileStore, InMemoryStore, RegistersStore};
use registers_sync::{
    read_journal, FixedClock, JournalNotifier, Outcome, RegistersService, RequestContext,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// The service type a [`SyncHarness`] drives.
pub type HarnessService = RegistersService<
    Arc<FaultyStore<InMemoryStore>>,
    Arc<LoggedNotifier<RecordingNotifier>>,
    Arc<FixedClock>,
>;

/// A sync service over an in-memory store, a recording notifier and a
/// fixed clock, with a shared call log.
pub struct SyncHarness {
    /// The service under test.
    pub service: HarnessService,
    /// The store, with failure switches.
    pub store: Arc<FaultyStore<InMemoryStore>>,
    /// The notifier, with its recorded events.
    pub notifier: Arc<LoggedNotifier<RecordingNotifier>>,
    /// The clock, starting at [`epoch`].
    pub clock: Arc<FixedClock>,
    /// Ordered store and notifier calls.
    pub log: CallLog,
}

impl SyncHarness {
    /// Creates a harness with an empty store.
    pub fn new() -> Self {
        let log = CallLog::new();
        let store = Arc::new(FaultyStore::new(InMemoryStore::new(), log.clone()));
        let notifier = Arc::new(LoggedNotifier::new(RecordingNotifier::new(), log.clone()));
        let clock = Arc::new(FixedClock::new(epoch()));
        let service = RegistersService::with_clock(store.clone(), notifier.clone(), clock.clone());
        Self {
            service,
            store,
            notifier,
            clock,
            log,
        }
    }

    /// Returns the recording notifier.
    pub fn recorder(&self) -> &RecordingNotifier {
        self.notifier.inner()
    }

    /// Applies `delta` under a fresh request id.
    pub fn upsert(&self, delta: &RegistersDelta) -> Outcome {
        self.service.upsert(&RequestContext::generate(), delta)
    }

    /// Deletes under a fresh request id.
    pub fn delete(&self, company_number: &CompanyNumber) -> Outcome {
        self.service.delete(&RequestContext::generate(), company_number)
    }

    /// Reads the stored document directly, bypassing the call log.
    pub fn stored(&self, company_number: &CompanyNumber) -> Option<RegistersDocument> {
        self.store
            .inner()
            .get(company_number)
            .expect("in-memory store read")
    }
}

impl Default for SyncHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The service type a [`FileHarness`] drives.
pub type FileHarnessService = RegistersService<FileStore, JournalNotifier, Arc<FixedClock>>;

/// A sync service over a file store and an event journal in a temporary
/// directory, removed when the harness is dropped.
pub struct FileHarness {
    /// The service under test.
    pub service: FileHarnessService,
    /// The clock, starting at [`epoch`].
    pub clock: Arc<FixedClock>,
    journal: PathBuf,
    temp_dir: TempDir,
}

impl FileHarness {
    /// Creates a harness with an empty document directory and journal.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::open(&temp_dir.path().join("documents"))
            .expect("Failed to open file store");
        let journal = temp_dir.path().join("events.jsonl");
        let notifier = JournalNotifier::open(&journal).expect("Failed to open journal");
        let clock = Arc::new(FixedClock::new(epoch()));
        let service = RegistersService::with_clock(store, notifier, clock.clone());
        Self {
            service,
            clock,
            journal,
            temp_dir,
        }
    }

    /// Returns the temporary directory.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Returns the store's document directory.
    pub fn documents_dir(&self) -> &Path {
        self.service.store().dir()
    }

    /// Returns the journal path.
    pub fn journal_path(&self) -> &Path {
        &self.journal
    }

    /// Applies `delta` under a fresh request id.
    pub fn upsert(&self, delta: &RegistersDelta) -> Outcome {
        self.service.upsert(&RequestContext::generate(), delta)
    }

    /// Deletes under a fresh request id.
    pub fn delete(&self, company_number: &CompanyNumber) -> Outcome {
        self.service.delete(&RequestContext::generate(), company_number)
    }

    /// Reads the stored document from disk.
    pub fn stored(&self, company_number: &CompanyNumber) -> Option<RegistersDocument> {
        self.service
            .store()
            .get(company_number)
            .expect("file store read")
    }

    /// Returns every journalled event, oldest first.
    pub fn events(&self) -> Vec<ChangedResource> {
        read_journal(&self.journal).expect("journal read")
    }
}

impl Default for FileHarness {
    fn default() -> Self {
        Self::new()
    }
}
