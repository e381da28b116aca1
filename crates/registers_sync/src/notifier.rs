//! Change notifier contract and local implementations.

use crate::context::RequestContext;
use crate::error::{NotifyError, NotifyResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use registers_model::{ChangedResource, CompanyNumber, CompanyRegister};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// What happened to the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// Created or updated.
    Changed,
    /// Deleted; carries the content as it was last visible.
    Deleted {
        /// Last visible content.
        snapshot: CompanyRegister,
    },
}

/// A change to announce downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Company whose registers changed.
    pub company_number: CompanyNumber,
    /// Kind of change.
    pub kind: ChangeKind,
    /// Publication time.
    pub published_at: DateTime<Utc>,
}

impl ChangeEvent {
    /// Creates a `changed` event.
    pub fn changed(company_number: CompanyNumber, published_at: DateTime<Utc>) -> Self {
        Self {
            company_number,
            kind: ChangeKind::Changed,
            published_at,
        }
    }

    /// Creates a `deleted` event.
    pub fn deleted(
        company_number: CompanyNumber,
        snapshot: CompanyRegister,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            company_number,
            kind: ChangeKind::Deleted { snapshot },
            published_at,
        }
    }

    /// Builds the wire form, tagged with the request id of `ctx`.
    pub fn to_resource(&self, ctx: &RequestContext) -> ChangedResource {
        match &self.kind {
            ChangeKind::Changed => {
                ChangedResource::changed(&self.company_number, ctx.request_id(), self.published_at)
            }
            ChangeKind::Deleted { snapshot } => ChangedResource::deleted(
                &self.company_number,
                ctx.request_id(),
                self.published_at,
                snapshot.clone(),
            ),
        }
    }
}

/// Announces resource changes to downstream consumers.
///
/// A successful return means the event was accepted for delivery.
/// Implementations must not retry internally; retry is driven by the
/// upstream caller replaying the whole request.
pub trait ChangeNotifier: Send + Sync {
    /// Delivers one event.
    fn notify(&self, ctx: &RequestContext, event: &ChangeEvent) -> NotifyResult<()>;
}

impl<N: ChangeNotifier + ?Sized> ChangeNotifier for Arc<N> {
    fn notify(&self, ctx: &RequestContext, event: &ChangeEvent) -> NotifyResult<()> {
        (**self).notify(ctx, event)
    }
}

impl<N: ChangeNotifier + ?Sized> ChangeNotifier for Box<N> {
    fn notify(&self, ctx: &RequestContext, event: &ChangeEvent) -> NotifyResult<()> {
        (**self).notify(ctx, event)
    }
}

/// Appends events to a JSON-lines file.
///
/// Used by the CLI in place of a downstream API. Each line is one
/// [`ChangedResource`].
#[derive(Debug)]
pub struct JournalNotifier {
    path: PathBuf,
    file: Mutex<File>,
}

impl JournalNotifier {
    /// Opens `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> NotifyResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Returns the journal path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChangeNotifier for JournalNotifier {
    fn notify(&self, ctx: &RequestContext, event: &ChangeEvent) -> NotifyResult<()> {
        let mut line = serde_json::to_vec(&event.to_resource(ctx))?;
        line.push(b'\n');

        let mut file = self.file.lock();
        file.write_all(&line)?;
        file.flush()?;
        debug!(path = %self.path.display(), company_number = %event.company_number, "event journaled");
        Ok(())
    }
}

/// Reads every event from a journal written by [`JournalNotifier`].
///
/// A missing journal reads as empty.
pub fn read_journal(path: &Path) -> NotifyResult<Vec<ChangedResource>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut events = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line)?);
    }
    Ok(events)
}

/// Keeps delivered events in memory.
///
/// Delivery can be switched to fail, which makes this the double for
/// exercising partial-failure paths.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ChangedResource>>,
    attempts: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingNotifier {
    /// Creates a notifier that accepts every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent deliveries fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the events delivered so far, oldest first.
    pub fn events(&self) -> Vec<ChangedResource> {
        self.events.lock().clone()
    }

    /// Returns the number of delivery attempts, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Forgets recorded events and attempts.
    pub fn clear(&self) {
        self.events.lock().clear();
        self.attempts.store(0, Ordering::SeqCst);
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn notify(&self, ctx: &RequestContext, event: &ChangeEvent) -> NotifyResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::transport_retryable("notifier offline"));
        }
        self.events.lock().push(event.to_resource(ctx));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use registers_model::{EventType, Registers, RegistersDocument};
    use tempfile::tempdir;

    fn company() -> CompanyNumber {
        CompanyNumber::parse("SC123456").unwrap()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn changed_resource_shape() {
        let ctx = RequestContext::new("req-9");
        let resource = ChangeEvent::changed(company(), at()).to_resource(&ctx);
        assert_eq!(resource.resource_uri, "company/SC123456/registers");
        assert_eq!(resource.resource_kind, "registers");
        assert_eq!(resource.context_id, "req-9");
        assert_eq!(resource.event.event_type, EventType::Changed);
        assert_eq!(resource.deleted_data, None);
    }

    #[test]
    fn deleted_resource_carries_snapshot() {
        let document = RegistersDocument::builder(company(), at())
            .registers(Registers::new())
            .build()
            .unwrap();
        let ctx = RequestContext::new("req-10");
        let resource =
            ChangeEvent::deleted(company(), document.data().clone(), at()).to_resource(&ctx);
        assert_eq!(resource.event.event_type, EventType::Deleted);
        assert_eq!(resource.deleted_data.as_ref(), Some(document.data()));
    }

    #[test]
    fn recording_notifier_failure_switch() {
        let notifier = RecordingNotifier::new();
        let ctx = RequestContext::new("req");
        let event = ChangeEvent::changed(company(), at());

        notifier.notify(&ctx, &event).unwrap();
        notifier.set_failing(true);
        assert!(notifier.notify(&ctx, &event).is_err());

        assert_eq!(notifier.attempts(), 2);
        assert_eq!(notifier.events().len(), 1);

        notifier.clear();
        assert_eq!(notifier.attempts(), 0);
        assert!(notifier.events().is_empty());
    }

    #[test]
    fn journal_appends_and_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events/journal.jsonl");
        let ctx = RequestContext::new("req-1");

        {
            let notifier = JournalNotifier::open(&path).unwrap();
            notifier.notify(&ctx, &ChangeEvent::changed(company(), at())).unwrap();
        }
        {
            let notifier = JournalNotifier::open(&path).unwrap();
            notifier.notify(&ctx, &ChangeEvent::changed(company(), at())).unwrap();
        }

        let events = read_journal(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.context_id == "req-1"));
    }

    #[test]
    fn missing_journal_reads_empty() {
        let dir = tempdir().unwrap();
        assert!(read_journal(&dir.path().join("none.jsonl")).unwrap().is_empty());
    }
}
