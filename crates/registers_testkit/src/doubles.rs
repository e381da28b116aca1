//! Collaborator doubles.
//!
//! [`FaultyStore`] and [`LoggedNotifier`] share a [`CallLog`], so tests can
//! assert on the order in which the service touched the store and the
//! notifier, and can make either side fail on demand.

use parking_lot::Mutex;
use registers_model::{CompanyNumber, EventType, RegistersDocument};
use registers_store::{RegistersStore, StoreError, StoreResult};
use registers_sync::{ChangeEvent, ChangeKind, ChangeNotifier, NotifyResult, RequestContext};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use registers_sync::RecordingNotifier;

/// One collaborator call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Store read.
    Get(CompanyNumber),
    /// Store write.
    Put(CompanyNumber),
    /// Store delete.
    Delete(CompanyNumber),
    /// Notifier call.
    Notify(CompanyNumber, EventType),
}

/// Shared, ordered record of collaborator calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call.
    pub fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    /// Returns every call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Returns only the calls that change state (writes and notifications).
    pub fn effects(&self) -> Vec<Call> {
        self.calls
            .lock()
            .iter()
            .filter(|call| !matches!(call, Call::Get(_)))
            .cloned()
            .collect()
    }

    /// Forgets every call.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

/// Wraps a store, logging each call and failing selected operations.
#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    log: CallLog,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
}

impl<S: RegistersStore> FaultyStore<S> {
    /// Wraps `inner`, recording into `log`.
    pub fn new(inner: S, log: CallLog) -> Self {
        Self {
            inner,
            log,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
        }
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Makes reads fail with [`StoreError::Unavailable`].
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes writes fail with [`StoreError::Unavailable`].
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes deletes fail with [`StoreError::Unavailable`].
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, op: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{} refused by test", op)));
        }
        Ok(())
    }
}

impl<S: RegistersStore> RegistersStore for FaultyStore<S> {
    fn get(&self, id: &CompanyNumber) -> StoreResult<Option<RegistersDocument>> {
        self.log.record(Call::Get(id.clone()));
        Self::check(&self.fail_reads, "read")?;
        self.inner.get(id)
    }

    fn put(&self, document: &RegistersDocument) -> StoreResult<()> {
        self.log.record(Call::Put(document.id().clone()));
        Self::check(&self.fail_writes, "write")?;
        self.inner.put(document)
    }

    fn delete(&self, id: &CompanyNumber) -> StoreResult<()> {
        self.log.record(Call::Delete(id.clone()));
        Self::check(&self.fail_deletes, "delete")?;
        self.inner.delete(id)
    }
}

/// Wraps a notifier, logging each call before delegating.
#[derive(Debug)]
pub struct LoggedNotifier<N> {
    inner: N,
    log: CallLog,
}

impl<N: ChangeNotifier> LoggedNotifier<N> {
    /// Wraps `inner`, recording into `log`.
    pub fn new(inner: N, log: CallLog) -> Self {
        Self { inner, log }
    }

    /// Returns the wrapped notifier.
    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: ChangeNotifier> ChangeNotifier for LoggedNotifier<N> {
    fn notify(&self, ctx: &RequestContext, event: &ChangeEvent) -> NotifyResult<()> {
        let event_type = match event.kind {
            ChangeKind::Changed => EventType::Changed,
            ChangeKind::Deleted { .. } => EventType::Deleted,
        };
        self.log
            .record(Call::Notify(event.company_number.clone(), event_type));
        self.inner.notify(ctx, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{company, epoch};
    use registers_store::InMemoryStore;

    #[test]
    fn faulty_store_logs_refused_calls() {
        let log = CallLog::new();
        let store = FaultyStore::new(InMemoryStore::new(), log.clone());
        store.fail_reads(true);

        assert!(store.get(&company("00000001")).is_err());
        assert_eq!(log.calls(), vec![Call::Get(company("00000001"))]);
        assert!(log.effects().is_empty());
    }

    #[test]
    fn logged_notifier_delegates() {
        let log = CallLog::new();
        let notifier = LoggedNotifier::new(RecordingNotifier::new(), log.clone());
        let event = ChangeEvent::changed(company("00000001"), epoch());

        notifier.notify(&RequestContext::new("r"), &event).unwrap();
        assert_eq!(notifier.inner().events().len(), 1);
        assert_eq!(
            log.calls(),
            vec![Call::Notify(company("00000001"), EventType::Changed)]
        );
    }
}
