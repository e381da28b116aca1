//! The synchronization service.

use crate::clock::{Clock, SystemClock};
use crate::context::RequestContext;
use crate::error::{SyncError, SyncResult};
use crate::gate::{check_recency, Recency};
use crate::merge::merge_registers;
use crate::notifier::{ChangeEvent, ChangeNotifier};
use crate::outcome::{Failure, Outcome};
use registers_model::{CompanyNumber, RegistersDelta, RegistersDocument};
use registers_store::RegistersStore;
use tracing::{debug, error, info, info_span, warn};

/// Applies deltas and deletions to the store and announces them.
///
/// The service holds no per-company state. Two concurrent calls for the
/// same company are serialised only as far as the store serialises them;
/// the recency gate makes the later marker win on replay.
pub struct RegistersService<S, N, K = SystemClock> {
    store: S,
    notifier: N,
    clock: K,
}

impl<S, N> RegistersService<S, N, SystemClock>
where
    S: RegistersStore,
    N: ChangeNotifier,
{
    /// Creates a service using wall-clock time.
    pub fn new(store: S, notifier: N) -> Self {
        Self::with_clock(store, notifier, SystemClock)
    }
}

impl<S, N, K> RegistersService<S, N, K>
where
    S: RegistersStore,
    N: ChangeNotifier,
    K: Clock,
{
    /// Creates a service with an explicit time source.
    pub fn with_clock(store: S, notifier: N, clock: K) -> Self {
        Self {
            store,
            notifier,
            clock,
        }
    }

    /// Returns the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Applies `delta` to the company's document.
    ///
    /// Returns [`Outcome::Applied`] once the merged document is stored and
    /// the change announced, or [`Outcome::Stale`] without writing if the
    /// stored document carries a strictly later marker. A notification
    /// failure after the write yields
    /// `ServerError(Failure::NotNotified)`; replaying the same delta is
    /// then accepted and re-announces the change.
    pub fn upsert(&self, ctx: &RequestContext, delta: &RegistersDelta) -> Outcome {
        let span = info_span!(
            "upsert",
            request_id = ctx.request_id(),
            identity = ctx.identity(),
            company_number = %delta.company_number,
            delta_at = %delta.delta_at,
        );
        let _enter = span.enter();

        if let Some(updated_by) = &delta.updated_by {
            debug!(updated_by = %updated_by, "delta received");
        }

        match self.try_upsert(ctx, delta) {
            Ok(outcome) => {
                info!(%outcome, "upsert finished");
                outcome
            }
            Err(e) => {
                error!(error = %e, "upsert failed");
                Outcome::ServerError(e.failure())
            }
        }
    }

    /// Reads the company's document.
    ///
    /// # Errors
    ///
    /// Returns [`Failure::StoreUnavailable`] if the store cannot be read.
    pub fn get(
        &self,
        ctx: &RequestContext,
        company_number: &CompanyNumber,
    ) -> Result<Option<RegistersDocument>, Failure> {
        self.store.get(company_number).map_err(|e| {
            error!(
                request_id = ctx.request_id(),
                company_number = %company_number,
                error = %e,
                "store read failed"
            );
            Failure::StoreUnavailable
        })
    }

    /// Deletes the company's document.
    ///
    /// The deletion is announced first, carrying the document's last
    /// visible content. The document is removed only if that succeeds, so
    /// a failed announcement leaves everything in place for a retry.
    pub fn delete(&self, ctx: &RequestContext, company_number: &CompanyNumber) -> Outcome {
        let span = info_span!(
            "delete",
            request_id = ctx.request_id(),
            identity = ctx.identity(),
            company_number = %company_number,
        );
        let _enter = span.enter();

        match self.try_delete(ctx, company_number) {
            Ok(outcome) => {
                info!(%outcome, "delete finished");
                outcome
            }
            Err(e) => {
                error!(error = %e, "delete failed");
                Outcome::ServerError(e.failure())
            }
        }
    }

    fn try_upsert(&self, ctx: &RequestContext, delta: &RegistersDelta) -> SyncResult<Outcome> {
        let existing = self
            .store
            .get(&delta.company_number)
            .map_err(SyncError::StoreUnavailable)?;

        if let Recency::Reject { stored } = check_recency(existing.as_ref(), delta.delta_at) {
            warn!(stored_delta_at = %stored, "delta is older than stored document");
            return Ok(Outcome::Stale);
        }

        let registers = merge_registers(existing.as_ref().map(|d| d.registers()), &delta.registers);
        let now = self.clock.now();
        let created_at = existing
            .as_ref()
            .and_then(RegistersDocument::created_at)
            .unwrap_or(now);

        let document = RegistersDocument::builder(delta.company_number.clone(), now)
            .registers(registers)
            .delta_at(delta.delta_at)
            .created_at(created_at)
            .build()?;

        self.store
            .put(&document)
            .map_err(SyncError::StoreUnavailable)?;
        debug!(etag = document.etag(), "document stored");

        let event = ChangeEvent::changed(delta.company_number.clone(), now);
        self.notifier
            .notify(ctx, &event)
            .map_err(SyncError::NotNotified)?;

        Ok(Outcome::Applied)
    }

    fn try_delete(&self, ctx: &RequestContext, company_number: &CompanyNumber) -> SyncResult<Outcome> {
        let Some(existing) = self
            .store
            .get(company_number)
            .map_err(SyncError::StoreUnavailable)?
        else {
            return Ok(Outcome::NotFound);
        };

        let event = ChangeEvent::deleted(
            company_number.clone(),
            existing.data().clone(),
            self.clock.now(),
        );
        self.notifier
            .notify(ctx, &event)
            .map_err(SyncError::NotifyFailed)?;

        self.store
            .delete(company_number)
            .map_err(SyncError::DeleteFailed)?;

        Ok(Outcome::Applied)
    }
}
