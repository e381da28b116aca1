//! # Registers Sync
//!
//! Delta ingestion and change notification for company registers.
//!
//! This crate provides:
//! - The recency gate (accept or reject a delta by its version marker)
//! - The merge engine (fold a partial delta into the stored payload)
//! - The change notifier contract, with HTTP, journal and recording
//!   implementations
//! - [`RegistersService`], which sequences store and notifier calls and
//!   classifies every result into an [`Outcome`]
//!
//! ## Protocol
//!
//! Upsert persists before it notifies:
//! 1. Read the stored document
//! 2. Reject the delta as stale if the stored marker is strictly newer
//! 3. Merge the delta's categories over the stored payload
//! 4. Write the new document
//! 5. Announce `changed` downstream
//!
//! Delete notifies before it removes:
//! 1. Read the stored document (absent is `NotFound`)
//! 2. Announce `deleted` with the last visible content
//! 3. Remove the document only if the announcement succeeded
//!
//! ## Key Invariants
//!
//! - A delta whose marker equals the stored marker is accepted, so a
//!   retry after a failed notification replays cleanly
//! - Categories absent from a delta are never touched
//! - `created_at` is fixed by the first write
//! - Collaborator errors never escape; callers see only [`Outcome`]

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod clock;
mod config;
mod context;
mod error;
mod gate;
mod http;
mod merge;
mod notifier;
mod outcome;
mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::NotifierConfig;
pub use context::RequestContext;
pub use error::{NotifyError, NotifyResult, SyncError, SyncResult};
pub use gate::{check_recency, AcceptReason, Recency};
pub use http::{HttpClient, HttpNotifier};
pub use merge::merge_registers;
pub use notifier::{
    read_journal, ChangeEvent, ChangeKind, ChangeNotifier, JournalNotifier, RecordingNotifier,
};
pub use outcome::{Failure, Outcome};
pub use service::RegistersService;
