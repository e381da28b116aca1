//! Error types for the sync service.

use crate::outcome::Failure;
use registers_model::ModelError;
use registers_store::StoreError;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors raised by a change notifier.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the call can be retried.
        retryable: bool,
    },

    /// The endpoint answered with a non-success status.
    #[error("notification rejected with status {status}")]
    Rejected {
        /// HTTP status returned.
        status: u16,
    },

    /// The event could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Journal I/O failed.
    #[error("journal error: {0}")]
    Io(#[from] std::io::Error),
}

impl NotifyError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if sending the same event again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            NotifyError::Transport { retryable, .. } => *retryable,
            NotifyError::Rejected { status } => *status >= 500 || *status == 429,
            NotifyError::Io(_) => true,
            NotifyError::Encode(_) => false,
        }
    }
}

/// Result type for steps inside the sync service.
pub type SyncResult<T> = Result<T, SyncError>;

/// A failed step of an upsert or delete.
///
/// Each variant names the step that failed, so the service can report
/// whether the store was changed before the failure.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The delta or the rebuilt document was malformed.
    #[error("invalid delta: {0}")]
    Validation(#[from] ModelError),

    /// The store could not be read or written; nothing was changed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(StoreError),

    /// The document was written but the change was not announced.
    #[error("document written but change notification failed: {0}")]
    NotNotified(NotifyError),

    /// A deletion could not be announced; the document was kept.
    #[error("deletion notification failed, document kept: {0}")]
    NotifyFailed(NotifyError),

    /// A deletion was announced but the document could not be removed.
    #[error("deletion announced but store delete failed: {0}")]
    DeleteFailed(StoreError),
}

impl SyncError {
    /// Classifies the error for the caller.
    pub fn failure(&self) -> Failure {
        match self {
            SyncError::Validation(_) => Failure::Validation,
            SyncError::StoreUnavailable(_) => Failure::StoreUnavailable,
            SyncError::NotNotified(_) => Failure::NotNotified,
            SyncError::NotifyFailed(_) => Failure::NotifyFailed,
            SyncError::DeleteFailed(_) => Failure::DeleteFailed,
        }
    }
}
