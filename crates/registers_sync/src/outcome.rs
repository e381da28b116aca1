//! The closed result set returned to callers.

use std::fmt;
use thiserror::Error;

/// Result of an upsert or delete.
///
/// This is the only thing the service hands back; collaborator errors are
/// logged and folded into [`Outcome::ServerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The change was persisted and announced.
    Applied,
    /// The delta is older than the stored document and was not applied.
    Stale,
    /// There is no document for the company.
    NotFound,
    /// The operation failed server-side and may be retried.
    ServerError(Failure),
}

impl Outcome {
    /// Returns the HTTP status the adapter should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Outcome::Applied => 200,
            Outcome::Stale => 409,
            Outcome::NotFound => 404,
            Outcome::ServerError(_) => 503,
        }
    }

    /// Returns true if the change was applied and announced.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// Returns true if the caller should retry later.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Outcome::ServerError(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied => f.write_str("applied"),
            Outcome::Stale => f.write_str("stale"),
            Outcome::NotFound => f.write_str("not-found"),
            Outcome::ServerError(failure) => write!(f, "server-error ({})", failure),
        }
    }
}

/// Why an operation ended in [`Outcome::ServerError`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The delta or rebuilt document was malformed.
    #[error("validation failure")]
    Validation,
    /// The store could not be used; nothing was changed.
    #[error("store unavailable")]
    StoreUnavailable,
    /// The document was written but downstream was not told.
    #[error("applied but not notified")]
    NotNotified,
    /// Downstream was not told of a deletion; the document was kept.
    #[error("notify failed")]
    NotifyFailed,
    /// Downstream was told of a deletion but the document remains.
    #[error("delete failed after notify")]
    DeleteFailed,
}

impl Failure {
    /// Returns true if the store was changed before the failure.
    pub fn store_changed(&self) -> bool {
        matches!(self, Failure::NotNotified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(Outcome::Applied.status_code(), 200);
        assert_eq!(Outcome::Stale.status_code(), 409);
        assert_eq!(Outcome::NotFound.status_code(), 404);
        assert_eq!(
            Outcome::ServerError(Failure::NotNotified).status_code(),
            503
        );
    }

    #[test]
    fn display() {
        assert_eq!(Outcome::Stale.to_string(), "stale");
        assert_eq!(
            Outcome::ServerError(Failure::NotNotified).to_string(),
            "server-error (applied but not notified)"
        );
    }

    #[test]
    fn only_not_notified_changes_store() {
        assert!(Failure::NotNotified.store_changed());
        assert!(!Failure::NotifyFailed.store_changed());
        assert!(!Failure::StoreUnavailable.store_changed());
    }
}
