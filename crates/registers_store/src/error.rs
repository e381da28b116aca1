//! Error types for store operations.

use registers_model::CompanyNumber;
use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// No document exists for the company.
    #[error("no registers document for company {0}")]
    NotFound(CompanyNumber),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document is unreadable or filed under the wrong key.
    #[error("store corrupted: {0}")]
    Corrupted(String),
}

impl StoreError {
    /// Returns true if the failure is in reaching or using the store,
    /// as opposed to the requested document being absent.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, StoreError::NotFound(_))
    }
}
