//! Store trait definition.

use crate::error::StoreResult;
use registers_model::{CompanyNumber, RegistersDocument};
use std::sync::Arc;

/// A keyed document store for registers documents.
///
/// # Invariants
///
/// - At most one document exists per company number
/// - `put` replaces the whole document (last writer wins)
/// - `get` after a successful `put` returns exactly the document written
/// - Implementations must be `Send + Sync` and safe for concurrent access
///   to independent keys
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait RegistersStore: Send + Sync {
    /// Reads the document for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read. An absent document is
    /// `Ok(None)`, not an error.
    fn get(&self, id: &CompanyNumber) -> StoreResult<Option<RegistersDocument>>;

    /// Writes `document`, replacing any existing document with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the document could not be durably written.
    fn put(&self, document: &RegistersDocument) -> StoreResult<()>;

    /// Deletes the document for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::NotFound`] if no document exists, or
    /// another error if the store cannot be written.
    fn delete(&self, id: &CompanyNumber) -> StoreResult<()>;
}

impl<S: RegistersStore + ?Sized> RegistersStore for Arc<S> {
    fn get(&self, id: &CompanyNumber) -> StoreResult<Option<RegistersDocument>> {
        (**self).get(id)
    }

    fn put(&self, document: &RegistersDocument) -> StoreResult<()> {
        (**self).put(document)
    }

    fn delete(&self, id: &CompanyNumber) -> StoreResult<()> {
        (**self).delete(id)
    }
}

impl<S: RegistersStore + ?Sized> RegistersStore for Box<S> {
    fn get(&self, id: &CompanyNumber) -> StoreResult<Option<RegistersDocument>> {
        (**self).get(id)
    }

    fn put(&self, document: &RegistersDocument) -> StoreResult<()> {
        (**self).put(document)
    }

    fn delete(&self, id: &CompanyNumber) -> StoreResult<()> {
        (**self).delete(id)
    }
}
