//! In-memory store for testing.

use crate::error::{StoreError, StoreResult};
use crate::store::RegistersStore;
use parking_lot::RwLock;
use registers_model::{CompanyNumber, RegistersDocument};
use std::collections::HashMap;

/// An in-memory document store.
///
/// Suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral services that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<CompanyNumber, RegistersDocument>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with documents.
    #[must_use]
    pub fn with_documents(documents: impl IntoIterator<Item = RegistersDocument>) -> Self {
        let documents = documents
            .into_iter()
            .map(|doc| (doc.id().clone(), doc))
            .collect();
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Returns the stored company numbers, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<CompanyNumber> {
        let mut keys: Vec<_> = self.documents.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Removes every document.
    pub fn clear(&self) {
        self.documents.write().clear();
    }
}

impl RegistersStore for InMemoryStore {
    fn get(&self, id: &CompanyNumber) -> StoreResult<Option<RegistersDocument>> {
        Ok(self.documents.read().get(id).cloned())
    }

    fn put(&self, document: &RegistersDocument) -> StoreResult<()> {
        self.documents
            .write()
            .insert(document.id().clone(), document.clone());
        Ok(())
    }

    fn delete(&self, id: &CompanyNumber) -> StoreResult<()> {
        self.documents
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use registers_model::VersionMarker;
    use std::sync::Arc;

    fn doc(id: &str, marker: &str) -> RegistersDocument {
        RegistersDocument::builder(
            CompanyNumber::parse(id).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .delta_at(VersionMarker::parse(marker).unwrap())
        .build()
        .unwrap()
    }

    #[test]
    fn new_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        let id = CompanyNumber::parse("00000001").unwrap();
        assert_eq!(store.get(&id).unwrap(), None);
    }

    #[test]
    fn put_then_get() {
        let store = InMemoryStore::new();
        let document = doc("00000001", "20240101000000000000");
        store.put(&document).unwrap();
        assert_eq!(store.get(document.id()).unwrap(), Some(document));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_replaces_whole_document() {
        let store = InMemoryStore::new();
        store.put(&doc("00000001", "20240101000000000000")).unwrap();
        let newer = doc("00000001", "20240102000000000000");
        store.put(&newer).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(newer.id()).unwrap(), Some(newer));
    }

    #[test]
    fn delete_removes_document() {
        let store = InMemoryStore::with_documents([doc("00000001", "20240101000000000000")]);
        let id = CompanyNumber::parse("00000001").unwrap();

        store.delete(&id).unwrap();
        assert_eq!(store.get(&id).unwrap(), None);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let store = InMemoryStore::new();
        let id = CompanyNumber::parse("00000001").unwrap();
        assert!(matches!(store.delete(&id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryStore::with_documents([
            doc("00000002", "20240101000000000000"),
            doc("00000001", "20240101000000000000"),
        ]);
        let keys: Vec<_> = store.keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["00000001", "00000002"]);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .put(&doc(&format!("{:08}", i), "20240101000000000000"))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 8);
    }
}
