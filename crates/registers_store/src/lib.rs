//! # Registers Store
//!
//! Document store trait and implementations for company registers.
//!
//! A store is a keyed document store: get by company number, put a whole
//! document, delete by company number. It offers no transactions across
//! keys and no concurrency control of its own; ordering of writes for a
//! key is decided by the caller.
//!
//! ## Available Backends
//!
//! - [`InMemoryStore`] - For testing and ephemeral use
//! - [`FileStore`] - One JSON document per company under a directory
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use registers_model::{CompanyNumber, RegistersDocument};
//! use registers_store::{InMemoryStore, RegistersStore};
//!
//! let store = InMemoryStore::new();
//! let id = CompanyNumber::parse("00006400").unwrap();
//! let doc = RegistersDocument::builder(id.clone(), Utc::now()).build().unwrap();
//! store.put(&doc).unwrap();
//! assert_eq!(store.get(&id).unwrap(), Some(doc));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use store::RegistersStore;
