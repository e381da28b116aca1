//! # Registers Testkit
//!
//! Test utilities for the registers sync service.
//!
//! This crate provides:
//! - Fixtures for company numbers, markers, payloads and deltas
//! - Property-based test generators using proptest
//! - A store double with switchable failures and an operation log
//! - Harnesses wiring the service to in-memory collaborators, or to a
//!   file store and event journal in a temporary directory
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registers_testkit::prelude::*;
//!
//! #[test]
//! fn applies_first_delta() {
//!     let harness = SyncHarness::new();
//!     let outcome = harness.upsert(&delta("00006400", "20240101000000000000", directors()));
//!     assert!(outcome.is_applied());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod doubles;
pub mod fixtures;
pub mod generators;
pub mod harness;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::doubles::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::harness::*;
}

pub use doubles::*;
pub use fixtures::*;
pub use generators::*;
pub use harness::*;
