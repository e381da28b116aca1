//! # Registers Model
//!
//! Data types for the company registers record.
//!
//! This crate provides:
//! - [`RegistersDocument`], the stored aggregate for one company
//! - [`RegistersDelta`], an inbound partial update with its ordering token
//! - [`Registers`], the payload of independent register categories
//! - [`VersionMarker`], the sortable delta timestamp
//! - [`ChangedResource`], the wire shape of a downstream change event
//!
//! This is a pure model crate with no I/O operations. Documents are
//! immutable values: they are assembled once through
//! [`RegistersDocument::builder`] and replaced wholesale on every write.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod company;
mod delta;
mod document;
mod error;
mod event;
mod marker;
mod registers;

pub use company::CompanyNumber;
pub use delta::{InternalData, InternalRegisters, RegistersDelta};
pub use document::{
    integrity_tag, CompanyRegister, DocumentBuilder, RegistersDocument, SelfLink, Stamp,
    REGISTERS_KIND,
};
pub use error::{ModelError, ModelResult};
pub use event::{ChangedResource, ChangedResourceEvent, EventType};
pub use marker::VersionMarker;
pub use registers::{
    ItemLinks, RegisterCategory, RegisterList, RegisterLocation, RegisteredItem, Registers,
};
