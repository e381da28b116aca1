//! The stored registers document.

use crate::company::CompanyNumber;
use crate::error::ModelResult;
use crate::marker::VersionMarker;
use crate::registers::Registers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Resource kind reported for every registers resource.
pub const REGISTERS_KIND: &str = "registers";

/// A point in time wrapped the way the document stores it (`{"at": ...}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    /// The recorded time.
    pub at: DateTime<Utc>,
}

impl Stamp {
    /// Wraps a timestamp.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

/// Self link of a registers resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfLink {
    /// URI of the resource.
    #[serde(rename = "self")]
    pub self_link: String,
}

/// The public view of a company's registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRegister {
    /// The register categories.
    #[serde(default)]
    pub registers: Registers,
    /// Always [`REGISTERS_KIND`].
    pub kind: String,
    /// Links to this resource.
    pub links: SelfLink,
    /// Integrity tag of the payload.
    pub etag: String,
}

/// The stored aggregate for one company.
///
/// A document is an immutable value. Writes build a new document through
/// [`RegistersDocument::builder`] and replace the stored one whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistersDocument {
    #[serde(rename = "_id")]
    id: CompanyNumber,
    data: CompanyRegister,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delta_at: Option<VersionMarker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<Stamp>,
    updated: Stamp,
}

impl RegistersDocument {
    /// Starts building a document for `id`, last written at `updated_at`.
    pub fn builder(id: CompanyNumber, updated_at: DateTime<Utc>) -> DocumentBuilder {
        DocumentBuilder {
            id,
            updated_at,
            registers: Registers::default(),
            delta_at: None,
            created_at: None,
        }
    }

    /// Returns the company number.
    pub fn id(&self) -> &CompanyNumber {
        &self.id
    }

    /// Returns the public view of the document.
    pub fn data(&self) -> &CompanyRegister {
        &self.data
    }

    /// Returns the registers payload.
    pub fn registers(&self) -> &Registers {
        &self.data.registers
    }

    /// Returns the integrity tag.
    pub fn etag(&self) -> &str {
        &self.data.etag
    }

    /// Returns the marker of the delta that produced this document.
    ///
    /// `None` only for documents written before markers were recorded.
    pub fn delta_at(&self) -> Option<VersionMarker> {
        self.delta_at
    }

    /// Returns when the document was first written, if recorded.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.map(|stamp| stamp.at)
    }

    /// Returns when the document was last written.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated.at
    }
}

/// Builder for [`RegistersDocument`].
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    id: CompanyNumber,
    updated_at: DateTime<Utc>,
    registers: Registers,
    delta_at: Option<VersionMarker>,
    created_at: Option<DateTime<Utc>>,
}

impl DocumentBuilder {
    /// Sets the registers payload.
    #[must_use]
    pub fn registers(mut self, registers: Registers) -> Self {
        self.registers = registers;
        self
    }

    /// Sets the version marker.
    #[must_use]
    pub fn delta_at(mut self, marker: VersionMarker) -> Self {
        self.delta_at = Some(marker);
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Builds the document, computing its integrity tag and self link.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be canonically encoded.
    pub fn build(self) -> ModelResult<RegistersDocument> {
        let etag = integrity_tag(&self.id, self.delta_at.as_ref(), &self.registers)?;
        let links = SelfLink {
            self_link: format!("/company/{}/registers", self.id),
        };

        Ok(RegistersDocument {
            data: CompanyRegister {
                registers: self.registers,
                kind: REGISTERS_KIND.to_string(),
                links,
                etag,
            },
            id: self.id,
            delta_at: self.delta_at,
            created: self.created_at.map(Stamp::new),
            updated: Stamp::new(self.updated_at),
        })
    }
}

/// Computes the integrity tag of a payload.
///
/// The tag is the lowercase hex SHA-256 of the canonical JSON encoding of
/// the company number, marker and registers. Equal inputs always produce
/// equal tags.
///
/// # Errors
///
/// Returns an error if the inputs cannot be encoded.
pub fn integrity_tag(
    id: &CompanyNumber,
    delta_at: Option<&VersionMarker>,
    registers: &Registers,
) -> ModelResult<String> {
    #[derive(Serialize)]
    struct TagInput<'a> {
        company_number: &'a CompanyNumber,
        delta_at: Option<&'a VersionMarker>,
        registers: &'a Registers,
    }

    let canonical = serde_json::to_vec(&TagInput {
        company_number: id,
        delta_at,
        registers,
    })?;
    Ok(format!("{:x}", Sha256::digest(&canonical)))
}
