//! Inbound deltas.

use crate::company::CompanyNumber;
use crate::error::ModelResult;
use crate::marker::VersionMarker;
use crate::registers::Registers;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A partial update for one company's registers.
///
/// Deltas are transient: they are decoded per request, consumed by the
/// sync service, and never stored in their own right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistersDelta {
    /// Target company.
    pub company_number: CompanyNumber,
    /// Ordering token of this delta.
    pub delta_at: VersionMarker,
    /// Who produced the delta upstream, if known.
    pub updated_by: Option<String>,
    /// Categories to set. Absent categories are left untouched.
    pub registers: Registers,
}

impl RegistersDelta {
    /// Creates a delta.
    pub fn new(company_number: CompanyNumber, delta_at: VersionMarker, registers: Registers) -> Self {
        Self {
            company_number,
            delta_at,
            updated_by: None,
            registers,
        }
    }

    /// Sets the upstream author.
    #[must_use]
    pub fn with_updated_by(mut self, updated_by: impl Into<String>) -> Self {
        self.updated_by = Some(updated_by.into());
        self
    }

    /// Builds a delta from a decoded request body.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MismatchedRegisterType`](crate::ModelError::MismatchedRegisterType)
    /// if a list is supplied under a category other than its own.
    pub fn from_request(
        company_number: CompanyNumber,
        request: InternalRegisters,
    ) -> ModelResult<Self> {
        request.external_data.validate()?;
        Ok(Self {
            company_number,
            delta_at: VersionMarker::from_datetime(request.internal_data.delta_at),
            updated_by: request.internal_data.updated_by,
            registers: request.external_data,
        })
    }

    /// Decodes a JSON request body for `company_number`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a valid [`InternalRegisters`]
    /// or files a list under the wrong category.
    pub fn from_json(company_number: CompanyNumber, body: &[u8]) -> ModelResult<Self> {
        let request: InternalRegisters = serde_json::from_slice(body)?;
        Self::from_request(company_number, request)
    }

    /// Encodes the delta in request-body form.
    pub fn to_request(&self) -> InternalRegisters {
        InternalRegisters {
            internal_data: InternalData {
                delta_at: self.delta_at.as_datetime().fixed_offset(),
                updated_by: self.updated_by.clone(),
            },
            external_data: self.registers.clone(),
        }
    }
}

/// Request body of a registers upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalRegisters {
    /// Delta metadata.
    pub internal_data: InternalData,
    /// The categories carried by the delta.
    #[serde(default)]
    pub external_data: Registers,
}

/// Delta metadata supplied by the upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalData {
    /// Timestamp of the delta, with offset.
    pub delta_at: DateTime<FixedOffset>,
    /// Who produced the delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}
