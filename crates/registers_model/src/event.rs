//! Wire shape of the resource-changed event sent downstream.

use crate::company::CompanyNumber;
use crate::document::{CompanyRegister, REGISTERS_KIND};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of change being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// The resource was created or updated.
    Changed,
    /// The resource was deleted.
    Deleted,
}

/// Event envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedResourceEvent {
    /// Kind of change.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// When the event was published.
    pub published_at: DateTime<Utc>,
}

/// A resource-changed notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedResource {
    /// Path of the changed resource, without a leading slash.
    pub resource_uri: String,
    /// Always [`REGISTERS_KIND`].
    pub resource_kind: String,
    /// The event envelope.
    pub event: ChangedResourceEvent,
    /// Request id the change was made under.
    pub context_id: String,
    /// Last visible content, only for deletions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_data: Option<CompanyRegister>,
}

impl ChangedResource {
    /// Builds a `changed` event.
    pub fn changed(
        company_number: &CompanyNumber,
        context_id: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self::new(company_number, context_id, published_at, EventType::Changed, None)
    }

    /// Builds a `deleted` event carrying the last visible content.
    pub fn deleted(
        company_number: &CompanyNumber,
        context_id: impl Into<String>,
        published_at: DateTime<Utc>,
        snapshot: CompanyRegister,
    ) -> Self {
        Self::new(
            company_number,
            context_id,
            published_at,
            EventType::Deleted,
            Some(snapshot),
        )
    }

    fn new(
        company_number: &CompanyNumber,
        context_id: impl Into<String>,
        published_at: DateTime<Utc>,
        event_type: EventType,
        deleted_data: Option<CompanyRegister>,
    ) -> Self {
        Self {
            resource_uri: format!("company/{}/registers", company_number),
            resource_kind: REGISTERS_KIND.to_string(),
            event: ChangedResourceEvent {
                event_type,
                published_at,
            },
            context_id: context_id.into(),
            deleted_data,
        }
    }
}
