//! Error types for model construction and decoding.

use crate::registers::RegisterCategory;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while building or decoding model values.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The company number is empty or contains invalid characters.
    #[error("invalid company number: {0:?}")]
    InvalidCompanyNumber(String),

    /// The version marker is not a 20-digit `yyyyMMddHHmmssSSSSSS` string.
    #[error("invalid version marker: {0:?}")]
    InvalidVersionMarker(String),

    /// A register list sits under a category other than its own
    /// `register_type`.
    #[error("register list of type {register_type} supplied as {slot}")]
    MismatchedRegisterType {
        /// The category slot the list was supplied under.
        slot: RegisterCategory,
        /// The list's own category.
        register_type: RegisterCategory,
    },

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::InvalidVersionMarker("2024".into());
        assert_eq!(err.to_string(), "invalid version marker: \"2024\"");

        let err = ModelError::MismatchedRegisterType {
            slot: RegisterCategory::Directors,
            register_type: RegisterCategory::Members,
        };
        assert_eq!(
            err.to_string(),
            "register list of type members supplied as directors"
        );

        let err = ModelError::InvalidCompanyNumber(String::new());
        assert!(err.to_string().contains("company number"));
    }
}
