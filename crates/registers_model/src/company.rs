//! Company number, the aggregate key.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a company number.
const MAX_LEN: usize = 10;

/// A validated company number.
///
/// Company numbers are stored upper-cased, so `sc123456` and `SC123456`
/// address the same document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyNumber(String);

impl CompanyNumber {
    /// Parses and normalises a company number.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidCompanyNumber`] if the trimmed input is
    /// empty, longer than ten characters, or not ASCII alphanumeric.
    pub fn parse(raw: &str) -> ModelResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.len() > MAX_LEN
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ModelError::InvalidCompanyNumber(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the company number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CompanyNumber {
    type Error = ModelError;

    fn try_from(value: String) -> ModelResult<Self> {
        Self::parse(&value)
    }
}

impl From<CompanyNumber> for String {
    fn from(value: CompanyNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for CompanyNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_case_and_whitespace() {
        let number = CompanyNumber::parse(" sc123456 ").unwrap();
        assert_eq!(number.as_str(), "SC123456");
        assert_eq!(number.to_string(), "SC123456");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(CompanyNumber::parse("").is_err());
        assert!(CompanyNumber::parse("   ").is_err());
        assert!(CompanyNumber::parse("12/34").is_err());
        assert!(CompanyNumber::parse("12345678901").is_err());
    }

    #[test]
    fn serde_validates() {
        let number: CompanyNumber = serde_json::from_str("\"oc000001\"").unwrap();
        assert_eq!(number.as_str(), "OC000001");
        assert_eq!(serde_json::to_string(&number).unwrap(), "\"OC000001\"");

        let bad: Result<CompanyNumber, _> = serde_json::from_str("\"no way\"");
        assert!(bad.is_err());
    }
}
