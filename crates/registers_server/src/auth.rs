//! ERIC identity filter.
//!
//! Requests arrive with identity headers set by the API gateway:
//! - `ERIC-Identity`: the caller id, must be non-blank
//! - `ERIC-Identity-Type`: `key` or `oauth2`
//! - `ERIC-Authorised-Key-Privileges`: comma-separated privileges of an
//!   API key
//!
//! Reads are open to any identified caller. Writes need an API key that
//! holds the configured privilege.

use crate::error::{ServerError, ServerResult};
use crate::http::{ApiRequest, Method};

/// Header carrying the caller id.
pub const IDENTITY_HEADER: &str = "ERIC-Identity";
/// Header carrying the identity type.
pub const IDENTITY_TYPE_HEADER: &str = "ERIC-Identity-Type";
/// Header carrying API key privileges.
pub const KEY_PRIVILEGES_HEADER: &str = "ERIC-Authorised-Key-Privileges";

/// How the caller authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityType {
    /// API key.
    Key,
    /// OAuth2 user session.
    OAuth2,
}

impl IdentityType {
    fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("key") {
            Some(IdentityType::Key)
        } else if raw.eq_ignore_ascii_case("oauth2") {
            Some(IdentityType::OAuth2)
        } else {
            None
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Caller id.
    pub id: String,
    /// Authentication kind.
    pub kind: IdentityType,
}

/// Checks identity headers against the route's requirements.
#[derive(Debug, Clone)]
pub struct IdentityFilter {
    write_privilege: String,
}

impl IdentityFilter {
    /// Creates a filter that requires `write_privilege` for writes.
    pub fn new(write_privilege: impl Into<String>) -> Self {
        Self {
            write_privilege: write_privilege.into(),
        }
    }

    /// Returns the privilege required for writes.
    pub fn write_privilege(&self) -> &str {
        &self.write_privilege
    }

    /// Authenticates and authorises `request`.
    ///
    /// # Errors
    ///
    /// [`ServerError::AuthenticationFailed`] if the identity is missing or
    /// of an unknown type; [`ServerError::NotAuthorized`] if a write is
    /// attempted without an API key holding the write privilege.
    pub fn check(&self, request: &ApiRequest) -> ServerResult<Identity> {
        let id = request
            .header(IDENTITY_HEADER)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServerError::AuthenticationFailed("missing identity".into()))?;

        let kind = request
            .header(IDENTITY_TYPE_HEADER)
            .map(str::trim)
            .and_then(IdentityType::parse)
            .ok_or_else(|| ServerError::AuthenticationFailed("unsupported identity type".into()))?;

        if request.method != Method::Get {
            if kind != IdentityType::Key {
                return Err(ServerError::NotAuthorized(
                    "writes require an API key".into(),
                ));
            }
            if !self.has_write_privilege(request) {
                return Err(ServerError::NotAuthorized(format!(
                    "API key lacks the {} privilege",
                    self.write_privilege
                )));
            }
        }

        Ok(Identity {
            id: id.to_string(),
            kind,
        })
    }

    fn has_write_privilege(&self, request: &ApiRequest) -> bool {
        request
            .header(KEY_PRIVILEGES_HEADER)
            .map(|raw| {
                raw.split(',')
                    .any(|privilege| privilege.trim() == self.write_privilege)
            })
            .unwrap_or(false)
    }
}

impl Default for IdentityFilter {
    fn default() -> Self {
        Self::new("internal-app")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method) -> ApiRequest {
        ApiRequest::new(method, "/company/00006400/registers")
    }

    #[test]
    fn missing_identity_is_unauthenticated() {
        let filter = IdentityFilter::default();
        let err = filter.check(&request(Method::Get)).unwrap_err();
        assert_eq!(err.status_code(), 401);

        let blank = request(Method::Get)
            .with_header(IDENTITY_HEADER, "  ")
            .with_header(IDENTITY_TYPE_HEADER, "key");
        assert_eq!(filter.check(&blank).unwrap_err().status_code(), 401);
    }

    #[test]
    fn unknown_identity_type_is_unauthenticated() {
        let req = request(Method::Get)
            .with_header(IDENTITY_HEADER, "caller")
            .with_header(IDENTITY_TYPE_HEADER, "session");
        assert_eq!(
            IdentityFilter::default().check(&req).unwrap_err().status_code(),
            401
        );
    }

    #[test]
    fn oauth2_may_read() {
        let req = request(Method::Get)
            .with_header(IDENTITY_HEADER, "user-1")
            .with_header(IDENTITY_TYPE_HEADER, "OAuth2");
        let identity = IdentityFilter::default().check(&req).unwrap();
        assert_eq!(identity.kind, IdentityType::OAuth2);
        assert_eq!(identity.id, "user-1");
    }

    #[test]
    fn oauth2_may_not_write() {
        let req = request(Method::Put)
            .with_header(IDENTITY_HEADER, "user-1")
            .with_header(IDENTITY_TYPE_HEADER, "oauth2")
            .with_header(KEY_PRIVILEGES_HEADER, "internal-app");
        assert_eq!(
            IdentityFilter::default().check(&req).unwrap_err().status_code(),
            403
        );
    }

    #[test]
    fn key_needs_privilege_to_write() {
        let filter = IdentityFilter::default();
        let base = request(Method::Delete)
            .with_header(IDENTITY_HEADER, "key-1")
            .with_header(IDENTITY_TYPE_HEADER, "key");

        let without = base.clone().with_header(KEY_PRIVILEGES_HEADER, "sensitive-data");
        assert_eq!(filter.check(&without).unwrap_err().status_code(), 403);

        let with = base.with_header(KEY_PRIVILEGES_HEADER, "sensitive-data, internal-app");
        assert_eq!(filter.check(&with).unwrap().kind, IdentityType::Key);
    }
}
