//! Error types for the adapter.

use thiserror::Error;

/// Result type for adapter operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors the adapter answers with directly.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Malformed request (bad company number or body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Caller could not be identified.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Caller is identified but lacks the required privilege.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// No route for the path.
    #[error("no route for {0}")]
    NoRoute(String),

    /// The path exists but not for this method.
    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
    },

    /// Configuration could not be read.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The store could not be opened.
    #[error("store error: {0}")]
    Store(#[from] registers_store::StoreError),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::InvalidRequest(_)
                | ServerError::AuthenticationFailed(_)
                | ServerError::NotAuthorized(_)
                | ServerError::NoRoute(_)
                | ServerError::MethodNotAllowed { .. }
        )
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self, ServerError::InvalidConfig(_) | ServerError::Store(_))
    }

    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::InvalidRequest(_) => 400,
            ServerError::AuthenticationFailed(_) => 401,
            ServerError::NotAuthorized(_) => 403,
            ServerError::NoRoute(_) => 404,
            ServerError::MethodNotAllowed { .. } => 405,
            ServerError::InvalidConfig(_) => 500,
            ServerError::Store(_) => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(ServerError::InvalidRequest("bad".into()).is_client_error());
        assert!(ServerError::InvalidConfig("oops".into()).is_server_error());
        assert!(!ServerError::NotAuthorized("no".into()).is_server_error());
    }

    #[test]
    fn status_codes() {
        assert_eq!(ServerError::AuthenticationFailed("x".into()).status_code(), 401);
        assert_eq!(ServerError::NotAuthorized("x".into()).status_code(), 403);
        let err = ServerError::MethodNotAllowed {
            method: "POST".into(),
            path: "/healthcheck".into(),
        };
        assert_eq!(err.status_code(), 405);
        assert_eq!(err.to_string(), "method POST not allowed on /healthcheck");
    }
}
