//! Per-request context.

use uuid::Uuid;

/// Identifies the request an operation runs under.
///
/// The request id is copied into log fields and into the `context_id` of
/// every change event, so downstream consumers can correlate an event
/// with the write that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
    identity: Option<String>,
}

impl RequestContext {
    /// Creates a context with a caller-supplied request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            identity: None,
        }
    }

    /// Creates a context with a fresh random request id.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Attaches the caller identity.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the caller identity, if known.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = RequestContext::generate();
        let b = RequestContext::generate();
        assert_ne!(a.request_id(), b.request_id());
        assert_eq!(a.request_id().len(), 36);
    }

    #[test]
    fn identity() {
        let ctx = RequestContext::new("req-1").with_identity("delta-consumer");
        assert_eq!(ctx.request_id(), "req-1");
        assert_eq!(ctx.identity(), Some("delta-consumer"));
        assert_eq!(RequestContext::new("req-2").identity(), None);
    }
}
