//! Configuration for the change notifier.

use std::time::Duration;

/// Default path of the resource-changed endpoint.
const DEFAULT_PATH: &str = "/private/resource-changed";

/// Where and how change events are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Base URL of the downstream API (e.g. "http://chs-kafka-api:4081").
    pub base_url: String,
    /// Path of the resource-changed endpoint.
    pub path: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl NotifierConfig {
    /// Creates a configuration for `base_url` with default path and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: DEFAULT_PATH.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the endpoint path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the full endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self::new("http://localhost:4081")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_path() {
        let config = NotifierConfig::new("http://api:4081/");
        assert_eq!(config.endpoint(), "http://api:4081/private/resource-changed");

        let config = NotifierConfig::new("http://api").with_path("/events");
        assert_eq!(config.endpoint(), "http://api/events");
    }

    #[test]
    fn builder() {
        let config = NotifierConfig::default().with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.path, DEFAULT_PATH);
    }
}
