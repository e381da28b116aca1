//! HTTP delivery of change events.
//!
//! The HTTP client itself sits behind [`HttpClient`] so that any client
//! library (or an in-process loopback in tests) can carry the request.

use crate::config::NotifierConfig;
use crate::context::RequestContext;
use crate::error::{NotifyError, NotifyResult};
use crate::notifier::{ChangeEvent, ChangeNotifier};
use std::time::Duration;
use tracing::{debug, warn};

/// Minimal HTTP client abstraction.
pub trait HttpClient: Send + Sync {
    /// Sends a JSON POST and returns the response status.
    ///
    /// The request must be abandoned after `timeout`. An `Err` means no
    /// response was received in time.
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
        timeout: Duration,
    ) -> Result<u16, String>;
}

/// Posts each event to the resource-changed endpoint.
pub struct HttpNotifier<C: HttpClient> {
    config: NotifierConfig,
    endpoint: String,
    client: C,
}

impl<C: HttpClient> HttpNotifier<C> {
    /// Creates a notifier for `config` using `client`.
    pub fn new(config: NotifierConfig, client: C) -> Self {
        let endpoint = config.endpoint();
        Self {
            config,
            endpoint,
            client,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<C: HttpClient> ChangeNotifier for HttpNotifier<C> {
    fn notify(&self, ctx: &RequestContext, event: &ChangeEvent) -> NotifyResult<()> {
        let body = serde_json::to_vec(&event.to_resource(ctx))?;
        let headers = [
            ("content-type", "application/json"),
            ("x-request-id", ctx.request_id()),
        ];

        let status = self
            .client
            .post_json(&self.endpoint, &headers, body, self.config.timeout)
            .map_err(|e| {
                warn!(
                    endpoint = %self.endpoint,
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    error = %e,
                    "resource-changed call failed"
                );
                NotifyError::transport_retryable(e)
            })?;

        if !(200..300).contains(&status) {
            warn!(endpoint = %self.endpoint, status, "resource-changed call rejected");
            return Err(NotifyError::Rejected { status });
        }
        debug!(endpoint = %self.endpoint, status, "resource-changed call accepted");
        Ok(())
    }
}
