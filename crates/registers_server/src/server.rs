//! The adapter façade.

use crate::auth::IdentityFilter;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{error_response, RequestHandler, Route};
use crate::http::{ApiRequest, ApiResponse};
use registers_store::{FileStore, RegistersStore};
use registers_sync::{
    ChangeNotifier, Clock, HttpClient, HttpNotifier, RegistersService, RequestContext,
    SystemClock,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Header carrying the request id in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Serves registers requests.
///
/// # Example
///
/// ```
/// use registers_server::{ApiRequest, Method, RegistersServer, ServerConfig};
/// use registers_store::InMemoryStore;
/// use registers_sync::{RecordingNotifier, RegistersService};
/// use std::sync::Arc;
///
/// let service = RegistersService::new(InMemoryStore::new(), RecordingNotifier::new());
/// let server = RegistersServer::new(ServerConfig::default(), Arc::new(service));
///
/// let response = server.handle(ApiRequest::new(Method::Get, "/healthcheck"));
/// assert_eq!(response.status, 200);
/// ```
pub struct RegistersServer<S, N, K = SystemClock> {
    config: ServerConfig,
    filter: IdentityFilter,
    handler: RequestHandler<S, N, K>,
}

impl<C: HttpClient> RegistersServer<FileStore, HttpNotifier<C>, SystemClock> {
    /// Builds the production wiring: a file store under `config.data_dir`
    /// and an HTTP notifier posting through `client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn from_config(config: ServerConfig, client: C) -> ServerResult<Self> {
        let store = FileStore::open(&config.data_dir).map_err(ServerError::from)?;
        let notifier = HttpNotifier::new(config.notifier.clone(), client);
        info!(
            bind_addr = %config.bind_addr,
            data_dir = %config.data_dir.display(),
            notifier = notifier.endpoint(),
            "registers server configured"
        );
        let service = RegistersService::new(store, notifier);
        Ok(Self::new(config, Arc::new(service)))
    }
}

impl<S, N, K> RegistersServer<S, N, K>
where
    S: RegistersStore,
    N: ChangeNotifier,
    K: Clock,
{
    /// Creates a server over `service`.
    pub fn new(config: ServerConfig, service: Arc<RegistersService<S, N, K>>) -> Self {
        let filter = IdentityFilter::new(config.write_privilege.clone());
        Self {
            config,
            filter,
            handler: RequestHandler::new(service),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the service.
    pub fn service(&self) -> &RegistersService<S, N, K> {
        self.handler.service()
    }

    /// Handles one request.
    ///
    /// The response always echoes the request id, taken from the
    /// `x-request-id` header or freshly generated.
    pub fn handle(&self, request: ApiRequest) -> ApiResponse {
        let started = Instant::now();
        let mut ctx = match request.header(REQUEST_ID_HEADER).map(str::trim) {
            Some(id) if !id.is_empty() => RequestContext::new(id),
            _ => RequestContext::generate(),
        };
        info!(
            request_id = ctx.request_id(),
            method = %request.method,
            path = %request.path,
            "request started"
        );

        let response = match self.route(&mut ctx, &request) {
            Ok(route) => self.handler.dispatch(&ctx, &route, &request),
            Err(e) => {
                warn!(request_id = ctx.request_id(), error = %e, "request refused");
                error_response(&e)
            }
        };

        info!(
            request_id = ctx.request_id(),
            method = %request.method,
            path = %request.path,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
        response.with_header(REQUEST_ID_HEADER, ctx.request_id())
    }

    fn route(&self, ctx: &mut RequestContext, request: &ApiRequest) -> ServerResult<Route> {
        let route =
            Route::parse(&request.path).ok_or_else(|| ServerError::NoRoute(request.path.clone()))?;

        if !route.allows(&request.method) {
            return Err(ServerError::MethodNotAllowed {
                method: request.method.to_string(),
                path: request.path.clone(),
            });
        }

        if self.config.enforce_identity && !route.is_public() {
            let identity = self.filter.check(request)?;
            *ctx = ctx.clone().with_identity(identity.id);
        }
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use registers_store::InMemoryStore;
    use registers_sync::RecordingNotifier;

    fn server() -> RegistersServer<InMemoryStore, RecordingNotifier> {
        let service = RegistersService::new(InMemoryStore::new(), RecordingNotifier::new());
        RegistersServer::new(ServerConfig::default(), Arc::new(service))
    }

    #[test]
    fn healthcheck_skips_identity() {
        let response = server().handle(ApiRequest::new(Method::Get, "/healthcheck"));
        assert_eq!(response.status, 200);
    }

    #[test]
    fn request_id_is_echoed() {
        let response = server().handle(
            ApiRequest::new(Method::Get, "/healthcheck").with_header("X-Request-Id", "abc-123"),
        );
        assert_eq!(response.header(REQUEST_ID_HEADER), Some("abc-123"));
    }

    #[test]
    fn request_id_is_generated() {
        let response = server().handle(ApiRequest::new(Method::Get, "/healthcheck"));
        assert_eq!(response.header(REQUEST_ID_HEADER).map(str::len), Some(36));
    }

    #[test]
    fn unknown_path_and_method() {
        let server = server();
        assert_eq!(server.handle(ApiRequest::new(Method::Get, "/nope")).status, 404);
        assert_eq!(
            server
                .handle(ApiRequest::new(Method::Post, "/company/00006400/registers"))
                .status,
            405
        );
    }

    #[test]
    fn registers_route_requires_identity() {
        let response =
            server().handle(ApiRequest::new(Method::Get, "/company/00006400/registers"));
        assert_eq!(response.status, 401);
    }
}
