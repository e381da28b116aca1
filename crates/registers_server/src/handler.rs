//! Route parsing and per-route handlers.

use crate::error::ServerError;
use crate::http::{ApiRequest, ApiResponse, Method};
use registers_model::{CompanyNumber, RegistersDelta};
use registers_store::RegistersStore;
use registers_sync::{ChangeNotifier, Clock, Outcome, RegistersService, RequestContext};
use std::sync::Arc;
use tracing::warn;

/// A recognised path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/healthcheck`
    Healthcheck,
    /// `/company/{company_number}/registers`, with the raw path segment.
    Registers(String),
}

impl Route {
    /// Matches `path` against the known routes.
    ///
    /// A trailing slash is ignored.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        if trimmed == "/healthcheck" {
            return Some(Route::Healthcheck);
        }
        let mut segments = trimmed.strip_prefix('/')?.split('/');
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some("company"), Some(number), Some("registers"), None) if !number.is_empty() => {
                Some(Route::Registers(number.to_string()))
            }
            _ => None,
        }
    }

    /// Returns true if the identity filter does not apply.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Healthcheck)
    }

    /// Returns true if `method` is served on this route.
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Route::Healthcheck => *method == Method::Get,
            Route::Registers(_) => {
                matches!(method, Method::Get | Method::Put | Method::Delete)
            }
        }
    }
}

/// Turns routed requests into service calls.
pub struct RequestHandler<S, N, K> {
    service: Arc<RegistersService<S, N, K>>,
}

impl<S, N, K> RequestHandler<S, N, K>
where
    S: RegistersStore,
    N: ChangeNotifier,
    K: Clock,
{
    /// Creates a handler over `service`.
    pub fn new(service: Arc<RegistersService<S, N, K>>) -> Self {
        Self { service }
    }

    /// Returns the service.
    pub fn service(&self) -> &RegistersService<S, N, K> {
        &self.service
    }

    /// Dispatches a request already matched to `route`.
    pub fn dispatch(&self, ctx: &RequestContext, route: &Route, request: &ApiRequest) -> ApiResponse {
        match (route, &request.method) {
            (Route::Healthcheck, Method::Get) => self.handle_healthcheck(),
            (Route::Registers(raw), Method::Get) => self.handle_get(ctx, raw),
            (Route::Registers(raw), Method::Put) => self.handle_put(ctx, raw, &request.body),
            (Route::Registers(raw), Method::Delete) => self.handle_delete(ctx, raw),
            _ => error_response(&ServerError::MethodNotAllowed {
                method: request.method.to_string(),
                path: request.path.clone(),
            }),
        }
    }

    /// Handles `GET /healthcheck`.
    pub fn handle_healthcheck(&self) -> ApiResponse {
        ApiResponse::json(200, &serde_json::json!({ "status": "UP" }))
    }

    /// Handles `GET /company/{n}/registers`.
    pub fn handle_get(&self, ctx: &RequestContext, raw: &str) -> ApiResponse {
        let company_number = match parse_company(raw) {
            Ok(company_number) => company_number,
            Err(e) => return error_response(&e),
        };
        match self.service.get(ctx, &company_number) {
            Ok(Some(document)) => ApiResponse::json(200, document.data())
                .with_header("etag", document.etag()),
            Ok(None) => ApiResponse::error(
                404,
                &format!("no registers for company {}", company_number),
            ),
            Err(failure) => ApiResponse::error(503, &failure.to_string()),
        }
    }

    /// Handles `PUT /company/{n}/registers`.
    pub fn handle_put(&self, ctx: &RequestContext, raw: &str, body: &[u8]) -> ApiResponse {
        let company_number = match parse_company(raw) {
            Ok(company_number) => company_number,
            Err(e) => return error_response(&e),
        };
        let delta = match RegistersDelta::from_json(company_number, body) {
            Ok(delta) => delta,
            Err(e) => {
                warn!(request_id = ctx.request_id(), error = %e, "malformed delta body");
                return error_response(&ServerError::InvalidRequest(e.to_string()));
            }
        };
        outcome_response(self.service.upsert(ctx, &delta))
    }

    /// Handles `DELETE /company/{n}/registers`.
    pub fn handle_delete(&self, ctx: &RequestContext, raw: &str) -> ApiResponse {
        let company_number = match parse_company(raw) {
            Ok(company_number) => company_number,
            Err(e) => return error_response(&e),
        };
        outcome_response(self.service.delete(ctx, &company_number))
    }
}

fn parse_company(raw: &str) -> Result<CompanyNumber, ServerError> {
    CompanyNumber::parse(raw).map_err(|e| ServerError::InvalidRequest(e.to_string()))
}

pub(crate) fn error_response(error: &ServerError) -> ApiResponse {
    ApiResponse::error(error.status_code(), &error.to_string())
}

fn outcome_response(outcome: Outcome) -> ApiResponse {
    match outcome {
        Outcome::Applied => ApiResponse::empty(200),
        other => ApiResponse::error(other.status_code(), &other.to_string()),
    }
}
