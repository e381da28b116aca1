//! # Registers Server
//!
//! HTTP adapter for the registers sync service.
//!
//! This crate provides:
//! - Routing of `/company/{n}/registers` and `/healthcheck`
//! - The ERIC identity filter (identity, identity type, key privileges)
//! - Mapping of service outcomes to HTTP statuses
//! - Request logging keyed by request id
//! - Environment-driven configuration
//!
//! The adapter does not bind a socket. A host HTTP stack converts its
//! requests into [`ApiRequest`] values and writes back the returned
//! [`ApiResponse`].
//!
//! # Status mapping
//!
//! | Request | 200 | 4xx | 503 |
//! |---------|-----|-----|-----|
//! | `PUT` | applied | 409 stale, 400 malformed | store or notifier failure |
//! | `DELETE` | applied | 404 absent | store or notifier failure |
//! | `GET` | found | 404 absent | store failure |

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod auth;
mod config;
mod error;
mod handler;
mod http;
mod server;

pub use auth::{
    Identity, IdentityFilter, IdentityType, IDENTITY_HEADER, IDENTITY_TYPE_HEADER,
    KEY_PRIVILEGES_HEADER,
};
pub use config::{
    ServerConfig, BIND_ADDR_VAR, DATA_DIR_VAR, NOTIFIER_URL_VAR, NOTIFY_TIMEOUT_VAR,
};
pub use error::{ServerError, ServerResult};
pub use handler::{RequestHandler, Route};
pub use http::{ApiRequest, ApiResponse, Method};
pub use server::{RegistersServer, REQUEST_ID_HEADER};
