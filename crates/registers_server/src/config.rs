//! Server configuration.

use crate::error::{ServerError, ServerResult};
use registers_sync::NotifierConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable for the bind address.
pub const BIND_ADDR_VAR: &str = "REGISTERS_BIND_ADDR";
/// Environment variable for the change-notification API base URL.
pub const NOTIFIER_URL_VAR: &str = "CHS_KAFKA_API_URL";
/// Environment variable for the notification timeout, in milliseconds.
pub const NOTIFY_TIMEOUT_VAR: &str = "REGISTERS_NOTIFY_TIMEOUT_MS";
/// Environment variable for the document directory.
pub const DATA_DIR_VAR: &str = "REGISTERS_DATA_DIR";

/// Configuration for the adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Change notifier settings.
    pub notifier: NotifierConfig,
    /// Directory holding stored documents.
    pub data_dir: PathBuf,
    /// Whether identity headers are checked.
    pub enforce_identity: bool,
    /// API key privilege required for writes.
    pub write_privilege: String,
}

impl ServerConfig {
    /// Creates a configuration bound to `bind_addr`.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            notifier: NotifierConfig::default(),
            data_dir: PathBuf::from("data/registers"),
            enforce_identity: true,
            write_privilege: "internal-app".to_string(),
        }
    }

    /// Sets the notifier configuration.
    pub fn with_notifier(mut self, notifier: NotifierConfig) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the document directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Turns identity checks off, for local runs behind no gateway.
    pub fn without_identity_checks(mut self) -> Self {
        self.enforce_identity = false;
        self
    }

    /// Sets the privilege required for writes.
    pub fn with_write_privilege(mut self, privilege: impl Into<String>) -> Self {
        self.write_privilege = privilege.into();
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidConfig`] if a variable is set but
    /// malformed.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = raw.trim().parse().map_err(|e| {
                ServerError::InvalidConfig(format!("{}={:?}: {}", BIND_ADDR_VAR, raw, e))
            })?;
        }

        if let Some(raw) = lookup(NOTIFIER_URL_VAR) {
            let url = raw.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ServerError::InvalidConfig(format!(
                    "{}={:?}: expected an http(s) URL",
                    NOTIFIER_URL_VAR, raw
                )));
            }
            config.notifier.base_url = url.to_string();
        }

        if let Some(raw) = lookup(NOTIFY_TIMEOUT_VAR) {
            let millis: u64 = raw.trim().parse().map_err(|e| {
                ServerError::InvalidConfig(format!("{}={:?}: {}", NOTIFY_TIMEOUT_VAR, raw, e))
            })?;
            if millis == 0 {
                return Err(ServerError::InvalidConfig(format!(
                    "{} must be positive",
                    NOTIFY_TIMEOUT_VAR
                )));
            }
            config.notifier.timeout = Duration::from_millis(millis);
        }

        if let Some(raw) = lookup(DATA_DIR_VAR) {
            if raw.trim().is_empty() {
                return Err(ServerError::InvalidConfig(format!(
                    "{} is set but empty",
                    DATA_DIR_VAR
                )));
            }
            config.data_dir = PathBuf::from(raw.trim());
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], 8080)))
    }
}
