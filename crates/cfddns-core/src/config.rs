//! Configuration loading
//!
//! The updater reads a single JSON file at start-up:
//!
//! ```json
//! {
//!   "api_token": "cloudflare-token",
//!   "zone_name": "example.com",
//!   "record_name": "home.example.com"
//! }
//! ```
//!
//! Any read, parse or validation failure is returned as an error; the daemon
//! treats it as fatal.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Well-known location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/cloudflare-ddns.conf";

/// Well-known location of the last-known-IP file
pub const DEFAULT_STATE_PATH: &str = "/var/lib/cloudflare-ddns/current_ip";

/// Interval between poll cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Timeout applied to every outbound HTTP call
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Updater configuration
///
/// Immutable once loaded. The `Debug` implementation never prints the token.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct DdnsConfig {
    /// Cloudflare API token with Zone:DNS:Edit permissions
    pub api_token: String,

    /// Zone that owns the record (e.g. "example.com")
    pub zone_name: String,

    /// Fully qualified A record to keep up to date (e.g. "home.example.com")
    pub record_name: String,
}

impl std::fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_name", &self.zone_name)
            .field("record_name", &self.record_name)
            .finish()
    }
}

impl DdnsConfig {
    /// Create a configuration from its three fields
    pub fn new(
        api_token: impl Into<String>,
        zone_name: impl Into<String>,
        record_name: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            zone_name: zone_name.into(),
            record_name: record_name.into(),
        }
    }

    /// Load and validate the configuration from `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_json(&data).map_err(|e| match e {
            Error::Json(e) => Error::config(format!("Failed to parse {}: {}", path.display(), e)),
            other => other,
        })?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the configuration from [`DEFAULT_CONFIG_PATH`]
    pub fn load_default() -> Result<Self> {
        Self::load(PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Parse and validate a configuration document
    pub fn from_json(data: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::config("api_token cannot be empty"));
        }

        if self.zone_name.trim().is_empty() {
            return Err(Error::config("zone_name cannot be empty"));
        }

        if self.record_name.trim().is_empty() {
            return Err(Error::config("record_name cannot be empty"));
        }

        Ok(())
    }
}
