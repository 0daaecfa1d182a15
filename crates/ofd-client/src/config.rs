//! # Client Configuration
//!
//! Configuration management for the OFD client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     OFD_LOGIN=user@example.com                                         │
//! │     OFD_PASSWORD=...                                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/ofd-receipts/config.toml (Linux)                         │
//! │     ~/Library/Application Support/ru.ofd.receipts/config.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     https://org.1-ofd.ru, 30s timeout, UTC+03:00                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [account]
//! login = "user@example.com"
//! password = "secret"
//!
//! [service]
//! base_url = "https://org.1-ofd.ru"
//! link_base = "https://consumer.1-ofd.ru/v1"
//! timeout_secs = 30
//! utc_offset_minutes = 180
//! ```

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{OfdError, OfdResult};

/// Largest accepted `utc_offset_minutes` on either side of UTC.
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

// =============================================================================
// Credentials
// =============================================================================

/// Login and password for the OFD cabinet.
///
/// `Debug` never prints the password.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub login: String,

    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Service Settings
// =============================================================================

/// Where and how to reach the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Cabinet API host, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Prefix of consumer verification links.
    #[serde(default = "default_link_base")]
    pub link_base: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Offset used to decide which calendar day "today" is (minutes east of UTC).
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
}

fn default_base_url() -> String {
    "https://org.1-ofd.ru".to_string()
}

fn default_link_base() -> String {
    ofd_core::DEFAULT_LINK_BASE.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_utc_offset() -> i32 {
    180 // Moscow
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            base_url: default_base_url(),
            link_base: default_link_base(),
            timeout_secs: default_timeout(),
            utc_offset_minutes: default_utc_offset(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfdConfig {
    #[serde(default)]
    pub account: Credentials,

    #[serde(default)]
    pub service: ServiceSettings,
}

impl OfdConfig {
    /// Config with default service settings and the given credentials.
    pub fn with_credentials(credentials: Credentials) -> Self {
        OfdConfig {
            account: credentials,
            service: ServiceSettings::default(),
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> OfdResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading OFD config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load OFD config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OfdResult<()> {
        for (name, url) in [
            ("base_url", &self.service.base_url),
            ("link_base", &self.service.link_base),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(OfdError::InvalidConfig(format!(
                    "{} must start with http:// or https://, got: {}",
                    name, url
                )));
            }
        }

        if self.service.timeout_secs == 0 {
            return Err(OfdError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.service.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(OfdError::InvalidConfig(format!(
                "utc_offset_minutes must be within ±{}, got: {}",
                MAX_OFFSET_MINUTES, self.service.utc_offset_minutes
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(login) = std::env::var("OFD_LOGIN") {
            debug!(login = %login, "Overriding login from environment");
            self.account.login = login;
        }

        if let Ok(password) = std::env::var("OFD_PASSWORD") {
            self.account.password = password;
        }

        if let Ok(url) = std::env::var("OFD_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.service.base_url = url;
        }

        if let Ok(url) = std::env::var("OFD_LINK_BASE") {
            self.service.link_base = url;
        }

        if let Ok(timeout) = std::env::var("OFD_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.service.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric OFD_TIMEOUT_SECS"),
            }
        }

        if let Ok(offset) = std::env::var("OFD_UTC_OFFSET_MINUTES") {
            match offset.parse::<i32>() {
                Ok(o) => self.service.utc_offset_minutes = o,
                Err(_) => warn!(value = %offset, "Ignoring non-numeric OFD_UTC_OFFSET_MINUTES"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("ru", "ofd", "ofd-receipts")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Base URL with any trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.service.base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// The configured zone as a chrono offset (UTC when out of range).
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.service.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}
