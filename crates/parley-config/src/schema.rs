//! Configuration schema types for parley.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

pub use parley_common::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub session: SessionSection,
    pub chat: ChatSection,
    pub logging: LoggingConfig,
}

/// Credentials and transport settings for the web backend.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Value of the `__Secure-next-auth.session-token` browser cookie.
    pub token: String,
    pub api_url: String,
    pub proxy: Option<String>,
    /// Request timeout in seconds, applied to both the auth and chat calls.
    pub timeout: u32,
}

impl std::fmt::Debug for SessionSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSection")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: DEFAULT_API_URL.into(),
            proxy: None,
            timeout: 10,
        }
    }
}

/// Chat-turn behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSection {
    pub model: String,
    /// Keep parsing the body of non-429 error responses instead of
    /// failing the turn.
    pub parse_error_bodies: bool,
    /// Refresh the access token and retry once when the backend answers 401.
    pub reauth_on_unauthorized: bool,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            parse_error_bodies: false,
            reauth_on_unauthorized: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}
