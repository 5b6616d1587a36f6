//! Environment and command-line overrides layered on top of the file config.

use crate::schema::ParleyConfig;
use parley_common::ConfigError;

pub const ENV_SESSION_TOKEN: &str = "PARLEY_SESSION_TOKEN";
pub const ENV_API_URL: &str = "PARLEY_API_URL";
pub const ENV_PROXY: &str = "PARLEY_PROXY";
pub const ENV_TIMEOUT: &str = "PARLEY_TIMEOUT";

/// Optional values that replace the corresponding config fields when set.
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub proxy: Option<String>,
    pub timeout: Option<u32>,
}

impl std::fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ConfigOverrides {
    /// Read overrides from the `PARLEY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = match get(ENV_TIMEOUT) {
            Some(raw) => Some(raw.trim().parse::<u32>().map_err(|e| {
                ConfigError::ParseError(format!("{ENV_TIMEOUT}={raw:?} is not a number: {e}"))
            })?),
            None => None,
        };

        Ok(Self {
            token: get(ENV_SESSION_TOKEN),
            api_url: get(ENV_API_URL),
            proxy: get(ENV_PROXY),
            timeout,
        })
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: ConfigOverrides) -> Self {
        Self {
            token: other.token.or(self.token),
            api_url: other.api_url.or(self.api_url),
            proxy: other.proxy.or(self.proxy),
            timeout: other.timeout.or(self.timeout),
        }
    }

    pub fn apply(&self, config: &mut ParleyConfig) {
        if let Some(ref token) = self.token {
            config.session.token = token.clone();
        }
        if let Some(ref url) = self.api_url {
            config.session.api_url = url.clone();
        }
        if let Some(ref proxy) = self.proxy {
            config.session.proxy = Some(proxy.clone());
        }
        if let Some(timeout) = self.timeout {
            config.session.timeout = timeout;
        }
    }
}
