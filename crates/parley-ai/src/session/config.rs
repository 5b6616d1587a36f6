//! Chat session configuration.

use std::fmt;
use std::time::Duration;

use crate::ChatError;

pub use parley_common::{DEFAULT_API_URL, DEFAULT_MODEL};
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.1 Safari/605.1.15";

/// What to do with a non-429 error status from the conversation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Log it and fail the turn with `ChatError::Upstream`.
    #[default]
    ShortCircuit,
    /// Log it and parse the body as if it were a normal event stream.
    ParseAnyway,
}

/// Chat session configuration.
#[derive(Clone)]
pub struct SessionConfig {
    pub session_token: String,
    pub base_url: String,
    pub proxy: Option<String>,
    pub timeout: Duration,
    pub model: String,
    pub user_agent: String,
    pub status_policy: StatusPolicy,
    pub reauth_on_unauthorized: bool,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("session_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .field("status_policy", &self.status_policy)
            .field("reauth_on_unauthorized", &self.reauth_on_unauthorized)
            .finish()
    }
}

impl SessionConfig {
    pub fn new(session_token: impl Into<String>) -> Self {
        Self {
            session_token: session_token.into(),
            base_url: DEFAULT_API_URL.to_string(),
            proxy: None,
            timeout: Duration::from_secs(10),
            model: DEFAULT_MODEL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            status_policy: StatusPolicy::default(),
            reauth_on_unauthorized: true,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn with_reauth_on_unauthorized(mut self, enabled: bool) -> Self {
        self.reauth_on_unauthorized = enabled;
        self
    }

    /// Resolve `path` against the base URL (RFC 3986 joining, so the base
    /// should end with `/`).
    pub(crate) fn endpoint(&self, path: &str) -> Result<String, ChatError> {
        let base = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ChatError::InvalidConfig(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        base.join(path)
            .map(String::from)
            .map_err(|e| ChatError::InvalidConfig(format!("cannot join {path:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::new("abc");
        assert_eq!(config.base_url, "https://chat.openai.com/");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.model, "text-davinci-002-render");
        assert!(config.user_agent.contains("Safari/605.1.15"));
        assert_eq!(config.status_policy, StatusPolicy::ShortCircuit);
        assert!(config.reauth_on_unauthorized);
    }

    #[test]
    fn debug_redacts_token() {
        let dbg = format!("{:?}", SessionConfig::new("very-secret"));
        assert!(!dbg.contains("very-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn endpoints_join_like_urljoin() {
        let config = SessionConfig::new("t");
        assert_eq!(
            config.endpoint("api/auth/session").unwrap(),
            "https://chat.openai.com/api/auth/session"
        );

        let config = SessionConfig::new("t").with_base_url("http://127.0.0.1:9000/proxy/");
        assert_eq!(
            config.endpoint("backend-api/conversation").unwrap(),
            "http://127.0.0.1:9000/proxy/backend-api/conversation"
        );

        // Without a trailing slash the last segment is replaced.
        let config = SessionConfig::new("t").with_base_url("http://host/proxy");
        assert_eq!(
            config.endpoint("backend-api/conversation").unwrap(),
            "http://host/backend-api/conversation"
        );
    }

    #[test]
    fn bad_base_url_is_config_error() {
        let config = SessionConfig::new("t").with_base_url("not a url");
        assert!(matches!(
            config.endpoint("api/auth/session"),
            Err(ChatError::InvalidConfig(_))
        ));
    }

    #[test]
    fn builders_chain() {
        let config = SessionConfig::new("t")
            .with_proxy("http://127.0.0.1:7890")
            .with_timeout(Duration::from_secs(30))
            .with_model("gpt-4")
            .with_status_policy(StatusPolicy::ParseAnyway)
            .with_reauth_on_unauthorized(false);
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:7890"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.status_policy, StatusPolicy::ParseAnyway);
        assert!(!config.reauth_on_unauthorized);
    }
}
