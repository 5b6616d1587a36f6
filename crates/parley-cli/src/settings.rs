//! Mapping from the file config to session and logging settings.

use std::time::Duration;

use parley_ai::{SessionConfig, StatusPolicy};
use parley_config::ParleyConfig;

pub(crate) fn session_config(config: &ParleyConfig) -> SessionConfig {
    let policy = if config.chat.parse_error_bodies {
        StatusPolicy::ParseAnyway
    } else {
        StatusPolicy::ShortCircuit
    };

    let mut session = SessionConfig::new(config.session.token.clone())
        .with_base_url(config.session.api_url.clone())
        .with_timeout(Duration::from_secs(u64::from(config.session.timeout)))
        .with_model(config.chat.model.clone())
        .with_status_policy(policy)
        .with_reauth_on_unauthorized(config.chat.reauth_on_unauthorized);

    if let Some(ref proxy) = config.session.proxy {
        session = session.with_proxy(proxy.clone());
    }
    session
}

/// Filter used when `RUST_LOG` is unset.
pub(crate) fn default_log_filter(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    format!("parley={level},parley_ai={level},parley_config={level}")
}
