//! Session-cookie → access-token exchange.

use tracing::{debug, error};

use crate::transport::HttpRequest;
use crate::ChatError;

use super::manager::ChatSession;
use super::types::{rotated_session_token, AuthSession, SESSION_COOKIE};

impl ChatSession {
    /// Exchange the session cookie for an access token, logging failures.
    ///
    /// Never fails: on error the access token keeps its previous value and
    /// the next chat call proceeds with whatever it has.
    pub async fn refresh_authorization(&mut self) {
        if let Err(e) = self.try_refresh_authorization().await {
            error!(error = %e, "Refresh session failed");
        }
    }

    /// Exchange the session cookie for an access token.
    ///
    /// A rotated cookie from `Set-Cookie` is adopted even when the body
    /// turns out not to contain an access token.
    pub async fn try_refresh_authorization(&mut self) -> Result<(), ChatError> {
        let request = HttpRequest::get(self.auth_url.as_str())
            .header("Cookie", format!("{SESSION_COOKIE}={}", self.session_token))
            .header("User-Agent", self.config.user_agent.as_str());

        let reply = self.transport.execute(request).await?;

        if let Some(rotated) = rotated_session_token(&reply) {
            if rotated != self.session_token {
                debug!("Session token rotated by server");
                self.session_token = rotated;
            }
        }

        let access_token = serde_json::from_str::<AuthSession>(&reply.body)
            .ok()
            .and_then(|session| session.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ChatError::AuthRefresh {
                status: reply.status,
                body: reply.body.clone(),
            })?;

        debug!(status = reply.status, "Access token refreshed");
        self.access_token = Some(access_token);
        Ok(())
    }
}
