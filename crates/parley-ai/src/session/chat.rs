//! Chat turns against the conversation endpoint.

use tracing::{debug, error, warn};

use crate::framing::parse_turn_event;
use crate::transport::{HttpReply, HttpRequest};
use crate::{ChatError, TurnOutcome};

use super::config::StatusPolicy;
use super::manager::ChatSession;
use super::types::ConversationRequest;

impl ChatSession {
    /// Send `prompt` as the next turn and return the assistant's reply.
    ///
    /// An HTTP 429 yields [`crate::RATE_LIMIT_NOTICE`] instead of an error.
    /// Use [`ChatSession::send_turn`] to tell the two apart.
    pub async fn send_message(&mut self, prompt: &str) -> Result<String, ChatError> {
        self.send_turn(prompt).await.map(TurnOutcome::into_text)
    }

    /// Send `prompt` as the next turn.
    ///
    /// Refreshes the access token first when none is held. On a reply the
    /// conversation id and parent message id advance to the server's
    /// values; on any other outcome they are left untouched.
    pub async fn send_turn(&mut self, prompt: &str) -> Result<TurnOutcome, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }

        if self.access_token.is_none() {
            self.refresh_authorization().await;
        }

        let mut reply = self.post_conversation_turn(prompt).await?;

        if reply.status == 401 && self.config.reauth_on_unauthorized {
            warn!("Access token rejected, re-authenticating");
            self.access_token = None;
            match self.try_refresh_authorization().await {
                Ok(()) => reply = self.post_conversation_turn(prompt).await?,
                Err(e) => error!(error = %e, "Re-authentication failed"),
            }
        }

        self.handle_reply(reply)
    }

    async fn post_conversation_turn(&self, prompt: &str) -> Result<HttpReply, ChatError> {
        let payload = ConversationRequest::next(
            self.ids.next_id(),
            prompt,
            self.conversation_id.as_deref(),
            &self.parent_message_id,
            &self.config.model,
        );

        let mut request = HttpRequest::post(self.conversation_url.as_str())
            .header("Accept", "application/json");
        if let Some(ref token) = self.access_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let request = request
            .header("Content-Type", "application/json")
            .header("User-Agent", self.config.user_agent.as_str())
            .json(&payload)?;

        debug!(
            model = %self.config.model,
            conversation_id = ?self.conversation_id,
            parent_message_id = %self.parent_message_id,
            "Conversation request"
        );

        self.transport.execute(request).await
    }

    fn handle_reply(&mut self, reply: HttpReply) -> Result<TurnOutcome, ChatError> {
        if reply.status == 429 {
            warn!("Conversation endpoint rate limited");
            return Ok(TurnOutcome::RateLimited);
        }

        if !reply.is_success() {
            error!(
                status = reply.status,
                body = %reply.body,
                "Unexpected response content"
            );
            if self.config.status_policy == StatusPolicy::ShortCircuit {
                return Err(ChatError::Upstream {
                    status: reply.status,
                    body: reply.body,
                });
            }
        }

        let event = parse_turn_event(&reply.body)?;
        let text = event.reply_text()?.to_string();

        self.parent_message_id = event.message.id;
        self.conversation_id = event.conversation_id;
        debug!(
            conversation_id = ?self.conversation_id,
            parent_message_id = %self.parent_message_id,
            "Turn complete"
        );

        Ok(TurnOutcome::Reply(text))
    }
}
