//! ChatSession struct, construction and conversation state.

use std::fmt;
use std::sync::Arc;

use parley_common::{IdGenerator, UuidGenerator};
use tracing::debug;

use crate::transport::{ReqwestTransport, Transport};
use crate::ChatError;

use super::config::SessionConfig;

/// One logical conversation with the web backend.
///
/// Turn operations take `&mut self`; share a session between tasks through
/// [`super::SessionRegistry`] (or your own mutex) so that two turns never
/// read the same parent id.
pub struct ChatSession {
    pub(super) config: SessionConfig,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) ids: Arc<dyn IdGenerator>,
    /// Current session cookie value; the server may rotate it.
    pub(super) session_token: String,
    /// Bearer token derived from the session cookie.
    pub(super) access_token: Option<String>,
    pub(super) conversation_id: Option<String>,
    pub(super) parent_message_id: String,
    pub(super) auth_url: String,
    pub(super) conversation_url: String,
}

impl ChatSession {
    /// Create a session that sends requests through `transport`.
    pub fn new(config: SessionConfig, transport: Arc<dyn Transport>) -> Result<Self, ChatError> {
        let auth_url = config.endpoint("api/auth/session")?;
        let conversation_url = config.endpoint("backend-api/conversation")?;
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);

        Ok(Self {
            session_token: config.session_token.clone(),
            access_token: None,
            conversation_id: None,
            parent_message_id: ids.next_id(),
            config,
            transport,
            ids,
            auth_url,
            conversation_url,
        })
    }

    /// Create a session backed by a `reqwest` client honoring the
    /// configured proxy and timeout.
    pub fn connect(config: SessionConfig) -> Result<Self, ChatError> {
        let transport = ReqwestTransport::new(config.proxy.as_deref(), config.timeout)?;
        Self::new(config, Arc::new(transport))
    }

    /// Replace the identifier source. The default parent id is regenerated
    /// from the new source, so call this before the first turn.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.parent_message_id = ids.next_id();
        self.ids = ids;
        self
    }

    /// Start a new conversation thread (or resume a known one).
    ///
    /// A missing parent id is replaced by a fresh identifier.
    pub fn start_conversation(
        &mut self,
        conversation_id: Option<String>,
        parent_message_id: Option<String>,
    ) {
        self.conversation_id = conversation_id;
        self.parent_message_id = parent_message_id.unwrap_or_else(|| self.ids.next_id());
        debug!(
            conversation_id = ?self.conversation_id,
            parent_message_id = %self.parent_message_id,
            "Conversation started"
        );
    }

    /// Forget the current thread; the next turn opens a new conversation.
    pub fn reset_conversation(&mut self) {
        self.start_conversation(None, None);
    }

    /// Drop the access token so the next turn exchanges the cookie again.
    pub fn invalidate_access_token(&mut self) {
        self.access_token = None;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn parent_message_id(&self) -> &str {
        &self.parent_message_id
    }
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("config", &self.config)
            .field("session_token", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("conversation_id", &self.conversation_id)
            .field("parent_message_id", &self.parent_message_id)
            .finish()
    }
}
