//! Wire types for the auth and conversation endpoints.

use serde::{Deserialize, Serialize};

use crate::transport::HttpReply;

/// Cookie carrying the long-lived session token.
pub const SESSION_COOKIE: &str = "__Secure-next-auth.session-token";

/// Body of `GET /api/auth/session`. Only the access token matters here.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthSession {
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
}

/// Body of `POST /backend-api/conversation`.
#[derive(Debug, Serialize)]
pub(crate) struct ConversationRequest<'a> {
    pub action: &'static str,
    pub messages: Vec<OutgoingMessage<'a>>,
    pub conversation_id: Option<&'a str>,
    pub parent_message_id: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct OutgoingMessage<'a> {
    pub id: String,
    pub role: &'static str,
    pub content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageContent<'a> {
    pub content_type: &'static str,
    pub parts: [&'a str; 1],
}

impl<'a> ConversationRequest<'a> {
    pub fn next(
        message_id: String,
        prompt: &'a str,
        conversation_id: Option<&'a str>,
        parent_message_id: &'a str,
        model: &'a str,
    ) -> Self {
        Self {
            action: "next",
            messages: vec![OutgoingMessage {
                id: message_id,
                role: "user",
                content: MessageContent {
                    content_type: "text",
                    parts: [prompt],
                },
            }],
            conversation_id,
            parent_message_id,
            model,
        }
    }
}

/// Renewed session token from the reply's `Set-Cookie` headers, if any.
pub(crate) fn rotated_session_token(reply: &HttpReply) -> Option<String> {
    reply
        .header_values("set-cookie")
        .find_map(|raw| {
            let pair = raw.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            (name.trim() == SESSION_COOKIE).then(|| value.trim().to_string())
        })
        .filter(|value| !value.is_empty())
}
