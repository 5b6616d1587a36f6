//! Session client for the chat web backend.
//!
//! Provides:
//! - `ChatSession`: cookie → access-token exchange plus threaded chat turns
//! - A `Transport` seam with a `reqwest` implementation
//! - Parsing of the backend's line-framed event stream
//! - `SessionRegistry` for serializing turns per conversation owner

pub mod framing;
pub mod session;
pub mod transport;

pub use framing::TurnEvent;
pub use session::{ChatSession, SessionConfig, SessionRegistry, SharedSession, StatusPolicy};
pub use transport::{HttpReply, HttpRequest, Method, ReqwestTransport, Transport};

/// Text returned by `ChatSession::send_message` when the backend answers 429.
pub const RATE_LIMIT_NOTICE: &str = "请求过多，请放慢速度";

/// Result of one chat turn that reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant's reply text.
    Reply(String),
    /// The backend answered HTTP 429; session state is unchanged.
    RateLimited,
}

impl TurnOutcome {
    /// Collapse to the user-facing text, substituting `RATE_LIMIT_NOTICE`.
    pub fn into_text(self) -> String {
        match self {
            TurnOutcome::Reply(text) => text,
            TurnOutcome::RateLimited => RATE_LIMIT_NOTICE.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("auth refresh failed: HTTP {status}: {body}")]
    AuthRefresh { status: u16, body: String },
    #[error("upstream error: HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout")]
    Timeout,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("prompt is empty")]
    EmptyPrompt,
}
