//! Chat session management.
//!
//! A `ChatSession` holds the backend credentials (session cookie and
//! derived access token) and threads turns through the conversation graph
//! via the conversation id and parent message id.

mod auth;
mod chat;
mod config;
mod manager;
mod registry;
mod types;


pub use config::{
    SessionConfig, StatusPolicy, DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_USER_AGENT,
};
pub use manager::ChatSession;
pub use registry::{SessionRegistry, SharedSession};
pub use types::SESSION_COOKIE;
