//! Parser for the conversation endpoint's line-framed event stream.
//!
//! The body is a run of `data: {...}` lines. The final payload we need is
//! always the 4th line from the end; the last three lines are stream
//! terminators (blank separators and `data: [DONE]`).

use serde::Deserialize;

use crate::ChatError;

/// Length of the per-line marker (`"data: "`).
pub const MARKER_LEN: usize = 6;

/// Number of terminator lines following the payload line.
pub const TRAILING_LINES: usize = 3;

/// The decoded payload of the last complete event.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnEvent {
    pub message: EventMessage,
    /// Null on the wire is accepted and clears the conversation id.
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub content: EventContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventContent {
    #[serde(default)]
    pub parts: Vec<String>,
}

impl TurnEvent {
    /// `message.content.parts[0]`.
    pub fn reply_text(&self) -> Result<&str, ChatError> {
        self.message
            .content
            .parts
            .first()
            .map(String::as_str)
            .ok_or_else(|| ChatError::MalformedResponse("message.content.parts is empty".into()))
    }
}

/// Return the payload line with its marker stripped.
pub fn payload_line(body: &str) -> Result<&str, ChatError> {
    let lines: Vec<&str> = body.lines().collect();
    let index = lines.len().checked_sub(TRAILING_LINES + 1).ok_or_else(|| {
        ChatError::MalformedResponse(format!(
            "expected at least {} lines, got {}",
            TRAILING_LINES + 1,
            lines.len()
        ))
    })?;
    Ok(strip_marker(lines[index]))
}

/// Drop the first `MARKER_LEN` characters, whatever they are.
fn strip_marker(line: &str) -> &str {
    match line.char_indices().nth(MARKER_LEN) {
        Some((offset, _)) => &line[offset..],
        None => "",
    }
}

/// Decode the turn event carried by `body`.
pub fn parse_turn_event(body: &str) -> Result<TurnEvent, ChatError> {
    let data = payload_line(body)?;
    serde_json::from_str(data)
        .map_err(|e| ChatError::MalformedResponse(format!("invalid event payload: {e}")))
}
