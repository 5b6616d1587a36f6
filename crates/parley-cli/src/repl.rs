//! Line-oriented interactive loop.

use parley_ai::{ChatSession, TurnOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Input<'a> {
    Prompt(&'a str),
    Reset,
    Quit,
    Blank,
}

pub(crate) fn classify(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Blank,
        "/reset" => Input::Reset,
        "/quit" | "/exit" => Input::Quit,
        prompt => Input::Prompt(prompt),
    }
}

/// Read prompts from stdin until EOF or `/quit`.
///
/// Chat failures are reported and the loop continues; only I/O errors on
/// stdin/stdout end it.
pub(crate) async fn run(session: &mut ChatSession) -> parley_common::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"Type a message. /reset starts a new conversation, /quit exits.\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match classify(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::Reset => {
                session.reset_conversation();
                "(new conversation)".to_string()
            }
            Input::Prompt(prompt) => match session.send_turn(prompt).await {
                Ok(TurnOutcome::Reply(text)) => text,
                Ok(outcome @ TurnOutcome::RateLimited) => outcome.into_text(),
                Err(e) => {
                    warn!(error = %e, "Turn failed");
                    format!("error: {e}")
                }
            },
        };

        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_commands() {
        assert_eq!(classify("/reset"), Input::Reset);
        assert_eq!(classify("  /quit "), Input::Quit);
        assert_eq!(classify("/exit"), Input::Quit);
        assert_eq!(classify("   "), Input::Blank);
    }

    #[test]
    fn everything_else_is_a_trimmed_prompt() {
        assert_eq!(classify("  hello  "), Input::Prompt("hello"));
        assert_eq!(classify("/resetx"), Input::Prompt("/resetx"));
    }
}
