//! parley: terminal front-end for the chat web backend.
//!
//! Loads the TOML config (plus `PARLEY_*` env and flag overrides), opens a
//! `ChatSession`, and either sends a single `--prompt` or reads prompts
//! from stdin one line at a time.

mod logging;
mod repl;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use parley_ai::ChatSession;
use parley_common::ParleyError;
use parley_config::ConfigOverrides;

use crate::logging::Logging;

#[derive(Parser)]
#[command(name = "parley", about = "Chat with the conversation web backend from a terminal")]
struct Args {
    /// Config file (defaults to the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session cookie value (overrides config and PARLEY_SESSION_TOKEN).
    #[arg(long)]
    token: Option<String>,

    /// API origin, e.g. https://chat.openai.com/
    #[arg(long)]
    api_url: Option<String>,

    /// Outbound proxy URL.
    #[arg(long)]
    proxy: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u32>,

    /// Send one prompt, print the reply and exit.
    #[arg(short, long)]
    prompt: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            token: self.token.clone(),
            api_url: self.api_url.clone(),
            proxy: self.proxy.clone(),
            timeout: self.timeout,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let logging = Logging::init();

    match run(args, &logging).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "parley failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, logging: &Logging) -> parley_common::Result<()> {
    let config = parley_config::load_config(args.config.as_deref(), args.overrides())?;
    logging.apply_level(&config.logging.level);

    let session_config = settings::session_config(&config);
    tracing::debug!(config = ?session_config, "Session configured");

    let mut session =
        ChatSession::connect(session_config).map_err(|e| ParleyError::Chat(e.to_string()))?;

    match args.prompt {
        Some(prompt) => {
            let reply = session
                .send_message(&prompt)
                .await
                .map_err(|e| ParleyError::Chat(e.to_string()))?;
            println!("{reply}");
            Ok(())
        }
        None => repl::run(&mut session).await,
    }
}
