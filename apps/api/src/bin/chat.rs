//! Terminal chat with a local model. Type `quit` to exit.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use assist_api::chat::ollama::OllamaClient;
use assist_api::chat::session::{ChatSession, TurnOutcome};

#[derive(Debug, Parser)]
#[command(name = "assist-chat", version, about = "Chat with a local model runtime")]
struct Args {
    /// Model to chat with.
    #[arg(long, default_value = "gpt-oss:20b")]
    model: String,

    /// Base URL of the local model runtime.
    #[arg(long, env = "OLLAMA_URL", default_value = "http://localhost:11434")]
    ollama_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let backend = OllamaClient::new(&args.ollama_url)?;
    let mut session = ChatSession::new(args.model.as_str());
    println!("Chatting with {}. Type 'quit' to exit.", args.model);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;
        let Some(input) = lines.next_line().await? else {
            break;
        };
        if input.eq_ignore_ascii_case("quit") {
            break;
        }

        match session.turn(&backend, &input).await {
            TurnOutcome::Reply(reply) => println!("AI: {reply}"),
            failed => println!("{}", failed.display()),
        }
    }

    Ok(())
}
