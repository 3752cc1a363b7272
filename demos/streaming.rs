//! Streaming example: print a response as it arrives, then switch models.
//!
//! # Running
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! cargo run --example streaming -- openai
//! cargo run --example streaming -- claude   # aliases are accepted
//! ```

use futures_util::StreamExt;
use polyglot_llm::{create_provider, ChatMessage, ModelConfig, Polyglot, ProviderKind};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let kind: ProviderKind = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openai".to_string())
        .parse()?;

    let polyglot = Polyglot::new();
    polyglot.add_model("assistant", create_provider(kind, ModelConfig::from_env(kind)?)?, None);

    let messages = vec![ChatMessage::user(
        "Write a four-line poem about the Rust borrow checker.",
    )];

    println!("Streaming from {kind}...\n");
    let mut stream = polyglot.generate_streaming_response("assistant", &messages, None)?;
    while let Some(chunk) = stream.next().await {
        print!("{}", chunk?);
        std::io::stdout().flush()?;
    }
    println!();

    let cheaper = match kind {
        ProviderKind::OpenAI => "gpt-4o-mini",
        ProviderKind::Anthropic => "claude-3-haiku-20240307",
        ProviderKind::Gemini => "gemini-1.5-flash",
        ProviderKind::Mistral => "mistral-small-latest",
    };
    polyglot.change_model("assistant", cheaper)?;
    println!("\nSwitched to {cheaper}; streaming again...\n");

    let mut stream = polyglot.generate_streaming_response("assistant", &messages, None)?;
    while let Some(chunk) = stream.next().await {
        print!("{}", chunk?);
        std::io::stdout().flush()?;
    }
    println!();

    Ok(())
}
