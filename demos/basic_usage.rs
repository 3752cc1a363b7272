//! Basic example: register the vendors you have keys for and ask each one.
//!
//! This example shows how to:
//! - Build adapter configuration from environment variables
//! - Register adapters under names with an optional rate limiter
//! - Send the same conversation to every registered model
//! - Read token usage and reuse cached responses
//!
//! # Running
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."        # any subset of the four vendors
//! export GEMINI_API_KEY="..."
//! RUST_LOG=polyglot_llm=info cargo run --example basic_usage
//! ```

use polyglot_llm::{
    create_provider, ChatMessage, GenerateOptions, ModelConfig, Polyglot, ProviderKind,
    TokenBucketRateLimiter,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let polyglot = Polyglot::new();

    for kind in ProviderKind::ALL {
        let config = match ModelConfig::from_env(kind) {
            Ok(config) => config,
            Err(e) => {
                println!("Skipping {kind}: {e}");
                continue;
            }
        };
        let provider = create_provider(kind, config)?;
        // 10k tokens of burst, refilled at 1k tokens per second
        let limiter = Arc::new(TokenBucketRateLimiter::new(10_000, 1_000.0));
        polyglot.add_model(kind.as_str(), provider, Some(limiter));
    }

    if polyglot.model_names().is_empty() {
        anyhow::bail!("Set at least one of OPENAI_API_KEY, ANTHROPIC_API_KEY, GEMINI_API_KEY or MISTRAL_API_KEY");
    }

    let messages = vec![
        ChatMessage::system("You are a helpful assistant. Be concise."),
        ChatMessage::user("What is the capital of France? Answer in one sentence."),
    ];
    let options = GenerateOptions::new().with_temperature(0.2).with_max_tokens(100);

    println!(
        "Estimated prompt size: {} tokens",
        polyglot.estimate_message_tokens(&messages)
    );

    for name in polyglot.model_names() {
        match polyglot
            .generate_response(&name, messages.clone(), Some(&options), true)
            .await
        {
            Ok(response) => {
                println!("\n[{name}] {}", response.content);
                if let Some(usage) = response.usage {
                    println!(
                        "[{name}] {} input + {} output = {} total tokens",
                        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
                    );
                }
            }
            Err(e) => println!("\n[{name}] {} ({})", e.user_message(), e.code()),
        }
    }

    // Same request again: served from the cache, no usage is added
    let before = polyglot.total_token_usage();
    if let Some(name) = polyglot.model_names().first() {
        polyglot
            .generate_response(name, messages.clone(), Some(&options), true)
            .await?;
    }
    println!(
        "\nTotal usage: {} tokens ({} after cached repeat), {} cached responses",
        before,
        polyglot.total_token_usage(),
        polyglot.cache_len()
    );

    Ok(())
}
