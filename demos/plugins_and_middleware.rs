//! Plugins and middleware example.
//!
//! This example shows how to:
//! - Register the built-in logger plugin
//! - Write a plugin that rewrites requests and responses
//! - Write a middleware that frames every conversation with a system prompt
//! - Short-circuit the provider call from a middleware
//! - Tune the retry policy
//!
//! # Running
//!
//! ```bash
//! export MISTRAL_API_KEY="..."
//! RUST_LOG=polyglot_llm=debug cargo run --example plugins_and_middleware
//! ```

use async_trait::async_trait;
use polyglot_llm::{
    create_provider, ChatMessage, LlmResponse, LlmResult, LoggerPlugin, Middleware, ModelConfig,
    Next, Plugin, Polyglot, ProviderKind, RetryPolicy,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Frames each conversation with a fixed system prompt.
struct SystemPrompt(&'static str);

#[async_trait]
impl Middleware for SystemPrompt {
    async fn handle(&self, messages: Vec<ChatMessage>, next: Next<'_>) -> LlmResult<LlmResponse> {
        let mut framed = vec![ChatMessage::system(self.0)];
        framed.extend(messages);
        next.run(framed).await
    }

    fn name(&self) -> &str {
        "system-prompt"
    }
}

/// Answers greetings locally without calling the provider.
struct CannedGreeting;

#[async_trait]
impl Middleware for CannedGreeting {
    async fn handle(&self, messages: Vec<ChatMessage>, next: Next<'_>) -> LlmResult<LlmResponse> {
        let is_greeting = messages
            .last()
            .is_some_and(|m| m.content().trim().eq_ignore_ascii_case("hello"));
        if is_greeting {
            return Ok(LlmResponse::new("Hello! (answered locally)"));
        }
        next.run(messages).await
    }

    fn name(&self) -> &str {
        "canned-greeting"
    }
}

/// Strips surrounding whitespace from requests and responses.
struct Trim;

#[async_trait]
impl Plugin for Trim {
    fn name(&self) -> &str {
        "trim"
    }

    async fn pre_process(&self, messages: Vec<ChatMessage>) -> LlmResult<Vec<ChatMessage>> {
        Ok(messages
            .into_iter()
            .map(|m| ChatMessage::new(m.role(), m.content().trim()))
            .collect())
    }

    async fn post_process(&self, mut response: LlmResponse) -> LlmResult<LlmResponse> {
        response.content = response.content.trim().to_string();
        Ok(response)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let polyglot = Polyglot::with_retry_policy(RetryPolicy::new(5, Duration::from_millis(500)));
    polyglot.add_plugin(Arc::new(LoggerPlugin::new()));
    polyglot.add_plugin(Arc::new(Trim));
    polyglot.use_middleware(Arc::new(CannedGreeting));
    polyglot.use_middleware(Arc::new(SystemPrompt("Reply in at most two sentences.")));

    let kind = ProviderKind::Mistral;
    polyglot.add_model("mistral", create_provider(kind, ModelConfig::from_env(kind)?)?, None);

    println!("Plugins: {:?}", polyglot.plugin_names());
    println!("Middleware: {}", polyglot.middleware_count());

    for prompt in ["  hello  ", "Why is the sky blue?"] {
        let response = polyglot
            .generate_response("mistral", vec![ChatMessage::user(prompt)], None, false)
            .await?;
        println!("\n> {}\n{}", prompt.trim(), response.content);
    }

    Ok(())
}
