//! # polyglot-llm
//!
//! Unified client for multiple LLM providers (OpenAI, Anthropic, Gemini and
//! Mistral) behind a single request interface.
//!
//! ## Key Features
//!
//! - **Multiple Providers**: Register any number of adapters under names of your choosing
//! - **Streaming**: Incremental text for every built-in provider
//! - **Caching**: Exact-match response cache (opt out per request)
//! - **Rate Limiting**: Token-bucket or GCRA limiter per provider
//! - **Resilience**: Fixed-backoff retry on rate limits and server faults
//! - **Extensibility**: Middleware chain and plugin hooks
//! - **Accounting**: Cumulative token usage and an approximate token estimator
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use polyglot_llm::{ChatMessage, GeminiProvider, ModelConfig, Polyglot, ProviderKind};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let polyglot = Polyglot::new();
//! let config = ModelConfig::from_env(ProviderKind::Gemini)?;
//! polyglot.add_model("gemini", Arc::new(GeminiProvider::new(config)?), None);
//!
//! let messages = vec![
//!     ChatMessage::system("You are a concise assistant."),
//!     ChatMessage::user("What is the capital of France?"),
//! ];
//! let response = polyglot.generate_response("gemini", messages, None, true).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

pub mod core_types;

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod client;
pub mod config;
pub mod error;
pub(crate) mod internals;
pub mod middleware;
pub mod plugins;
pub mod providers;

// Public paths for internals
pub use internals::cache;
pub use internals::rate_limit;
pub use internals::retry;
pub use internals::tokens;
pub use internals::usage;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use client::Polyglot;
pub use config::{ModelConfig, ProviderKind};
pub use error::{LlmError, LlmResult};
pub use middleware::{Middleware, Next};
pub use plugins::{LoggerPlugin, Plugin};
pub use providers::{
    create_provider, AnthropicProvider, GeminiProvider, MistralProvider, OpenAIProvider,
};
pub use rate_limit::{GcraRateLimiter, RateLimiter, TokenBucketRateLimiter};
pub use retry::RetryPolicy;
pub use tokens::{estimate_messages_tokens, estimate_token_count};

pub use core_types::{
    ChatMessage, GenerateOptions, LlmProvider, LlmResponse, MessageRole, ModelSwitch,
    StreamingProvider, TextStream, TokenUsage,
};
