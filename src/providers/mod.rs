//! LLM Provider implementations
//!
//! - **openai**: OpenAI GPT models
//! - **anthropic**: Anthropic Claude models (chat-completions compatible endpoint)
//! - **mistral**: Mistral models
//! - **gemini**: Google Gemini models with the native `generateContent` API
//! - **openai_shared**: Shared chat-completions structures and client
//!
//! ## Architecture
//!
//! ```text
//! http.rs  sse.rs  catalog.rs     <- transport, stream decoding, model allow-lists
//!      |      |        |
//! openai_shared/                 <- chat-completions client
//!      |          |          |
//! openai.rs  anthropic.rs  mistral.rs
//!
//! gemini.rs                      <- native Gemini format, uses http/sse/catalog directly
//! ```

pub mod anthropic;
pub mod catalog;
pub mod gemini;
pub(crate) mod http;
pub mod mistral;
pub mod openai;
pub mod openai_shared;
pub(crate) mod sse;

#[cfg(test)]
mod tests;

use crate::config::{ModelConfig, ProviderKind};
use crate::core_types::provider::LlmProvider;
use crate::error::LlmResult;
use std::sync::Arc;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use mistral::MistralProvider;
pub use openai::OpenAIProvider;

/// Build an adapter for `kind` from `config`.
///
/// # Errors
///
/// Propagates the adapter's construction errors (`ConfigurationError`,
/// `InvalidModel`).
pub fn create_provider(kind: ProviderKind, config: ModelConfig) -> LlmResult<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match kind {
        ProviderKind::OpenAI => Arc::new(OpenAIProvider::new(config)?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(config)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(config)?),
        ProviderKind::Mistral => Arc::new(MistralProvider::new(config)?),
    };
    Ok(provider)
}
