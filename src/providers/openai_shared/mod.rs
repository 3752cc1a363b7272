//! Shared chat-completions structures and client
//!
//! OpenAI, Mistral and Anthropic (through its OpenAI-compatible endpoint) all
//! speak the same `/chat/completions` dialect:
//! - `types` - Request/response wire structures
//! - `utils` - The shared HTTP client and stream delta extraction

pub mod types;
pub(crate) mod utils;

#[cfg(test)]
mod tests;

pub use types::*;
pub(crate) use utils::*;
