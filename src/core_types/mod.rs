//! Core types for the unified multi-provider abstraction
//!
//! ## Organization
//! - `messages` - Chat messages and roles
//! - `provider` - Provider traits, capabilities, options and responses

pub mod messages;
pub mod provider;

pub use messages::{ChatMessage, MessageRole};
pub use provider::{
    GenerateOptions, LlmProvider, LlmResponse, ModelSwitch, StreamingProvider, TextStream,
    TokenUsage,
};
