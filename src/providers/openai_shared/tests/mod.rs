//! Tests for the shared chat-completions client
//!
//! These helpers are shared by the OpenAI, Mistral and Anthropic adapters.
