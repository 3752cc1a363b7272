//! Plugin hooks.
//!
//! Plugins see every non-streaming request twice: `pre_process` before the
//! cache lookup and `post_process` after the provider (and middleware) answered.
//! Hooks run sequentially in registration order and each one's output feeds
//! the next. An error from a hook aborts the request.
//!
//! `init` is called once, when the plugin is registered, with the orchestrator
//! itself. It may register middleware or further plugins.

mod logger;

pub use logger::LoggerPlugin;

use crate::client::Polyglot;
use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::LlmResponse;
use crate::error::LlmResult;

use async_trait::async_trait;

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn init(&self, _polyglot: &Polyglot) {}

    async fn pre_process(&self, messages: Vec<ChatMessage>) -> LlmResult<Vec<ChatMessage>> {
        Ok(messages)
    }

    async fn post_process(&self, response: LlmResponse) -> LlmResult<LlmResponse> {
        Ok(response)
    }
}
