//! Middleware chain around the provider call.
//!
//! Middleware run in registration order, outermost first. Each one receives the
//! message list and a [`Next`] handle; calling [`Next::run`] passes control to
//! the rest of the chain and, at the end, to the provider. A middleware that
//! returns without calling `next` short-circuits everything downstream,
//! including rate limiting and the network call.
//!
//! ```rust
//! use async_trait::async_trait;
//! use polyglot_llm::{ChatMessage, LlmResponse, LlmResult, Middleware, Next};
//!
//! struct AddSystemPrompt;
//!
//! #[async_trait]
//! impl Middleware for AddSystemPrompt {
//!     async fn handle(&self, messages: Vec<ChatMessage>, next: Next<'_>) -> LlmResult<LlmResponse> {
//!         let mut framed = vec![ChatMessage::system("Answer briefly.")];
//!         framed.extend(messages);
//!         next.run(framed).await
//!     }
//! }
//! ```

use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::LlmResponse;
use crate::error::LlmResult;
use crate::logging::log_trace;

use async_trait::async_trait;
use std::sync::Arc;

/// A step in the request pipeline.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, messages: Vec<ChatMessage>, next: Next<'_>) -> LlmResult<LlmResponse>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "middleware"
    }
}

/// The innermost step of the chain: the actual provider dispatch.
#[async_trait]
pub(crate) trait Dispatch: Send + Sync {
    async fn dispatch(&self, messages: Vec<ChatMessage>) -> LlmResult<LlmResponse>;
}

/// Handle to the remainder of the middleware chain.
pub struct Next<'a> {
    chain: &'a [Arc<dyn Middleware>],
    terminal: &'a dyn Dispatch,
}

impl<'a> Next<'a> {
    pub(crate) fn new(chain: &'a [Arc<dyn Middleware>], terminal: &'a dyn Dispatch) -> Self {
        Self { chain, terminal }
    }

    /// Number of middleware still ahead of the provider call.
    pub fn remaining(&self) -> usize {
        self.chain.len()
    }

    /// Continue with the next middleware, or dispatch to the provider when the
    /// chain is exhausted.
    pub async fn run(self, messages: Vec<ChatMessage>) -> LlmResult<LlmResponse> {
        match self.chain.split_first() {
            Some((middleware, rest)) => {
                log_trace!(
                    middleware = middleware.name(),
                    remaining = rest.len(),
                    "Entering middleware"
                );
                middleware
                    .handle(messages, Next::new(rest, self.terminal))
                    .await
            }
            None => self.terminal.dispatch(messages).await,
        }
    }
}
