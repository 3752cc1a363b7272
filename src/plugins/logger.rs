use super::Plugin;
use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::LlmResponse;
use crate::error::LlmResult;
use crate::logging::log_info;

use async_trait::async_trait;

/// Logs outgoing messages and incoming responses at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerPlugin;

impl LoggerPlugin {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Plugin for LoggerPlugin {
    fn name(&self) -> &str {
        "logger"
    }

    async fn pre_process(&self, messages: Vec<ChatMessage>) -> LlmResult<Vec<ChatMessage>> {
        log_info!(
            plugin = "logger",
            message_count = messages.len(),
            messages = ?messages,
            "Sending messages"
        );
        Ok(messages)
    }

    async fn post_process(&self, response: LlmResponse) -> LlmResult<LlmResponse> {
        log_info!(
            plugin = "logger",
            content_length = response.content.len(),
            usage = ?response.usage,
            "Received response"
        );
        Ok(response)
    }
}
