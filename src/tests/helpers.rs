//! Test doubles shared by the orchestrator, middleware and plugin tests.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

#![allow(dead_code)]

use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::{
    GenerateOptions, LlmProvider, LlmResponse, ModelSwitch, StreamingProvider, TextStream,
    TokenUsage,
};
use crate::error::{LlmError, LlmResult};
use crate::middleware::{Middleware, Next};
use crate::plugins::Plugin;

use async_trait::async_trait;
use futures_util::stream;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Provider double that answers from a script, then falls back to a fixed reply.
///
/// Records every call so tests can assert on what reached the adapter.
pub struct ScriptedProvider {
    reply: LlmResponse,
    script: Mutex<VecDeque<LlmResult<LlmResponse>>>,
    calls: AtomicUsize,
    received: Mutex<Vec<Vec<ChatMessage>>>,
    received_options: Mutex<Vec<Option<GenerateOptions>>>,
}

impl ScriptedProvider {
    pub fn replying(content: &str) -> Self {
        Self::with_reply(LlmResponse::new(content))
    }

    pub fn with_reply(reply: LlmResponse) -> Self {
        Self {
            reply,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
            received_options: Mutex::new(Vec::new()),
        }
    }

    /// Queue results returned (in order) before the fixed reply.
    pub fn then(self, result: LlmResult<LlmResponse>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<Vec<ChatMessage>> {
        self.received.lock().unwrap().clone()
    }

    pub fn received_options(&self) -> Vec<Option<GenerateOptions>> {
        self.received_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn generate_response(
        &self,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> LlmResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(messages.to_vec());
        self.received_options.lock().unwrap().push(options.cloned());

        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(result) => result,
            None => Ok(self.reply.clone()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Provider double with streaming and model switching.
pub struct CapableProvider {
    pub chunks: Vec<String>,
    pub model: Mutex<String>,
    pub stream_calls: AtomicUsize,
}

impl CapableProvider {
    pub fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            model: Mutex::new("alpha".to_string()),
            stream_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmProvider for CapableProvider {
    async fn generate_response(
        &self,
        _messages: &[ChatMessage],
        _options: Option<&GenerateOptions>,
    ) -> LlmResult<LlmResponse> {
        Ok(LlmResponse::new(self.chunks.concat()))
    }

    fn provider_name(&self) -> &'static str {
        "capable"
    }

    fn streaming(&self) -> Option<&dyn StreamingProvider> {
        Some(self)
    }

    fn model_switch(&self) -> Option<&dyn ModelSwitch> {
        Some(self)
    }
}

impl StreamingProvider for CapableProvider {
    fn generate_streaming_response(
        &self,
        _messages: &[ChatMessage],
        _options: Option<&GenerateOptions>,
    ) -> TextStream {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        let items: Vec<LlmResult<String>> = self.chunks.iter().cloned().map(Ok).collect();
        Box::pin(stream::iter(items))
    }
}

impl ModelSwitch for CapableProvider {
    fn set_model(&self, model: &str) -> LlmResult<()> {
        if !["alpha", "beta"].contains(&model) {
            return Err(LlmError::invalid_model("Capable", model));
        }
        *self.model.lock().unwrap() = model.to_string();
        Ok(())
    }

    fn current_model(&self) -> String {
        self.model.lock().unwrap().clone()
    }
}

pub fn usage(prompt: u64, completion: u64) -> TokenUsage {
    TokenUsage::new(prompt, completion)
}

pub fn server_fault() -> LlmError {
    LlmError::network_fault("scripted", Some(503), "Service unavailable", None)
}

pub fn bad_request() -> LlmError {
    LlmError::provider_api_error("openai", "gpt-4o", Some(400), "HTTP 400: bad request")
}

/// Shared, ordered record of pipeline events.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Middleware that records entry/exit around the rest of the chain.
pub struct RecordingMiddleware {
    pub label: &'static str,
    pub log: EventLog,
}

#[async_trait]
impl Middleware for RecordingMiddleware {
    async fn handle(&self, messages: Vec<ChatMessage>, next: Next<'_>) -> LlmResult<LlmResponse> {
        self.log.push(format!("{}:before", self.label));
        let response = next.run(messages).await;
        self.log.push(format!("{}:after", self.label));
        response
    }

    fn name(&self) -> &str {
        self.label
    }
}

/// Middleware that answers without calling the rest of the chain.
pub struct ShortCircuitMiddleware {
    pub content: &'static str,
}

#[async_trait]
impl Middleware for ShortCircuitMiddleware {
    async fn handle(&self, _messages: Vec<ChatMessage>, _next: Next<'_>) -> LlmResult<LlmResponse> {
        Ok(LlmResponse::new(self.content))
    }
}

/// Middleware that appends a message before continuing.
pub struct AppendMessageMiddleware {
    pub message: ChatMessage,
}

#[async_trait]
impl Middleware for AppendMessageMiddleware {
    async fn handle(&self, messages: Vec<ChatMessage>, next: Next<'_>) -> LlmResult<LlmResponse> {
        let mut messages = messages;
        messages.push(self.message.clone());
        next.run(messages).await
    }
}

/// Plugin that records its hooks and tags messages and responses.
pub struct RecordingPlugin {
    pub label: &'static str,
    pub log: EventLog,
}

#[async_trait]
impl Plugin for RecordingPlugin {
    fn name(&self) -> &str {
        self.label
    }

    fn init(&self, _polyglot: &crate::client::Polyglot) {
        self.log.push(format!("{}:init", self.label));
    }

    async fn pre_process(&self, messages: Vec<ChatMessage>) -> LlmResult<Vec<ChatMessage>> {
        self.log.push(format!("{}:pre", self.label));
        Ok(messages
            .into_iter()
            .map(|m| ChatMessage::new(m.role(), format!("{}[{}]", m.content(), self.label)))
            .collect())
    }

    async fn post_process(&self, response: LlmResponse) -> LlmResult<LlmResponse> {
        self.log.push(format!("{}:post", self.label));
        Ok(LlmResponse {
            content: format!("{}<{}>", response.content, self.label),
            usage: response.usage,
        })
    }
}

/// Plugin whose pre-process hook always fails.
pub struct FailingPlugin;

#[async_trait]
impl Plugin for FailingPlugin {
    fn name(&self) -> &str {
        "failing"
    }

    async fn pre_process(&self, _messages: Vec<ChatMessage>) -> LlmResult<Vec<ChatMessage>> {
        Err(LlmError::unknown("pre-process rejected the request"))
    }
}
