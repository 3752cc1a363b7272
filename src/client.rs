//! The request orchestrator.
//!
//! [`Polyglot`] owns a registry of provider adapters keyed by name, plus the
//! cross-cutting machinery shared by all of them: plugins, middleware, one rate
//! limiter per provider, a response cache, usage accounting and retry.
//!
//! A non-streaming request flows through:
//!
//! ```text
//! plugins (pre) -> cache lookup -> [ middleware -> rate limiter -> adapter
//!   -> middleware unwind -> plugins (post) ] x retry -> usage -> cache store
//! ```
//!
//! All methods take `&self`; registries use interior mutability so a
//! `Polyglot` can be shared behind an `Arc` and plugins can register more
//! components from `init`.

use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::{GenerateOptions, LlmProvider, LlmResponse, TextStream};
use crate::error::{LlmError, LlmResult};
use crate::internals::cache::{cache_key, ResponseCache};
use crate::internals::rate_limit::RateLimiter;
use crate::internals::retry::{RetryExecutor, RetryPolicy};
use crate::internals::tokens::estimate_messages_tokens;
use crate::internals::usage::TokenUsageTracker;
use crate::logging::{log_debug, log_info};
use crate::middleware::{Dispatch, Middleware, Next};
use crate::plugins::Plugin;

use async_trait::async_trait;
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// Unified client over any number of registered LLM providers.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use polyglot_llm::{
///     ChatMessage, ModelConfig, OpenAIProvider, Polyglot, TokenBucketRateLimiter,
/// };
///
/// # async fn example() -> polyglot_llm::LlmResult<()> {
/// let polyglot = Polyglot::new();
/// polyglot.add_model(
///     "chatgpt",
///     Arc::new(OpenAIProvider::new(ModelConfig::new("sk-..."))?),
///     Some(Arc::new(TokenBucketRateLimiter::new(10_000, 100.0))),
/// );
///
/// let response = polyglot
///     .generate_response("chatgpt", vec![ChatMessage::user("Hello!")], None, true)
///     .await?;
/// println!("{}", response.content);
/// # Ok(())
/// # }
/// ```
pub struct Polyglot {
    models: DashMap<String, Arc<dyn LlmProvider>>,
    rate_limiters: DashMap<String, Arc<dyn RateLimiter>>,
    middlewares: RwLock<Vec<Arc<dyn Middleware>>>,
    plugins: RwLock<Vec<Arc<dyn Plugin>>>,
    cache: ResponseCache,
    usage: TokenUsageTracker,
    retry: RetryExecutor,
}

impl Default for Polyglot {
    fn default() -> Self {
        Self::new()
    }
}

impl Polyglot {
    /// Create an orchestrator with the default retry policy (3 attempts, 1s apart).
    pub fn new() -> Self {
        Self::with_retry_policy(RetryPolicy::default())
    }

    pub fn with_retry_policy(policy: RetryPolicy) -> Self {
        log_debug!(
            max_attempts = policy.max_attempts,
            backoff_ms = policy.backoff.as_millis(),
            "Creating Polyglot orchestrator"
        );
        Self {
            models: DashMap::new(),
            rate_limiters: DashMap::new(),
            middlewares: RwLock::new(Vec::new()),
            plugins: RwLock::new(Vec::new()),
            cache: ResponseCache::new(),
            usage: TokenUsageTracker::new(),
            retry: RetryExecutor::new(policy),
        }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry.policy
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register `provider` under `name`, replacing any previous registration.
    ///
    /// A supplied rate limiter replaces the one registered for `name`; passing
    /// `None` keeps an existing limiter.
    pub fn add_model(
        &self,
        name: impl Into<String>,
        provider: Arc<dyn LlmProvider>,
        rate_limiter: Option<Arc<dyn RateLimiter>>,
    ) {
        let name = name.into();
        log_info!(
            model = %name,
            provider = provider.provider_name(),
            has_rate_limiter = rate_limiter.is_some(),
            "Registering model"
        );

        if let Some(limiter) = rate_limiter {
            self.rate_limiters.insert(name.clone(), limiter);
        }
        self.models.insert(name, provider);
    }

    /// Append a middleware. Registration order is execution order.
    pub fn use_middleware(&self, middleware: Arc<dyn Middleware>) {
        log_debug!(middleware = middleware.name(), "Registering middleware");
        self.middlewares
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(middleware);
    }

    /// Append a plugin and run its `init` hook.
    pub fn add_plugin(&self, plugin: Arc<dyn Plugin>) {
        log_debug!(plugin = plugin.name(), "Registering plugin");
        self.plugins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&plugin));
        plugin.init(self);
    }

    pub fn has_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered provider names, sorted.
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins_snapshot()
            .iter()
            .map(|plugin| plugin.name().to_string())
            .collect()
    }

    pub fn middleware_count(&self) -> usize {
        self.middlewares
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Generate a complete response from the provider registered as `provider`.
    ///
    /// # Errors
    ///
    /// - [`LlmError::ModelNotFound`] if nothing is registered under `provider`
    /// - [`LlmError::MaxRetriesExceeded`] if every attempt failed with a
    ///   retryable error
    /// - any non-retryable error from a plugin, middleware or the adapter
    pub async fn generate_response(
        &self,
        provider: &str,
        messages: Vec<ChatMessage>,
        options: Option<&GenerateOptions>,
        use_cache: bool,
    ) -> LlmResult<LlmResponse> {
        let request_id = Uuid::new_v4();
        log_info!(
            request_id = %request_id,
            model = %provider,
            estimated_tokens = estimate_messages_tokens(&messages),
            use_cache = use_cache,
            "Generating response"
        );

        let plugins = self.plugins_snapshot();
        let mut messages = messages;
        for plugin in &plugins {
            messages = plugin.pre_process(messages).await?;
        }

        let key = cache_key(provider, &messages, options);
        if use_cache {
            if let Some(cached) = self.cache.get(&key) {
                log_info!(request_id = %request_id, model = %provider, "Cache hit");
                return Ok(cached);
            }
        }

        let middlewares = self.middlewares_snapshot();
        let dispatch = ProviderDispatch {
            polyglot: self,
            name: provider,
            options,
            request_id,
        };

        let chain = middlewares.as_slice();
        let terminal = &dispatch;
        let plugins = plugins.as_slice();
        let messages = &messages;
        let response = self
            .retry
            .execute(move || Self::attempt(chain, terminal, plugins, messages.clone()))
            .await?;

        if let Some(usage) = &response.usage {
            self.usage.record(usage);
            log_info!(
                request_id = %request_id,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_usage = self.usage.total(),
                "Token usage updated"
            );
        }

        if use_cache {
            self.cache.set(key, response.clone());
            log_debug!(request_id = %request_id, model = %provider, "Response cached");
        }

        Ok(response)
    }

    async fn attempt(
        chain: &[Arc<dyn Middleware>],
        terminal: &ProviderDispatch<'_>,
        plugins: &[Arc<dyn Plugin>],
        messages: Vec<ChatMessage>,
    ) -> LlmResult<LlmResponse> {
        let mut response = Next::new(chain, terminal).run(messages).await?;
        for plugin in plugins {
            response = plugin.post_process(response).await?;
        }
        Ok(response)
    }

    /// Start a streaming response from the provider registered as `provider`.
    ///
    /// Streaming bypasses plugins, middleware, rate limiting, caching and retry.
    /// No request is sent until the returned stream is polled.
    ///
    /// # Errors
    ///
    /// [`LlmError::StreamingNotSupported`] if nothing is registered under
    /// `provider` or its adapter cannot stream.
    pub fn generate_streaming_response(
        &self,
        provider: &str,
        messages: &[ChatMessage],
        options: Option<&GenerateOptions>,
    ) -> LlmResult<TextStream> {
        let adapter = self
            .lookup(provider)
            .ok_or_else(|| LlmError::streaming_not_supported(provider))?;
        let streaming = adapter
            .streaming()
            .ok_or_else(|| LlmError::streaming_not_supported(provider))?;

        log_info!(model = %provider, message_count = messages.len(), "Starting streaming response");
        Ok(streaming.generate_streaming_response(messages, options))
    }

    /// Switch the model used by the provider registered as `provider`.
    ///
    /// # Errors
    ///
    /// - [`LlmError::ModelNotFound`] if nothing is registered under `provider`
    /// - [`LlmError::ModelNotChangeable`] if the adapter cannot switch models
    /// - [`LlmError::InvalidModel`] if the adapter rejects `model`
    pub fn change_model(&self, provider: &str, model: &str) -> LlmResult<()> {
        let adapter = self
            .lookup(provider)
            .ok_or_else(|| LlmError::model_not_found(provider))?;
        let switch = adapter
            .model_switch()
            .ok_or_else(|| LlmError::model_not_changeable(provider))?;
        switch.set_model(model)
    }

    // =========================================================================
    // Accounting
    // =========================================================================

    /// Approximate token count of `messages`, as used for rate limiting.
    pub fn estimate_message_tokens(&self, messages: &[ChatMessage]) -> u64 {
        estimate_messages_tokens(messages)
    }

    /// Prompt plus completion tokens reported by providers since creation or
    /// the last reset.
    pub fn total_token_usage(&self) -> u64 {
        self.usage.total()
    }

    pub fn reset_token_usage(&self) {
        self.usage.reset();
    }

    /// Number of cached responses. The cache never evicts on its own.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lookup(&self, name: &str) -> Option<Arc<dyn LlmProvider>> {
        self.models.get(name).map(|entry| Arc::clone(entry.value()))
    }

    fn plugins_snapshot(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn middlewares_snapshot(&self) -> Vec<Arc<dyn Middleware>> {
        self.middlewares
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for Polyglot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polyglot")
            .field("models", &self.model_names())
            .field("rate_limiters", &self.rate_limiters.len())
            .field("middlewares", &self.middleware_count())
            .field("plugins", &self.plugin_names())
            .field("cache_entries", &self.cache.len())
            .field("total_token_usage", &self.usage.total())
            .field("retry_policy", &self.retry.policy)
            .finish()
    }
}

/// Innermost step of the middleware chain: rate limit, then call the adapter.
struct ProviderDispatch<'a> {
    polyglot: &'a Polyglot,
    name: &'a str,
    options: Option<&'a GenerateOptions>,
    request_id: Uuid,
}

#[async_trait]
impl Dispatch for ProviderDispatch<'_> {
    async fn dispatch(&self, messages: Vec<ChatMessage>) -> LlmResult<LlmResponse> {
        let adapter = self
            .polyglot
            .lookup(self.name)
            .ok_or_else(|| LlmError::model_not_found(self.name))?;

        let limiter = self
            .polyglot
            .rate_limiters
            .get(self.name)
            .map(|entry| Arc::clone(entry.value()));
        if let Some(limiter) = limiter {
            let tokens = estimate_messages_tokens(&messages);
            log_debug!(
                request_id = %self.request_id,
                model = %self.name,
                tokens = tokens,
                "Consuming rate limit tokens"
            );
            limiter.consume(tokens).await;
        }

        log_debug!(
            request_id = %self.request_id,
            model = %self.name,
            provider = adapter.provider_name(),
            message_count = messages.len(),
            "Dispatching to provider"
        );
        adapter.generate_response(&messages, self.options).await
    }
}
