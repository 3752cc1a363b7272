//! Exact-match response cache.
//!
//! Entries never expire and are never evicted; the cache grows with every
//! distinct request until [`ResponseCache::clear`] is called.

use crate::core_types::messages::ChatMessage;
use crate::core_types::provider::{GenerateOptions, LlmResponse};
use crate::logging::log_warn;

use dashmap::DashMap;

/// Build the cache key for a request.
///
/// The key is `provider:messages-json:options-json`. Serialization is
/// deterministic because options keep their extension keys in a `BTreeMap`.
/// Absent options serialize as `null`.
pub fn cache_key(
    provider: &str,
    messages: &[ChatMessage],
    options: Option<&GenerateOptions>,
) -> String {
    let messages_json = serde_json::to_string(messages).unwrap_or_else(|e| {
        log_warn!(error = %e, "Failed to serialize messages for cache key");
        String::new()
    });
    let options_json = serde_json::to_string(&options).unwrap_or_else(|e| {
        log_warn!(error = %e, "Failed to serialize options for cache key");
        String::new()
    });

    format!("{provider}:{messages_json}:{options_json}")
}

/// Concurrent map from request key to full response.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<String, LlmResponse>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<LlmResponse> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store `response`, replacing any previous entry for `key`.
    pub fn set(&self, key: String, response: LlmResponse) {
        self.entries.insert(key, response);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
