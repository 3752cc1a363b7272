//! Chat message types shared by every provider.
//!
//! A [`ChatMessage`] is a role plus text content. It is built through its
//! constructors and treated as immutable afterwards; middleware and plugins
//! that want to change a conversation produce a new message list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a participant in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// End-user input.
    User,
    /// Model output.
    Assistant,
    /// Instructions that frame the conversation.
    System,
}

impl MessageRole {
    /// Wire name of the role (`"user"`, `"assistant"`, `"system"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message.
///
/// Serializes as `{"role":"user","content":"..."}`.
///
/// ```rust
/// use polyglot_llm::{ChatMessage, MessageRole};
///
/// let message = ChatMessage::user("Hello!");
/// assert_eq!(message.role(), MessageRole::User);
/// assert_eq!(message.content(), "Hello!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    role: MessageRole,
    content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
