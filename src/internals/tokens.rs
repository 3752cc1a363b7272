//! Approximate token estimation.
//!
//! Counts are a heuristic, not a vendor tokenizer. They are used to size
//! rate-limit consumption before a request is sent, so stability matters more
//! than accuracy: the same text always yields the same estimate.
//!
//! # Rules
//!
//! Text is lowercased and split into ASCII words (letters, digits, underscores
//! and apostrophes) and single non-whitespace characters. Each piece counts as
//! one token, with surcharges for long words and numbers:
//!
//! - words longer than 10 characters add `len / 5`
//! - all-digit pieces add `max(1, len / 2)`
//! - every 100 characters of input add one more
//!
//! Lengths are measured in UTF-16 code units. A character outside the Basic
//! Multilingual Plane (most emoji) therefore counts as two tokens, and
//! accented letters split a word: `"café"` is `"caf"` plus `"é"`.
//!
//! ```rust
//! use polyglot_llm::tokens::estimate_token_count;
//!
//! assert_eq!(estimate_token_count("hello world"), 2);
//! assert_eq!(estimate_token_count("café"), 2);
//! assert_eq!(estimate_token_count(""), 0);
//! ```

use crate::core_types::messages::ChatMessage;

use once_cell::sync::Lazy;
use regex::Regex;

/// Fixed per-message overhead for role framing.
pub const MESSAGE_OVERHEAD_TOKENS: u64 = 4;

const LONG_WORD_THRESHOLD: usize = 10;

// Word classes and boundaries are ASCII-only; `\S` still matches any character.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)[A-Za-z0-9_']+(?-u:\b)|\S").expect("Invalid token regex")
});

/// Estimate the number of tokens in `text`.
pub fn estimate_token_count(text: &str) -> u64 {
    let lowered = text.to_lowercase();

    let pieces: u64 = TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|piece| piece_weight(piece.as_str()))
        .sum();

    pieces + (utf16_len(text) / 100) as u64
}

/// Estimate the tokens a message list consumes, including per-message overhead.
pub fn estimate_messages_tokens(messages: &[ChatMessage]) -> u64 {
    messages
        .iter()
        .map(|message| {
            MESSAGE_OVERHEAD_TOKENS
                + estimate_token_count(message.role().as_str())
                + estimate_token_count(message.content())
        })
        .sum()
}

fn piece_weight(piece: &str) -> u64 {
    let len = utf16_len(piece);
    // A surrogate pair is two symbols, not one.
    let mut weight = if piece.chars().count() == 1 { len } else { 1 };

    if len > LONG_WORD_THRESHOLD {
        weight += len / 5;
    }
    if !piece.is_empty() && piece.chars().all(|c| c.is_ascii_digit()) {
        weight += (len / 2).max(1);
    }

    weight as u64
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
