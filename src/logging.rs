//! Logging for polyglot-llm.
//!
//! `tracing` macros under `log_*` names, plus a masking helper so credentials
//! can appear in diagnostics without leaking. The library never installs a
//! subscriber; that is left to the application.

pub use tracing::{
    debug as log_debug,
    error as log_error,
    info as log_info,
    trace as log_trace,
    warn as log_warn,
};

const VISIBLE_KEY_CHARS: usize = 4;

/// Mask an API key for logging, keeping four characters at each end.
///
/// Keys of eight characters or fewer are masked completely.
pub(crate) fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= VISIBLE_KEY_CHARS * 2 {
        return "*".repeat(chars.len());
    }

    let start: String = chars[..VISIBLE_KEY_CHARS].iter().collect();
    let end: String = chars[chars.len() - VISIBLE_KEY_CHARS..].iter().collect();
    format!("{start}{}{end}", "*".repeat(chars.len() - VISIBLE_KEY_CHARS * 2))
}
