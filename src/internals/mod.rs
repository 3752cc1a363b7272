//! Internal building blocks of the orchestrator
//!
//! Token estimation, rate limiting, caching, usage accounting and retry.
//! Most types are re-exported through `lib.rs` for public use.

pub mod cache;
pub mod rate_limit;
pub mod retry;
pub mod tokens;
pub mod usage;
