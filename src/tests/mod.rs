// Test modules for polyglot-llm crate
//
// Test organization follows the pattern where each source file has a
// corresponding test file that focuses on business logic verification.
//
// HTTP-level tests against mock servers live in the crate's tests/ directory.

// Test helper utilities: provider, middleware and plugin doubles
pub mod helpers;

pub mod cache;
pub mod rate_limit;
