//! Provider Tests Module
//!
//! Unit tests for the pieces the adapters are assembled from: event-stream
//! decoding, HTTP status classification, model allow-lists, Gemini request
//! mapping and adapter construction.
//!
//! HTTP round trips against a mock server live in the `tests/` directory.
