//! # Integration Tests
//!
//! Full register/retrieve/invalidate flows through the public API, over
//! real files and the in-memory TTL cache.
