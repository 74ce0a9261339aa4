//! # Exploit Simulations
//!
//! Attacks against the broker's guarantees: guessing or tampering with
//! tokens, planting records in the cache namespace, and degrading the
//! cache underneath a running broker.

pub mod token_forgery;
