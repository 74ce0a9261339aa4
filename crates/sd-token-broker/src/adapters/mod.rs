//! # Adapters Module
//!
//! Infrastructure adapters implementing the outbound ports.

pub mod filesystem;
pub mod memory_cache;
pub mod time;

pub use filesystem::{content_type_for, LocalResourceProbe};
pub use memory_cache::InMemoryCache;
pub use time::{ManualTimeSource, SystemTimeSource};
