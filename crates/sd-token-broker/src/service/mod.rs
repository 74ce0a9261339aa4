//! # Service Layer
//!
//! Wires the domain to the cache and filesystem ports.

pub mod broker;
pub mod delivery;
pub mod store;

pub use broker::TokenBroker;
pub use delivery::{Attachment, Blob};
pub use store::{StoreLookup, TransactionStore};
