//! # Secure Download Token Broker
//!
//! Issues capability tokens for resources. Registering a resource together
//! with an access key yields a token; presenting the token with the same
//! key returns the resource, or a typed rejection.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Transactions, token derivation, error taxonomy
//! - **Ports Layer** (`ports/`): Broker API, cache, filesystem and clock traits
//! - **Adapters Layer** (`adapters/`): In-memory TTL cache, local filesystem probe
//! - **Service Layer** (`service/`): Registration, retrieval and delivery
//!
//! ## Security Notes
//!
//! - Tokens are `hex(HMAC-SHA256(salt, identity))`; the salt never leaves
//!   the broker and is redacted from `Debug` output
//! - Access keys are compared in constant time and never logged
//! - Retrieval never mutates the stored transaction
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use sd_token_broker::{BrokerConfig, InMemoryCache, TokenBroker, TokenBrokerApi};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let broker = TokenBroker::new(BrokerConfig::from_env()?, Arc::new(InMemoryCache::new()))?;
//! let token = broker.register_path("/srv/files/report.pdf", "k1", Some(60)).await?;
//! let transaction = broker.retrieve(token.as_str(), "k1").await?;
//! assert_eq!(transaction.resource_name(), Some("report.pdf"));
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{InMemoryCache, LocalResourceProbe, ManualTimeSource, SystemTimeSource};
pub use config::{BrokerConfig, ConfigError};
pub use domain::{
    BrokerError, ErrorKind, ErrorRecord, Payload, PayloadLocator, Rejection, ResourceMetadata,
    StoreError, Token, Transaction,
};
pub use ports::inbound::TokenBrokerApi;
pub use ports::outbound::{CacheBackend, ResourceProbe, TimeSource};
pub use service::{Attachment, Blob, TokenBroker};
