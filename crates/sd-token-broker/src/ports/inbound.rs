//! # Inbound Ports (Driving Ports / API)
//!
//! The public API of the token broker.

use async_trait::async_trait;

use crate::domain::entities::{PayloadLocator, Transaction};
use crate::domain::errors::{BrokerError, StoreError};
use crate::domain::token::Token;

/// Primary token broker API.
///
/// Implementations must be thread-safe (`Send + Sync`); calls are
/// independent of each other and share no mutable state.
#[async_trait]
pub trait TokenBrokerApi: Send + Sync {
    /// Register a resource and return the token that will unlock it.
    ///
    /// `ttl_secs` of `None` or `Some(0)` uses the configured default.
    ///
    /// # Errors
    /// * `BrokerError::Rejected` with `InvalidPath` - the file does not exist
    /// * `BrokerError::Rejected` with `Unknown` - the cache declined the write
    /// * `BrokerError::Store` - the cache is unavailable
    async fn register(
        &self,
        locator: PayloadLocator,
        access_key: &str,
        ttl_secs: Option<u64>,
    ) -> Result<Token, BrokerError>;

    /// Exchange a token and access key for the registered transaction.
    ///
    /// # Errors
    /// * `BrokerError::Rejected` with `DocumentExpired` - token unknown or expired
    /// * `BrokerError::Rejected` with `InvalidStoredType` - token maps to a foreign record
    /// * `BrokerError::Rejected` with `InvalidAccessKey` - wrong key
    /// * `BrokerError::Store` - the cache is unavailable
    async fn retrieve(&self, token: &str, access_key: &str) -> Result<Transaction, BrokerError>;

    /// Delete a token's entry. Gated by the same checks as `retrieve`.
    ///
    /// Returns whether the cache reported removing an entry.
    async fn invalidate_transaction(
        &self,
        token: &str,
        access_key: &str,
    ) -> Result<bool, BrokerError>;

    /// Whether `retrieve` would grant access right now.
    async fn is_authorized(&self, token: &str, access_key: &str) -> Result<bool, StoreError>;
}
