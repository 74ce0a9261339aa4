//! # Token Broker Service
//!
//! Application service implementing [`TokenBrokerApi`].
//!
//! ## Registration
//!
//! `Constructing → Validating → {Persisted | Rejected}`
//!
//! 1. Build the transaction (probing the filesystem for path payloads)
//! 2. Reject if it carries errors; nothing is written
//! 3. Derive the token from the salt and the payload identity
//! 4. Write it with the requested or default TTL
//! 5. A declined write is a rejection with an `Unknown` record
//!
//! ## Retrieval
//!
//! `Fetching → Validating → {Granted | Rejected}`
//!
//! | Store outcome | Result |
//! |---------------|--------|
//! | miss | entry deleted, placeholder rejected with `DocumentExpired` |
//! | foreign record | placeholder rejected with `InvalidStoredType` |
//! | wrong key | retrieved transaction rejected with `InvalidAccessKey` |
//! | right key | retrieved transaction granted |
//!
//! The retrieved transaction is a private deserialized copy, so annotating
//! it never touches the stored entry.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::adapters::filesystem::LocalResourceProbe;
use crate::config::{BrokerConfig, ConfigError};
use crate::domain::entities::{PayloadLocator, Transaction};
use crate::domain::errors::{BrokerError, ErrorKind, ErrorRecord, Rejection, StoreError};
use crate::domain::token::{sanitize_path, Token};
use crate::ports::inbound::TokenBrokerApi;
use crate::ports::outbound::{CacheBackend, ResourceProbe};

use super::store::{StoreLookup, TransactionStore};

/// Capability-token broker over an external TTL cache.
pub struct TokenBroker<C: CacheBackend, P: ResourceProbe = LocalResourceProbe> {
    store: TransactionStore<C>,
    probe: P,
    default_ttl_secs: u64,
    hash_salt: String,
}

impl<C: CacheBackend> TokenBroker<C> {
    /// Create a broker that probes the local filesystem.
    pub fn new(config: BrokerConfig, cache: C) -> Result<Self, ConfigError> {
        Self::with_probe(config, cache, LocalResourceProbe)
    }
}

impl<C: CacheBackend, P: ResourceProbe> TokenBroker<C, P> {
    pub fn with_probe(config: BrokerConfig, cache: C, probe: P) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.uses_default_salt() {
            warn!("Broker uses the placeholder hash salt; set SD_HASH_SALT");
        }
        Ok(Self {
            store: TransactionStore::new(cache, config.cache_prefix),
            probe,
            default_ttl_secs: config.default_ttl_secs,
            hash_salt: config.hash_salt,
        })
    }

    pub fn store(&self) -> &TransactionStore<C> {
        &self.store
    }

    pub fn default_ttl_secs(&self) -> u64 {
        self.default_ttl_secs
    }

    /// Register a file.
    pub async fn register_path(
        &self,
        path: &str,
        access_key: &str,
        ttl_secs: Option<u64>,
    ) -> Result<Token, BrokerError> {
        self.register(PayloadLocator::path(path), access_key, ttl_secs)
            .await
    }

    /// Register an opaque resource identifier. No filesystem check applies.
    pub async fn pre_authorize(
        &self,
        identifier: &str,
        access_key: &str,
        ttl_secs: Option<u64>,
    ) -> Result<Token, BrokerError> {
        self.register(PayloadLocator::opaque(identifier), access_key, ttl_secs)
            .await
    }

    fn effective_ttl(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(ttl) if ttl > 0 => ttl,
            _ => self.default_ttl_secs,
        }
    }

    async fn build(&self, locator: PayloadLocator, access_key: &str) -> Transaction {
        match locator {
            PayloadLocator::Path(raw) => {
                let path = sanitize_path(&raw);
                let metadata = self.probe.probe(path.as_ref()).await;
                Transaction::for_path(&path, access_key, metadata)
            }
            PayloadLocator::Opaque(identifier) => Transaction::for_opaque(identifier, access_key),
        }
    }

    /// Look up and validate a token. Returns the parsed token alongside the
    /// granted transaction.
    async fn fetch(
        &self,
        raw_token: &str,
        access_key: &str,
    ) -> Result<(Token, Transaction), BrokerError> {
        // Anything that is not token-shaped cannot have been issued by us.
        let Some(token) = Token::parse(raw_token) else {
            debug!("Rejected malformed token");
            return Err(reject_with(ErrorRecord::document_expired()));
        };

        match self.store.get(&token).await? {
            StoreLookup::Miss => {
                // Best effort: the miss is already confirmed.
                if let Err(err) = self.store.invalidate(&token).await {
                    debug!(token = fingerprint(&token), %err, "Cleanup delete failed");
                }
                debug!(token = fingerprint(&token), "Token expired or unknown");
                Err(reject_with(ErrorRecord::document_expired()))
            }
            StoreLookup::Foreign => {
                debug!(token = fingerprint(&token), "Token maps to a foreign record");
                Err(reject_with(ErrorRecord::invalid_stored_type()))
            }
            StoreLookup::Hit(mut transaction) => {
                if !transaction.is_access_key_valid(access_key) {
                    transaction.add_error(ErrorRecord::invalid_access_key());
                    debug!(token = fingerprint(&token), "Access key mismatch");
                    return Err(Rejection::new(transaction).into());
                }
                debug!(token = fingerprint(&token), "Access granted");
                Ok((token, transaction))
            }
        }
    }
}

#[async_trait]
impl<C: CacheBackend, P: ResourceProbe> TokenBrokerApi for TokenBroker<C, P> {
    async fn register(
        &self,
        locator: PayloadLocator,
        access_key: &str,
        ttl_secs: Option<u64>,
    ) -> Result<Token, BrokerError> {
        let mut transaction = self.build(locator, access_key).await;

        if !transaction.is_processable() {
            debug!(
                kind = %transaction.errors()[0].kind(),
                "Registration rejected"
            );
            return Err(Rejection::new(transaction).into());
        }

        let Some(token) = transaction.derive_token(&self.hash_salt) else {
            transaction.add_error(ErrorRecord::new(
                ErrorKind::Unknown,
                "Transaction has no payload",
            ));
            return Err(Rejection::new(transaction).into());
        };

        let ttl = self.effective_ttl(ttl_secs);
        if !self.store.put(&token, &transaction, ttl).await? {
            transaction.add_error(ErrorRecord::store_write_failed());
            debug!(token = fingerprint(&token), "Cache declined registration");
            return Err(Rejection::new(transaction).into());
        }

        debug!(token = fingerprint(&token), ttl_secs = ttl, "Transaction registered");
        Ok(token)
    }

    async fn retrieve(&self, token: &str, access_key: &str) -> Result<Transaction, BrokerError> {
        self.fetch(token, access_key)
            .await
            .map(|(_, transaction)| transaction)
    }

    async fn invalidate_transaction(
        &self,
        token: &str,
        access_key: &str,
    ) -> Result<bool, BrokerError> {
        let (token, _) = self.fetch(token, access_key).await?;
        let removed = self.store.invalidate(&token).await?;
        debug!(token = fingerprint(&token), removed, "Transaction invalidated");
        Ok(removed)
    }

    async fn is_authorized(&self, token: &str, access_key: &str) -> Result<bool, StoreError> {
        match self.fetch(token, access_key).await {
            Ok(_) => Ok(true),
            Err(BrokerError::Store(err)) => Err(err),
            Err(_) => Ok(false),
        }
    }
}

fn reject_with(error: ErrorRecord) -> BrokerError {
    let mut placeholder = Transaction::placeholder();
    placeholder.add_error(error);
    Rejection::new(placeholder).into()
}

/// Leading characters of a token, enough to correlate log lines.
fn fingerprint(token: &Token) -> &str {
    &token.as_str()[..12]
}
