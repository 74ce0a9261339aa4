//! # Transaction Store
//!
//! Maps `{prefix}/{token}` keys in the external cache to persisted
//! transactions.
//!
//! ## Record format
//!
//! `b"SDTX" || version (1 byte) || bincode(Transaction)`
//!
//! Anything else under a key in our namespace is reported as
//! [`StoreLookup::Foreign`] rather than a miss, so the broker can tell a
//! corrupted or foreign entry apart from an expired one.

use std::time::Duration;

use crate::domain::entities::Transaction;
use crate::domain::errors::StoreError;
use crate::domain::token::Token;
use crate::ports::outbound::CacheBackend;

/// Leading bytes of every stored record.
pub const RECORD_MAGIC: &[u8; 4] = b"SDTX";

/// Current record layout version.
pub const RECORD_VERSION: u8 = 1;

const HEADER_LEN: usize = RECORD_MAGIC.len() + 1;

/// Outcome of a store read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLookup {
    /// A well-formed transaction record.
    Hit(Transaction),
    /// Nothing stored, or the entry expired.
    Miss,
    /// Something is stored but it is not a transaction record.
    Foreign,
}

/// Serialize a transaction into a store record.
pub fn encode_record(transaction: &Transaction) -> Result<Vec<u8>, StoreError> {
    let body =
        bincode::serialize(transaction).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let mut record = Vec::with_capacity(HEADER_LEN + body.len());
    record.extend_from_slice(RECORD_MAGIC);
    record.push(RECORD_VERSION);
    record.extend_from_slice(&body);
    Ok(record)
}

/// Parse a store record. `None` if the bytes are not a transaction record.
///
/// Only registrable transactions are ever written, so a record without a
/// payload or carrying errors is not one of ours either.
pub fn decode_record(bytes: &[u8]) -> Option<Transaction> {
    let body = bytes.strip_prefix(RECORD_MAGIC.as_slice())?;
    let (&version, body) = body.split_first()?;
    if version != RECORD_VERSION {
        return None;
    }
    bincode::deserialize::<Transaction>(body)
        .ok()
        .filter(|tx| tx.payload().is_some() && tx.is_processable())
}

/// Cache-backed persistence for transactions.
pub struct TransactionStore<C: CacheBackend> {
    cache: C,
    prefix: String,
}

impl<C: CacheBackend> TransactionStore<C> {
    pub fn new(cache: C, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Cache key for a token.
    pub fn key_for(&self, token: &Token) -> String {
        format!("{}/{}", self.prefix, token)
    }

    /// Persist `transaction` under `token` for `ttl_secs`.
    ///
    /// `Ok(false)` means the cache declined the write.
    pub async fn put(
        &self,
        token: &Token,
        transaction: &Transaction,
        ttl_secs: u64,
    ) -> Result<bool, StoreError> {
        let record = encode_record(transaction)?;
        self.cache
            .put(&self.key_for(token), record, Duration::from_secs(ttl_secs))
            .await
    }

    pub async fn get(&self, token: &Token) -> Result<StoreLookup, StoreError> {
        let lookup = match self.cache.get(&self.key_for(token)).await? {
            None => StoreLookup::Miss,
            Some(bytes) => match decode_record(&bytes) {
                Some(transaction) => StoreLookup::Hit(transaction),
                None => StoreLookup::Foreign,
            },
        };
        Ok(lookup)
    }

    /// Best-effort delete. Returns whether an entry was removed.
    pub async fn invalidate(&self, token: &Token) -> Result<bool, StoreError> {
        self.cache.delete(&self.key_for(token)).await
    }
}
