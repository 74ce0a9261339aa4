//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the broker requires the host application to provide.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::ResourceMetadata;
use crate::domain::errors::StoreError;

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// An external key-value cache with per-entry TTL.
///
/// Production deployments back this with a shared cache service;
/// `InMemoryCache` (adapters) serves single-process use and tests.
///
/// `Err` always means the cache itself failed (unreachable, timed out).
/// A cache that is working but declines a write returns `Ok(false)`.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Store `value` under `key` for `ttl`. Returns whether the write took.
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool, StoreError>;

    /// Read `key`. `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Remove `key`. Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

#[async_trait]
impl<C: CacheBackend + ?Sized> CacheBackend for Arc<C> {
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool, StoreError> {
        (**self).put(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key).await
    }
}

/// Read-only filesystem inspection, used at registration only.
#[async_trait]
pub trait ResourceProbe: Send + Sync {
    /// Metadata for an existing file, `None` if nothing is there.
    async fn probe(&self, path: &Path) -> Option<ResourceMetadata>;
}

/// Clock abstraction (for testability).
pub trait TimeSource: Send + Sync {
    /// Current timestamp in seconds since epoch.
    fn now(&self) -> Timestamp;
}
