//! Configuration for the token broker.

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder salt. Deployments must override it.
pub const DEFAULT_HASH_SALT: &str = "change-me-secure-download-salt";

/// Invalid broker configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cache prefix must not be empty")]
    EmptyPrefix,

    #[error("Cache prefix must not start or end with '/': {0}")]
    SlashDelimitedPrefix(String),

    #[error("Default TTL must be at least one second")]
    ZeroTtl,

    #[error("Hash salt must not be empty")]
    EmptySalt,

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Broker configuration. Immutable once the broker is built.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Key namespace in the cache; keys are `{cache_prefix}/{token}`.
    pub cache_prefix: String,
    /// TTL applied when a registration does not ask for one.
    pub default_ttl_secs: u64,
    /// Shared secret mixed into token derivation.
    pub hash_salt: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            cache_prefix: "secure_download_bundle".to_string(),
            default_ttl_secs: 300,
            hash_salt: DEFAULT_HASH_SALT.to_string(),
        }
    }
}

impl BrokerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SD_CACHE_PREFIX`: Cache key namespace (default: secure_download_bundle)
    /// - `SD_DEFAULT_TTL_SECS`: Default token lifetime (default: 300)
    /// - `SD_HASH_SALT`: Token derivation secret (default: placeholder)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let default_ttl_secs = match lookup("SD_DEFAULT_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: "SD_DEFAULT_TTL_SECS",
                    value: raw,
                })?,
            None => defaults.default_ttl_secs,
        };

        Ok(Self {
            cache_prefix: lookup("SD_CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            default_ttl_secs,
            hash_salt: lookup("SD_HASH_SALT").unwrap_or(defaults.hash_salt),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        if self.cache_prefix.starts_with('/') || self.cache_prefix.ends_with('/') {
            return Err(ConfigError::SlashDelimitedPrefix(self.cache_prefix.clone()));
        }
        if self.default_ttl_secs == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.hash_salt.is_empty() {
            return Err(ConfigError::EmptySalt);
        }
        Ok(())
    }

    /// Whether the salt is still the shipped placeholder.
    pub fn uses_default_salt(&self) -> bool {
        self.hash_salt == DEFAULT_HASH_SALT
    }
}

// The salt is a secret.
impl fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("cache_prefix", &self.cache_prefix)
            .field("default_ttl_secs", &self.default_ttl_secs)
            .field("hash_salt", &"<redacted>")
            .finish()
    }
}
