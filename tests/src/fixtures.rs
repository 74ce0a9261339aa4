//! Shared fixtures: a broker over an in-memory cache on a manual clock,
//! plus a scratch directory of real files.
//!
//! Broker events are logged through `sd-telemetry`; run with
//! `SD_LOG_LEVEL=sd_token_broker=trace` to see them.

use std::path::PathBuf;
use std::sync::{Arc, Once};

use sd_telemetry::{init_logging, TelemetryConfig, TelemetryError};
use sd_token_broker::{BrokerConfig, InMemoryCache, ManualTimeSource, TokenBroker};
use tempfile::TempDir;

pub const TEST_SALT: &str = "integration-salt";
pub const EPOCH: u64 = 1_700_000_000;

pub type TestBroker = TokenBroker<Arc<InMemoryCache>>;

static LOGGING: Once = Once::new();

/// Install the suite-wide subscriber once, writing through libtest capture.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let config = TelemetryConfig {
            service_name: "sd-tests".to_string(),
            test_writer: true,
            ..TelemetryConfig::from_env()
        };
        match init_logging(&config) {
            // Some other subscriber got there first; events still flow.
            Ok(()) | Err(TelemetryError::SubscriberInit(_)) => {}
            Err(err) => panic!("invalid test logging configuration: {err}"),
        }
    });
}

pub struct Harness {
    pub broker: Arc<TestBroker>,
    pub cache: Arc<InMemoryCache>,
    pub clock: Arc<ManualTimeSource>,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BrokerConfig {
            cache_prefix: "secure_download_bundle".into(),
            default_ttl_secs: 300,
            hash_salt: TEST_SALT.into(),
        })
    }

    pub fn with_config(config: BrokerConfig) -> Self {
        let clock = Arc::new(ManualTimeSource::new(EPOCH));
        let cache = Arc::new(InMemoryCache::with_clock(clock.clone()));
        Self::over_cache(config, cache, clock)
    }

    pub fn over_cache(
        config: BrokerConfig,
        cache: Arc<InMemoryCache>,
        clock: Arc<ManualTimeSource>,
    ) -> Self {
        init_test_logging();
        let broker = TokenBroker::new(config, cache.clone()).expect("valid test config");
        Self {
            broker: Arc::new(broker),
            cache,
            clock,
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    /// Create a file in the scratch directory and return its path.
    pub fn file(&self, name: &str, contents: &[u8]) -> String {
        let path: PathBuf = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture file");
        path.to_str().expect("utf-8 temp path").to_string()
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_installs_subscriber() {
        let _h = Harness::new();
        assert!(tracing::dispatcher::has_been_set());

        // Repeated setup is harmless.
        init_test_logging();
        let _again = Harness::new();
    }
}
