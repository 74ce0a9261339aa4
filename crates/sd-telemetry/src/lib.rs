//! # SD Telemetry
//!
//! Logging setup for processes embedding the token broker.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sd_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     init_logging(&TelemetryConfig::from_env()).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SD_SERVICE_NAME` | `secure-download` | Service name on every event |
//! | `SD_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `SD_JSON_LOGS` | `false` | JSON lines instead of human-readable output |
//! | `SD_CONSOLE_OUTPUT` | `true` | Write events to stdout at all |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directives}': {reason}")]
    InvalidFilter { directives: String, reason: String },

    #[error("Failed to install global subscriber: {0}")]
    SubscriberInit(String),
}
