//! # Secure Download Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── integration/      # End-to-end broker flows over real files
//! │   ├── scenario_flows.rs
//! │   └── concurrency.rs
//! │
//! └── exploits/         # Attack simulations
//!     ├── token_forgery.rs
//!     └── cache_faults.rs
//!
//! tests/benches/        # Criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sd-tests
//!
//! # By category
//! cargo test -p sd-tests integration::
//! cargo test -p sd-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p sd-tests
//! ```

pub mod exploits;
pub mod fixtures;
pub mod integration;
