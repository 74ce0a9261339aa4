//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: the broker API callers use
//! - **Outbound (Driven)**: the cache, filesystem and clock the broker needs

pub mod inbound;
pub mod outbound;
