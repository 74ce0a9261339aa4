//! # Domain Layer
//!
//! Transactions, tokens and the error taxonomy. No I/O: filesystem facts
//! arrive as [`entities::ResourceMetadata`] gathered by the service layer.

pub mod access;
pub mod entities;
pub mod errors;
pub mod token;

pub use entities::{Payload, PayloadLocator, ResourceMetadata, Transaction};
pub use errors::{BrokerError, ErrorKind, ErrorRecord, Rejection, StoreError};
pub use token::Token;
