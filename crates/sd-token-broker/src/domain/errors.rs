//! # Error Taxonomy
//!
//! Failure kinds surfaced by registration and retrieval, the records that
//! carry them, and the call-level error types.
//!
//! Two channels are kept apart:
//! - **Rejections** (`BrokerError::Rejected`): the call was understood and refused
//!   for one of the five [`ErrorKind`]s. Recoverable by the caller.
//! - **Store failures** (`BrokerError::Store`): the external cache could not be
//!   reached or a record could not be encoded. Never reported as a rejection.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::Transaction;

/// Discriminated failure kinds.
///
/// Codes and symbolic names are part of the external contract (they are
/// persisted with records and logged); never renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ErrorKind {
    /// Store write failure or anything unclassified.
    Unknown = 0,
    /// Token missing from, or evicted by, the store.
    DocumentExpired = 1,
    /// The stored value is not a transaction record.
    InvalidStoredType = 2,
    /// Access key does not match the one given at registration.
    InvalidAccessKey = 3,
    /// Source file absent at registration time.
    InvalidPath = 4,
}

impl ErrorKind {
    /// All kinds, in code order.
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Unknown,
        ErrorKind::DocumentExpired,
        ErrorKind::InvalidStoredType,
        ErrorKind::InvalidAccessKey,
        ErrorKind::InvalidPath,
    ];

    /// Stable numeric code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Reverse of [`ErrorKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Stable symbolic name.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unknown => "unknown",
            ErrorKind::DocumentExpired => "document_expired",
            ErrorKind::InvalidStoredType => "invalid_stored_type",
            ErrorKind::InvalidAccessKey => "invalid_access_key",
            ErrorKind::InvalidPath => "invalid_path",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed failure attached to a [`Transaction`].
///
/// Consumers branch on `kind`; `message` is for humans only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    kind: ErrorKind,
    message: String,
}

impl ErrorRecord {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn document_expired() -> Self {
        Self::new(ErrorKind::DocumentExpired, "Token expired or missing")
    }

    pub fn invalid_stored_type() -> Self {
        Self::new(
            ErrorKind::InvalidStoredType,
            "Token does not reference a transaction record",
        )
    }

    pub fn invalid_access_key() -> Self {
        Self::new(
            ErrorKind::InvalidAccessKey,
            "Invalid access key provided for token",
        )
    }

    pub fn invalid_path() -> Self {
        Self::new(ErrorKind::InvalidPath, "File path does not exist")
    }

    pub fn store_write_failed() -> Self {
        Self::new(ErrorKind::Unknown, "Cache declined the transaction write")
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)
    }
}

/// A refused registration or retrieval.
///
/// Wraps the transaction the errors were attached to: a fresh placeholder
/// for missing/foreign records, the retrieved transaction for a key
/// mismatch, the candidate transaction for a failed registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    transaction: Box<Transaction>,
}

impl Rejection {
    /// Wrap a transaction that carries at least one error.
    pub fn new(transaction: Transaction) -> Self {
        debug_assert!(!transaction.is_processable());
        Self {
            transaction: Box::new(transaction),
        }
    }

    /// The kind of the first recorded error.
    pub fn kind(&self) -> ErrorKind {
        self.errors()
            .first()
            .map(ErrorRecord::kind)
            .unwrap_or(ErrorKind::Unknown)
    }

    /// All recorded errors, in insertion order.
    pub fn errors(&self) -> &[ErrorRecord] {
        self.transaction.errors()
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors().iter().any(|e| e.kind() == kind)
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn into_transaction(self) -> Transaction {
        *self.transaction
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors().iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

/// Failures of the external cache, as seen through the store port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The cache could not be reached.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// A transaction could not be encoded for storage.
    #[error("Record serialization failed: {0}")]
    Serialization(String),
}

/// Errors returned by the broker.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Validation refused the call.
    #[error("Transaction rejected: {0}")]
    Rejected(Rejection),

    /// The cache failed; not a validation outcome.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Delivery was requested for an opaque resource.
    #[error("Granted transaction does not reference a file")]
    NotFileBacked,

    /// The file behind a granted transaction could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BrokerError {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            BrokerError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Taxonomy kind of a rejection; `None` for store and delivery failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.rejection().map(Rejection::kind)
    }
}

impl From<Rejection> for BrokerError {
    fn from(rejection: Rejection) -> Self {
        BrokerError::Rejected(rejection)
    }
}
