//! # Domain Entities
//!
//! The [`Transaction`] is the unit persisted in the cache for the lifetime
//! of a token. Its payload is a tagged union: a filesystem path (with the
//! metadata observed at registration) or an opaque caller identifier.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::access::keys_match;
use super::errors::ErrorRecord;
use super::token::{sanitize_path, Token};

/// What a caller registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadLocator {
    /// A file on the local filesystem.
    Path(String),
    /// An identifier meaningful only to the caller.
    Opaque(String),
}

impl PayloadLocator {
    pub fn path(path: impl Into<String>) -> Self {
        PayloadLocator::Path(path.into())
    }

    pub fn opaque(identifier: impl Into<String>) -> Self {
        PayloadLocator::Opaque(identifier.into())
    }
}

/// Facts about a file, observed once at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetadata {
    /// Base name of the path.
    pub resource_name: String,
    /// Detected content type.
    pub mime_type: String,
}

/// The resource a transaction grants access to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    PathBacked {
        path: String,
        /// `None` when the path did not exist at registration.
        resource_name: Option<String>,
        mime_type: Option<String>,
    },
    Opaque {
        identifier: String,
    },
}

impl Payload {
    /// The string a token is derived from.
    pub fn identity(&self) -> &str {
        match self {
            Payload::PathBacked { path, .. } => path,
            Payload::Opaque { identifier } => identifier,
        }
    }
}

/// A registered resource awaiting retrieval.
///
/// Mutated only through [`Transaction::add_error`] and
/// [`Transaction::derive_token`]; once persisted, the stored copy is never
/// touched again. Retrieval hands out fresh deserialized values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    payload: Option<Payload>,
    access_key: Option<String>,
    token: Option<Token>,
    errors: Vec<ErrorRecord>,
}

impl Transaction {
    /// Build a path-backed transaction.
    ///
    /// `metadata` is what the filesystem reported for the path; `None`
    /// means the path does not exist, which records an `InvalidPath` error.
    /// The path is sanitized before it is stored.
    pub fn for_path(
        path: &str,
        access_key: impl Into<String>,
        metadata: Option<ResourceMetadata>,
    ) -> Self {
        let path = sanitize_path(path);
        let (resource_name, mime_type) = match metadata {
            Some(meta) => (Some(meta.resource_name), Some(meta.mime_type)),
            None => (None, None),
        };

        let mut transaction = Self {
            payload: Some(Payload::PathBacked {
                path,
                resource_name,
                mime_type,
            }),
            access_key: Some(access_key.into()),
            token: None,
            errors: Vec::new(),
        };

        if transaction.resource_name().is_none() {
            transaction.add_error(ErrorRecord::invalid_path());
        }
        transaction
    }

    /// Build an opaque transaction. The identifier is trusted as given.
    pub fn for_opaque(identifier: impl Into<String>, access_key: impl Into<String>) -> Self {
        Self {
            payload: Some(Payload::Opaque {
                identifier: identifier.into(),
            }),
            access_key: Some(access_key.into()),
            token: None,
            errors: Vec::new(),
        }
    }

    /// An empty transaction used to carry retrieval errors. Holds no
    /// resource and matches no access key.
    pub fn placeholder() -> Self {
        Self {
            payload: None,
            access_key: None,
            token: None,
            errors: Vec::new(),
        }
    }

    /// Derive and remember the token. The first derived token sticks.
    ///
    /// Returns `None` for a placeholder.
    pub fn derive_token(&mut self, salt: &str) -> Option<Token> {
        if self.token.is_none() {
            let identity = self.payload.as_ref()?.identity();
            self.token = Some(Token::derive(salt, identity));
        }
        self.token.clone()
    }

    /// No errors recorded. Recomputed on every call.
    pub fn is_processable(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_access_key_valid(&self, candidate: &str) -> bool {
        match &self.access_key {
            Some(expected) => keys_match(candidate, expected),
            None => false,
        }
    }

    pub fn add_error(&mut self, error: ErrorRecord) {
        self.errors.push(error);
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// The registered path or identifier.
    pub fn payload_locator(&self) -> Option<&str> {
        self.payload.as_ref().map(Payload::identity)
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.payload {
            Some(Payload::PathBacked { path, .. }) => Some(Path::new(path)),
            _ => None,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match &self.payload {
            Some(Payload::Opaque { identifier }) => Some(identifier),
            _ => None,
        }
    }

    pub fn resource_name(&self) -> Option<&str> {
        match &self.payload {
            Some(Payload::PathBacked { resource_name, .. }) => resource_name.as_deref(),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match &self.payload {
            Some(Payload::PathBacked { mime_type, .. }) => mime_type.as_deref(),
            _ => None,
        }
    }
}

// Access keys stay out of logs.
impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("payload", &self.payload)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .field("token", &self.token)
            .field("errors", &self.errors)
            .finish()
    }
}
