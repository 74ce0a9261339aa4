//! Delivery of granted file-backed resources.
//!
//! Both operations run a full retrieval first; nothing is read from disk
//! unless the token and access key check out.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::debug;

use crate::adapters::filesystem::content_type_for;
use crate::domain::entities::Transaction;
use crate::domain::errors::BrokerError;
use crate::ports::inbound::TokenBrokerApi;
use crate::ports::outbound::{CacheBackend, ResourceProbe};

use super::broker::TokenBroker;

/// What an HTTP layer needs to answer with `Content-Disposition: attachment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub file_name: String,
    /// `file_name` with every non-ASCII character replaced by `_`.
    pub ascii_file_name: String,
    pub content_type: String,
}

impl Attachment {
    fn from_transaction(transaction: &Transaction) -> Result<Self, BrokerError> {
        let path = transaction.path().ok_or(BrokerError::NotFileBacked)?;

        let file_name = match transaction.resource_name() {
            Some(name) => name.to_owned(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let content_type = transaction
            .mime_type()
            .unwrap_or_else(|| content_type_for(path))
            .to_owned();

        Ok(Self {
            path: path.to_path_buf(),
            ascii_file_name: ascii_fallback(&file_name),
            file_name,
            content_type,
        })
    }
}

/// File contents encoded for embedding in a JSON response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blob {
    pub content_type: String,
    pub data_base64: String,
}

pub fn ascii_fallback(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect()
}

impl<C: CacheBackend, P: ResourceProbe> TokenBroker<C, P> {
    /// Retrieve and describe the file behind a token.
    ///
    /// # Errors
    ///
    /// Any retrieval error, or `NotFileBacked` for an opaque resource.
    pub async fn open_attachment(
        &self,
        token: &str,
        access_key: &str,
    ) -> Result<Attachment, BrokerError> {
        let transaction = self.retrieve(token, access_key).await?;
        Attachment::from_transaction(&transaction)
    }

    /// Retrieve the file behind a token and return it base64 encoded.
    ///
    /// # Errors
    ///
    /// Any `open_attachment` error, or `Io` if the file cannot be read.
    pub async fn read_blob(&self, token: &str, access_key: &str) -> Result<Blob, BrokerError> {
        let attachment = self.open_attachment(token, access_key).await?;

        let data = tokio::fs::read(&attachment.path)
            .await
            .map_err(|source| BrokerError::Io {
                path: attachment.path.clone(),
                source,
            })?;
        debug!(bytes = data.len(), "Encoding blob");

        Ok(Blob {
            content_type: attachment.content_type,
            data_base64: STANDARD.encode(data),
        })
    }
}
