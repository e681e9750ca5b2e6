use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// Body of a stored document: a JSON object of named fields.
pub type Document = Map<String, JsonValue>;

/// A document as returned by a collection listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub key: String,
    pub body: Document,
}

impl StoredDocument {
    pub fn new(key: impl Into<String>, body: Document) -> Self {
        Self {
            key: key.into(),
            body,
        }
    }
}

/// Document store operation error.
///
/// These are **infrastructure errors** (transport, permissions, encoding) as
/// opposed to domain errors (validation, invariants).
///
/// ## Error Categories
///
/// - **Unavailable**: the store could not be reached or the connection failed
/// - **Rejected**: the store answered but refused the request (permission, quota)
/// - **Decode**: a response or stored body could not be interpreted
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("failed to decode document: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Keyed document store abstraction.
///
/// Every call is a round trip to the backing store. There is no transaction
/// spanning calls: a read followed by a write is last-write-wins against
/// other clients.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Enumerate all documents of a collection in store-iteration order.
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;

    /// Fetch one document by key.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError>;

    /// Create or fully replace the document under `key`.
    async fn upsert(&self, collection: &str, key: &str, body: Document) -> Result<(), StoreError>;

    /// Delete the document under `key`. Deleting an absent key succeeds.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        (**self).list(collection).await
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        (**self).get(collection, key).await
    }

    async fn upsert(&self, collection: &str, key: &str, body: Document) -> Result<(), StoreError> {
        (**self).upsert(collection, key, body).await
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        (**self).delete(collection, key).await
    }
}
