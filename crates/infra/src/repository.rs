//! Inventory repository (application-level orchestration).
//!
//! Every operation follows the same pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Read the records the command depends on (0–2 `get` calls)
//!   ↓
//! 2. Decide the writes (pure, `StockSnapshot::handle`)
//!   ↓
//! 3. Apply the writes in order (`upsert` / `delete`)
//!   ↓
//! 4. Re-list the whole collection and return it
//! ```
//!
//! Nothing wraps steps 1–3 in a transaction: two clients doing
//! read-modify-write on the same name can lose an update. Failures are
//! returned to the caller as they happen; there is no retry.

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::instrument;

use pantry_core::{DomainError, ItemName, Quantity};
use pantry_inventory::{
    AddItem, InventoryCommand, InventoryItem, ItemDocument, ModifyItem, RemoveAll, RemoveOne,
    RenamePolicy, StockSnapshot, StoreWrite,
};

use crate::document_store::{Document, DocumentStore, StoreError};

/// Collection holding inventory records unless configured otherwise.
pub const DEFAULT_COLLECTION: &str = "inventory";

#[derive(Debug, Error)]
pub enum InventoryError {
    /// Input rejected at the boundary or by the decision logic.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// `find` on an absent name. Mutations treat absence as a no-op instead.
    #[error("record not found")]
    RecordNotFound,
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    /// A stored document could not be read as an inventory record.
    #[error("malformed record '{key}': {message}")]
    MalformedRecord { key: String, message: String },
    /// The store could not be reached or refused the request.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<DomainError> for InventoryError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidInput(msg) => InventoryError::InvalidInput(msg),
            DomainError::NotFound => InventoryError::RecordNotFound,
            DomainError::InvariantViolation(msg) => InventoryError::InvariantViolation(msg),
        }
    }
}

fn map_store_error(key: &str, err: StoreError) -> InventoryError {
    match err {
        StoreError::Unavailable(msg) => InventoryError::StoreUnavailable(msg),
        StoreError::Rejected { code, message } => {
            InventoryError::StoreUnavailable(format!("{code}: {message}"))
        }
        StoreError::Decode(message) => InventoryError::MalformedRecord {
            key: key.to_string(),
            message,
        },
    }
}

/// Read a stored body as an item quantity.
fn decode_quantity(key: &str, body: Document) -> Result<Quantity, InventoryError> {
    let malformed = |message: String| InventoryError::MalformedRecord {
        key: key.to_string(),
        message,
    };
    let doc: ItemDocument =
        serde_json::from_value(JsonValue::Object(body)).map_err(|e| malformed(e.to_string()))?;
    doc.quantity().map_err(|e| malformed(e.to_string()))
}

fn encode_quantity(key: &str, quantity: Quantity) -> Result<Document, InventoryError> {
    match serde_json::to_value(ItemDocument::new(quantity)) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(other) => Err(InventoryError::InvariantViolation(format!(
            "record '{key}' encoded as non-object: {other}"
        ))),
        Err(e) => Err(InventoryError::InvariantViolation(e.to_string())),
    }
}

/// Inventory operations against a keyed document collection.
///
/// ## Generic Parameters
///
/// - `S`: document store implementation (`InMemoryDocumentStore` in tests,
///   Postgres or Firestore in deployments, `Arc<dyn DocumentStore>` when the
///   backend is picked at runtime)
#[derive(Debug, Clone)]
pub struct InventoryRepository<S> {
    store: S,
    collection: String,
    rename_policy: RenamePolicy,
}

impl<S> InventoryRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
            rename_policy: RenamePolicy::default(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_rename_policy(mut self, policy: RenamePolicy) -> Self {
        self.rename_policy = policy;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn rename_policy(&self) -> RenamePolicy {
        self.rename_policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> InventoryRepository<S>
where
    S: DocumentStore,
{
    /// Add `quantity` units, merging with an existing record.
    pub async fn add(
        &self,
        name: ItemName,
        quantity: Quantity,
    ) -> Result<Vec<InventoryItem>, InventoryError> {
        self.execute(InventoryCommand::Add(AddItem { name, quantity })).await
    }

    /// Remove exactly one unit; the record is deleted when it runs out.
    pub async fn remove(&self, name: ItemName) -> Result<Vec<InventoryItem>, InventoryError> {
        self.execute(InventoryCommand::RemoveOne(RemoveOne { name })).await
    }

    /// Delete the record regardless of quantity.
    pub async fn remove_all(&self, name: ItemName) -> Result<Vec<InventoryItem>, InventoryError> {
        self.execute(InventoryCommand::RemoveAll(RemoveAll { name })).await
    }

    /// Set the quantity, renaming the record when `new_name` differs.
    pub async fn modify(
        &self,
        old_name: ItemName,
        new_name: ItemName,
        quantity: Quantity,
    ) -> Result<Vec<InventoryItem>, InventoryError> {
        self.execute(InventoryCommand::Modify(ModifyItem {
            old_name,
            new_name,
            quantity,
        }))
        .await
    }

    /// All records in store-iteration order.
    ///
    /// Documents that are not valid inventory records (written by another
    /// client) are skipped with a warning rather than failing the listing.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn list(&self) -> Result<Vec<InventoryItem>, InventoryError> {
        let docs = self
            .store
            .list(&self.collection)
            .await
            .map_err(|e| map_store_error(&self.collection, e))?;

        let mut items = Vec::with_capacity(docs.len());
        for doc in docs {
            let name = match ItemName::parse(&doc.key) {
                Ok(name) if name.as_str() == doc.key => name,
                _ => {
                    tracing::warn!(key = %doc.key, "skipping record with unusable key");
                    continue;
                }
            };
            match decode_quantity(&doc.key, doc.body) {
                Ok(quantity) => items.push(InventoryItem::new(name, quantity)),
                Err(e) => tracing::warn!("skipping record: {e}"),
            }
        }
        Ok(items)
    }

    /// One record by name.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn find(&self, name: &ItemName) -> Result<InventoryItem, InventoryError> {
        match self.fetch(name).await? {
            Some(quantity) => Ok(InventoryItem::new(name.clone(), quantity)),
            None => Err(InventoryError::RecordNotFound),
        }
    }

    /// Run a command through read → decide → write → re-list.
    #[instrument(
        skip(self, command),
        fields(collection = %self.collection, command = command.kind())
    )]
    pub async fn execute(
        &self,
        command: InventoryCommand,
    ) -> Result<Vec<InventoryItem>, InventoryError> {
        let mut snapshot = StockSnapshot::new();
        for name in command.reads(self.rename_policy) {
            if let Some(quantity) = self.fetch(name).await? {
                snapshot.insert(name.clone(), quantity);
            }
        }

        let writes = snapshot.handle(&command, self.rename_policy)?;
        for write in &writes {
            self.write(write).await?;
        }

        tracing::info!(writes = writes.len(), "inventory command applied");
        self.list().await
    }

    async fn fetch(&self, name: &ItemName) -> Result<Option<Quantity>, InventoryError> {
        let body = self
            .store
            .get(&self.collection, name.as_str())
            .await
            .map_err(|e| map_store_error(name.as_str(), e))?;
        body.map(|b| decode_quantity(name.as_str(), b)).transpose()
    }

    async fn write(&self, write: &StoreWrite) -> Result<(), InventoryError> {
        let key = write.name().as_str();
        let result = match write {
            StoreWrite::Upsert { quantity, .. } => {
                let body = encode_quantity(key, *quantity)?;
                self.store.upsert(&self.collection, key, body).await
            }
            StoreWrite::Delete { .. } => self.store.delete(&self.collection, key).await,
        };
        result.map_err(|e| map_store_error(key, e))
    }
}
