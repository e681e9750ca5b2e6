use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use super::r#trait::{Document, DocumentStore, StoreError, StoredDocument};

/// In-memory document store.
///
/// Intended for tests/dev. Collections iterate in key order, the same order
/// the managed store lists documents in.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(key, body)| StoredDocument::new(key.clone(), body.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn upsert(&self, collection: &str, key: &str, body: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), body);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn upsert_replaces_whole_document() {
        let store = InMemoryDocumentStore::new();
        store
            .upsert("inventory", "apple", doc(json!({ "quantity": 1, "note": "x" })))
            .await
            .unwrap();
        store
            .upsert("inventory", "apple", doc(json!({ "quantity": 2 })))
            .await
            .unwrap();

        let got = store.get("inventory", "apple").await.unwrap().unwrap();
        assert_eq!(got, doc(json!({ "quantity": 2 })));
    }

    #[tokio::test]
    async fn list_is_key_ordered_and_collection_scoped() {
        let store = InMemoryDocumentStore::new();
        for key in ["grape", "apple", "banana"] {
            store.upsert("inventory", key, doc(json!({ "quantity": 1 }))).await.unwrap();
        }
        store.upsert("other", "zzz", doc(json!({}))).await.unwrap();

        let keys: Vec<String> = store
            .list("inventory")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.key)
            .collect();
        assert_eq!(keys, vec!["apple", "banana", "grape"]);
        assert!(store.list("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_absent_key_succeeds() {
        let store = InMemoryDocumentStore::new();
        store.delete("inventory", "ghost").await.unwrap();
        assert!(store.get("inventory", "ghost").await.unwrap().is_none());
    }
}
