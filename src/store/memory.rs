//! In-memory [`DocumentStore`] for tests and embedding.
//!
//! Collections are insertion-ordered `Vec`s behind a `RwLock`. Reading a
//! collection that was never written is an [`StoreError::UnknownCollection`].

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::DocumentStore;
use crate::error::{StoreError, StoreResult};

pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Append a record to `collection`, creating the collection if needed.
    pub fn insert(&self, collection: &str, record: Value) {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    /// Register an empty collection.
    pub fn create_collection(&self, collection: &str) {
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        collections.entry(collection.to_string()).or_default();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn kind(&self) -> &str {
        "memory"
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        collections
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }

    async fn fetch_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        let records = collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(records.iter().find(|r| record_id(r) == Some(id)).cloned())
    }
}

/// The `_id` of a raw record, if it has a string one.
pub(crate) fn record_id(record: &Value) -> Option<&str> {
    record.get("_id").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_collection() {
        let store = MemoryStore::new();
        let err = store.fetch_all("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownCollection(ref c) if c == "nope"));
    }

    #[tokio::test]
    async fn test_empty_collection_is_ok() {
        let store = MemoryStore::new();
        store.create_collection("faqs");
        assert!(store.fetch_all("faqs").await.unwrap().is_empty());
        assert!(store.fetch_one("faqs", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_one_matches_on_id() {
        let store = MemoryStore::new();
        store.insert("services", json!({ "_id": "a", "serviceName": "Ads" }));
        store.insert("services", json!({ "_id": "b", "serviceName": "Bots" }));
        let rec = store.fetch_one("services", "b").await.unwrap().unwrap();
        assert_eq!(rec["serviceName"], "Bots");
    }
}
