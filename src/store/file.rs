//! JSON-fixture [`DocumentStore`].
//!
//! Reads a single file shaped like `{ "<collection>": [ records... ] }`.
//! The file is re-read on every call so edits show up without a restart,
//! which also keeps the one-round-trip-per-call contract of the other
//! backends.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::memory::record_id;
use super::DocumentStore;
use crate::error::{StoreError, StoreResult};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> StoreResult<Map<String, Value>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| StoreError::Malformed(format!("{}: {}", self.path.display(), e)))?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Malformed(format!(
                "{}: top level must be an object of collections",
                self.path.display()
            ))),
        }
    }

    async fn collection(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let mut map = self.load().await?;
        match map.remove(collection) {
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(StoreError::Malformed(format!(
                "collection '{}' is not an array",
                collection
            ))),
            None => Err(StoreError::UnknownCollection(collection.to_string())),
        }
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    fn kind(&self) -> &str {
        "file"
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        self.collection(collection).await
    }

    async fn fetch_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let records = self.collection(collection).await?;
        Ok(records.into_iter().find(|r| record_id(r) == Some(id)))
    }
}
