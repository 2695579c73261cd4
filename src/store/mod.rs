//! Generic read access to the remote content store.
//!
//! The [`DocumentStore`] trait is the transport seam: a backend returns raw
//! JSON records for a collection. [`DataService`] sits on top and decodes
//! those records into any entity type, so one service serves every
//! collection on the site.
//!
//! # Backends
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`HttpStore`] | REST API of the hosted store |
//! | [`FileStore`] | JSON fixture on disk (offline / local preview) |
//! | [`MemoryStore`] | tests and embedding |
//!
//! Every call performs exactly one backend round trip. There is no caching,
//! retry, or pagination: callers that need a subset slice the full result.
//!
//! ```rust
//! # use digital_hub::store::{DataService, MemoryStore};
//! # use digital_hub::models::Faq;
//! # async fn demo() -> digital_hub::error::StoreResult<()> {
//! let store = MemoryStore::new();
//! store.insert("faqs", serde_json::json!({ "_id": "f1", "question": "Pricing?" }));
//! let service = DataService::new(store);
//! let page = service.get_all::<Faq>("faqs").await?;
//! assert_eq!(page.items.len(), 1);
//! # Ok(())
//! # }
//! ```

mod file;
mod http;
mod memory;

pub use file::FileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::models::Entity;

/// Raw record access for one storage backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend label for logs (e.g. `"http"`).
    fn kind(&self) -> &str;

    /// All records of `collection`, in the order the backend returns them.
    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// One record by id, or `Ok(None)` when the id is absent.
    async fn fetch_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn kind(&self) -> &str {
        (**self).kind()
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        (**self).fetch_all(collection).await
    }

    async fn fetch_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        (**self).fetch_one(collection, id).await
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn kind(&self) -> &str {
        (**self).kind()
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        (**self).fetch_all(collection).await
    }

    async fn fetch_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        (**self).fetch_one(collection, id).await
    }
}

/// Result of a full-collection fetch.
#[derive(Debug, Clone, Serialize)]
pub struct ItemsPage<T> {
    pub items: Vec<T>,
}

impl<T> ItemsPage<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Typed CRUD reads over any [`DocumentStore`].
pub struct DataService<S> {
    store: S,
}

impl<S: DocumentStore> DataService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch every record of `collection`, decoded as `T`.
    ///
    /// Order is whatever the backend returns. A record that does not decode
    /// as `T` fails the whole call.
    pub async fn get_all<T: DeserializeOwned>(&self, collection: &str) -> StoreResult<ItemsPage<T>> {
        debug!(backend = self.store.kind(), collection, "fetching collection");
        let raw = self.store.fetch_all(collection).await?;
        let items = raw
            .into_iter()
            .map(|value| decode(collection, value))
            .collect::<StoreResult<Vec<T>>>()?;
        debug!(collection, count = items.len(), "collection fetched");
        Ok(ItemsPage { items })
    }

    /// Fetch one record by id, decoded as `T`.
    ///
    /// Fails with [`StoreError::NotFound`] when the id is absent.
    pub async fn get_by_id<T: DeserializeOwned>(&self, collection: &str, id: &str) -> StoreResult<T> {
        debug!(backend = self.store.kind(), collection, id, "fetching record");
        match self.store.fetch_one(collection, id).await? {
            Some(value) => decode(collection, value),
            None => Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
        }
    }

    /// [`get_all`](Self::get_all) against the entity's own collection.
    pub async fn get_all_of<T: Entity>(&self) -> StoreResult<ItemsPage<T>> {
        self.get_all(T::COLLECTION).await
    }

    /// [`get_by_id`](Self::get_by_id) against the entity's own collection.
    pub async fn get_by_id_of<T: Entity>(&self, id: &str) -> StoreResult<T> {
        self.get_by_id(T::COLLECTION, id).await
    }
}

fn decode<T: DeserializeOwned>(collection: &str, value: Value) -> StoreResult<T> {
    serde_json::from_value(value).map_err(|source| StoreError::Decode {
        collection: collection.to_string(),
        source,
    })
}

/// Build the backend selected by `store.provider`.
pub fn create_store(config: &StoreConfig) -> anyhow::Result<Box<dyn DocumentStore>> {
    match config.provider.as_str() {
        "http" => {
            let base_url = config
                .base_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("store.base_url required for http provider"))?;
            let token = match &config.api_key_env {
                Some(var) => Some(
                    std::env::var(var)
                        .map_err(|_| anyhow::anyhow!("{} environment variable not set", var))?,
                ),
                None => None,
            };
            Ok(Box::new(HttpStore::new(base_url, token, config.timeout_secs)?))
        }
        "file" => {
            let path = config
                .path
                .clone()
                .ok_or_else(|| anyhow::anyhow!("store.path required for file provider"))?;
            Ok(Box::new(FileStore::new(path)))
        }
        other => anyhow::bail!("Unknown store provider: {}", other),
    }
}
