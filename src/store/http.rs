//! REST [`DocumentStore`] for the hosted content store.
//!
//! | Call | Request | Response |
//! |------|---------|----------|
//! | `fetch_all` | `GET {base}/collections/{c}/items` | `{ "items": [...] }` |
//! | `fetch_one` | `GET {base}/collections/{c}/items/{id}` | `{ "item": {...} }` or 404 |
//!
//! Any other non-2xx status becomes [`StoreError::Remote`]. No retries:
//! one request per call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::warn;

use super::memory::record_id;
use super::DocumentStore;
use crate::error::{StoreError, StoreResult};

pub struct HttpStore {
    base_url: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpStore {
    /// `timeout_secs = None` leaves the transport default in place.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout_secs: Option<u64>,
    ) -> StoreResult<Self> {
        let raw = base_url.into();
        let base_url =
            Url::parse(&raw).map_err(|e| StoreError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(raw));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            base_url,
            token,
            client: builder.build()?,
        })
    }

    /// `{base}/collections/{collection}/items[/{id}]`. Collection and id are
    /// each encoded as exactly one path segment.
    fn items_url(&self, collection: &str, id: Option<&str>) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .push("collections")
                .push(collection)
                .push("items");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> StoreResult<reqwest::Response> {
        let mut req = self.client.get(url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        Ok(req.send().await?)
    }
}

async fn remote_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!(status, "content store returned an error");
    StoreError::Remote { status, body }
}

async fn read_json(response: reqwest::Response) -> StoreResult<Value> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| StoreError::Malformed(e.to_string()))
}

#[async_trait]
impl DocumentStore for HttpStore {
    fn kind(&self) -> &str {
        "http"
    }

    async fn fetch_all(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let response = self.get(self.items_url(collection, None)?).await?;
        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }
        match read_json(response).await? {
            Value::Object(mut body) => match body.remove("items") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(StoreError::Malformed(
                    "response has no \"items\" array".to_string(),
                )),
            },
            _ => Err(StoreError::Malformed("response is not an object".to_string())),
        }
    }

    async fn fetch_one(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let response = self.get(self.items_url(collection, Some(id))?).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }
        match read_json(response).await? {
            Value::Object(mut body) => match body.remove("item") {
                Some(Value::Null) | None => Ok(None),
                Some(item) => match record_id(&item) {
                    Some(found) if found != id => {
                        warn!(
                            collection,
                            requested = id,
                            found,
                            "store returned a different record"
                        );
                        Ok(None)
                    }
                    _ => Ok(Some(item)),
                },
            },
            _ => Err(StoreError::Malformed("response is not an object".to_string())),
        }
    }
}
