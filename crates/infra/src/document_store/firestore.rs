//! Firestore REST (v1) document store adapter.
//!
//! Talks to `{base_url}/v1/projects/{project}/databases/{database}/documents`.
//! Pointing `base_url` at a local emulator (`http://localhost:8080`) works
//! without a token.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list   | `GET  documents/{collection}?pageSize=..&pageToken=..` (follows pages) |
//! | get    | `GET  documents/{collection}/{key}` (404 → `None`) |
//! | upsert | `PATCH documents/{collection}/{key}` with the full `fields` map |
//! | delete | `DELETE documents/{collection}/{key}` |

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::instrument;

use super::firestore_value::{decode_fields, encode_fields, key_from_resource_name};
use super::r#trait::{Document, DocumentStore, StoreError, StoredDocument};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
pub const DEFAULT_DATABASE: &str = "(default)";

#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub database: String,
    pub base_url: String,
    /// OAuth bearer token; `None` for the emulator.
    pub token: Option<String>,
    pub timeout: Duration,
    pub page_size: u32,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(10),
            page_size: 300,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    fields: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}

/// Document store backed by Cloud Firestore's REST API.
#[derive(Debug, Clone)]
pub struct FirestoreDocumentStore {
    client: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreDocumentStore {
    pub fn new(config: FirestoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn documents_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| StoreError::Unavailable(format!("invalid firestore base url: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| {
                StoreError::Unavailable("firestore base url cannot hold a path".to_string())
            })?;
            path.pop_if_empty();
            path.extend([
                "v1",
                "projects",
                self.config.project_id.as_str(),
                "databases",
                self.config.database.as_str(),
                "documents",
            ]);
            // Each segment is percent-encoded, so keys with spaces or '%' are safe.
            path.extend(segments.iter().copied());
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.client.request(method, url);
        match &self.config.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, operation: &str, req: RequestBuilder) -> Result<Response, StoreError> {
        req.send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{operation}: {e}")))
    }
}

/// Decode one listing page, skipping documents that cannot be read.
fn stored_documents(documents: Vec<FirestoreDocument>) -> Vec<StoredDocument> {
    let mut docs = Vec::with_capacity(documents.len());
    for doc in documents {
        let Some(key) = key_from_resource_name(&doc.name) else {
            tracing::warn!(name = %doc.name, "skipping document without a key");
            continue;
        };
        match decode_fields(doc.fields.as_ref()) {
            Ok(body) => docs.push(StoredDocument::new(key, body)),
            Err(e) => tracing::warn!(key, "skipping undecodable document: {e}"),
        }
    }
    docs
}

/// Turn a non-success response into a `StoreError`.
async fn rejection(operation: &str, resp: Response) -> StoreError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&text) {
        Ok(env) => (
            env.error.status.unwrap_or_else(|| status.as_u16().to_string()),
            env.error.message,
        ),
        Err(_) => (status.as_u16().to_string(), text),
    };

    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        StoreError::Unavailable(format!("{operation}: {code}: {message}"))
    } else {
        StoreError::rejected(code, format!("{operation}: {message}"))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreDocumentStore {
    #[instrument(skip(self), fields(store = "firestore"))]
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.documents_url(&[collection])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", &self.config.page_size.to_string());
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let resp = self.send("list", self.request(Method::GET, url)).await?;
            if !resp.status().is_success() {
                return Err(rejection("list", resp).await);
            }
            let page: ListDocumentsResponse = resp
                .json()
                .await
                .map_err(|e| StoreError::Decode(format!("list response: {e}")))?;

            docs.extend(stored_documents(page.documents));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(count = docs.len(), "listed firestore collection");
        Ok(docs)
    }

    #[instrument(skip(self), fields(store = "firestore"))]
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        let url = self.documents_url(&[collection, key])?;
        let resp = self.send("get", self.request(Method::GET, url)).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(rejection("get", resp).await);
        }

        let doc: FirestoreDocument = resp
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("get response: {e}")))?;
        decode_fields(doc.fields.as_ref()).map(Some)
    }

    #[instrument(skip(self, body), fields(store = "firestore"))]
    async fn upsert(&self, collection: &str, key: &str, body: Document) -> Result<(), StoreError> {
        let url = self.documents_url(&[collection, key])?;
        let payload = serde_json::json!({ "fields": encode_fields(&body) });
        let resp = self
            .send("upsert", self.request(Method::PATCH, url).json(&payload))
            .await?;

        if !resp.status().is_success() {
            return Err(rejection("upsert", resp).await);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(store = "firestore"))]
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let url = self.documents_url(&[collection, key])?;
        let resp = self.send("delete", self.request(Method::DELETE, url)).await?;

        if resp.status().is_success() || resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(rejection("delete", resp).await)
    }
}
