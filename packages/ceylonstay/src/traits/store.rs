//! Backend storage traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::error::Result;

/// One raw, untyped record from the document collection.
///
/// Shapes vary across record generations; [`crate::types::Listing`] is the
/// single place defaults are applied.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub data: JsonValue,
}

/// A blob accepted by the object store.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    /// Object name inside the bucket, kept for later deletion.
    pub path: String,
    /// Resolvable download URL.
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Remote document collection with server-assigned ids and partial-update
/// merge semantics.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a record and return its server-assigned id.
    async fn create(&self, collection: &str, data: &JsonValue) -> Result<String>;

    /// Fetch one record, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDocument>>;

    /// Fetch every record in the collection.
    async fn list(&self, collection: &str) -> Result<Vec<RawDocument>>;

    /// Merge the given top-level fields into an existing record.
    async fn update(&self, collection: &str, id: &str, patch: &JsonValue) -> Result<()>;

    /// Remove a record.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

/// Remote object store for listing photos.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a blob under `path`. Implementations handle authentication
    /// and bounded retries; a returned error is terminal.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredBlob>;

    /// Remove a blob. Errors propagate; callers decide whether a failed
    /// delete is fatal.
    async fn delete(&self, path: &str) -> Result<()>;
}
