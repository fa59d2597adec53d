//! Listing store client.
//!
//! Mediates every read and write between the application and the remote
//! document collection and object store: cached collection reads, point
//! reads, merge updates, photo blob uploads (with the backend's bounded
//! retry behind the trait), and best-effort blob deletion.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::SnapshotCache;
use crate::error::Result;
use crate::traits::{BlobStore, DocumentStore, RawDocument};
use crate::types::Photo;

/// Default validity window for collection snapshots.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Store client for one listings collection.
pub struct ListingStore<D, B> {
    documents: D,
    blobs: B,
    collection: String,
    cache: SnapshotCache<Vec<RawDocument>>,
}

impl<D: DocumentStore, B: BlobStore> ListingStore<D, B> {
    /// A store with the default 30-second snapshot cache.
    pub fn new(documents: D, blobs: B, collection: impl Into<String>) -> Self {
        Self::with_cache(
            documents,
            blobs,
            collection,
            SnapshotCache::new(DEFAULT_CACHE_TTL),
        )
    }

    /// A store with a caller-provided cache (custom TTL or test clock).
    pub fn with_cache(
        documents: D,
        blobs: B,
        collection: impl Into<String>,
        cache: SnapshotCache<Vec<RawDocument>>,
    ) -> Self {
        Self {
            documents,
            blobs,
            collection: collection.into(),
            cache,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn cache(&self) -> &SnapshotCache<Vec<RawDocument>> {
        &self.cache
    }

    /// Insert a new record and return its server-assigned id.
    pub async fn create(&self, data: &JsonValue) -> Result<String> {
        let id = self.documents.create(&self.collection, data).await?;
        info!(collection = %self.collection, %id, "record created");
        Ok(id)
    }

    /// Fetch one record by id. Never served from the cache.
    pub async fn fetch_one(&self, id: &str) -> Result<Option<RawDocument>> {
        self.documents.get(&self.collection, id).await
    }

    /// Fetch every record in the collection.
    ///
    /// A snapshot stored within the validity window is returned as-is and
    /// does not reflect writes made since; otherwise the collection is
    /// fetched live and the result stored under the collection name.
    pub async fn fetch_all(&self) -> Result<Vec<RawDocument>> {
        if let Some(snapshot) = self.cache.get(&self.collection) {
            debug!(collection = %self.collection, count = snapshot.len(), "serving cached snapshot");
            return Ok(snapshot);
        }

        let records = self.documents.list(&self.collection).await?;
        self.cache.put(&self.collection, records.clone());
        debug!(collection = %self.collection, count = records.len(), "fetched live snapshot");
        Ok(records)
    }

    /// Merge the given fields into an existing record. The snapshot cache
    /// is left untouched; readers may see stale data for up to the TTL.
    pub async fn update(&self, id: &str, patch: &JsonValue) -> Result<()> {
        self.documents.update(&self.collection, id, patch).await?;
        info!(collection = %self.collection, %id, "record updated");
        Ok(())
    }

    /// Remove a record. The snapshot cache is left untouched.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.documents.delete(&self.collection, id).await?;
        info!(collection = %self.collection, %id, "record deleted");
        Ok(())
    }

    /// Upload one photo blob and describe it as a [`Photo`] with a fresh
    /// id, the resolvable URL, and initial order 0. The blob store signs in
    /// anonymously when needed and retries transient failures before the
    /// returned error is terminal.
    pub async fn upload_photo(&self, bytes: Vec<u8>, content_type: &str) -> Result<Photo> {
        let path = photo_object_name(content_type);
        let blob = self.blobs.upload(&path, bytes, content_type).await?;

        Ok(Photo {
            id: Uuid::new_v4().to_string(),
            url: blob.url,
            path: blob.path,
            uploaded_at: blob.uploaded_at,
            order: 0,
        })
    }

    /// Remove a photo blob, best-effort: a failure is logged and swallowed
    /// so the record-level removal can proceed regardless.
    pub async fn delete_photo_blob(&self, path: &str) {
        if path.is_empty() {
            // Legacy photo entries carry no storage path
            return;
        }
        if let Err(err) = self.blobs.delete(path).await {
            warn!(path, error = %err, "failed to delete photo object, leaving it orphaned");
        }
    }
}

/// Storage object name for a new photo: `listings/{millis}-{fragment}.{ext}`.
fn photo_object_name(content_type: &str) -> String {
    let extension = match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    };
    let fragment = Uuid::new_v4().simple().to_string();
    format!(
        "listings/{}-{}.{}",
        Utc::now().timestamp_millis(),
        &fragment[..8],
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_object_names_are_unique_and_extension_tagged() {
        let a = photo_object_name("image/png");
        let b = photo_object_name("image/png");

        assert!(a.starts_with("listings/"));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);

        assert!(photo_object_name("image/jpeg").ends_with(".jpg"));
        assert!(photo_object_name("application/octet-stream").ends_with(".jpg"));
    }
}
