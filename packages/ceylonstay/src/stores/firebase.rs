//! Firebase-backed implementations of the store traits.
//!
//! Maps the `firebase` crate's error taxonomy into the core one so callers
//! never see backend-specific types.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use firebase::{AuthClient, FirebaseError, FirestoreClient, StorageClient};

use crate::cache::SnapshotCache;
use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::store::ListingStore;
use crate::traits::{BlobStore, DocumentStore, RawDocument, StoredBlob};

/// The production store type.
pub type FirebaseListingStore = ListingStore<FirestoreClient, StorageClient>;

/// Wire a listing store from configuration: Firestore documents, Storage
/// blobs behind a shared anonymous-auth client, and a snapshot cache with
/// the configured TTL.
pub fn listing_store(config: &Config) -> FirebaseListingStore {
    let auth = Arc::new(AuthClient::new(config.firebase_api_key.clone()));
    let documents = FirestoreClient::new(config.firebase_project_id.clone());
    let blobs = StorageClient::new(config.firebase_storage_bucket.clone(), auth);

    ListingStore::with_cache(
        documents,
        blobs,
        config.listings_collection.clone(),
        SnapshotCache::new(Duration::from_secs(config.cache_ttl_secs)),
    )
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn create(&self, collection: &str, data: &JsonValue) -> Result<String> {
        let document = self
            .create_document(collection, data)
            .await
            .map_err(map_err)?;
        Ok(document.id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDocument>> {
        let document = self.get_document(collection, id).await.map_err(map_err)?;
        Ok(document.map(|doc| RawDocument {
            id: doc.id,
            data: doc.data,
        }))
    }

    async fn list(&self, collection: &str) -> Result<Vec<RawDocument>> {
        let documents = self.list_documents(collection).await.map_err(map_err)?;
        Ok(documents
            .into_iter()
            .map(|doc| RawDocument {
                id: doc.id,
                data: doc.data,
            })
            .collect())
    }

    async fn update(&self, collection: &str, id: &str, patch: &JsonValue) -> Result<()> {
        self.patch_document(collection, id, patch)
            .await
            .map_err(map_err)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.delete_document(collection, id).await.map_err(map_err)
    }
}

#[async_trait]
impl BlobStore for StorageClient {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<StoredBlob> {
        let object = StorageClient::upload(self, path, bytes, content_type)
            .await
            .map_err(map_err)?;
        Ok(StoredBlob {
            path: object.path,
            url: object.url,
            uploaded_at: object.uploaded_at,
        })
    }

    async fn delete(&self, path: &str) -> Result<()> {
        StorageClient::delete(self, path).await.map_err(map_err)
    }
}

fn map_err(err: FirebaseError) -> StoreError {
    match err {
        FirebaseError::AuthFailed(reason) => StoreError::AuthRequired(reason),
        FirebaseError::PermissionDenied { resource } => StoreError::PermissionDenied(resource),
        FirebaseError::NotFound { resource } => StoreError::NotFound(resource),
        FirebaseError::RetriesExhausted { attempts, source } => StoreError::Transient {
            attempts,
            source: Box::new(*source),
        },
        other => StoreError::Backend(Box::new(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_exhaustion_maps_to_transient() {
        let err = map_err(FirebaseError::RetriesExhausted {
            attempts: 3,
            source: Box::new(FirebaseError::Api {
                status: 503,
                resource: "objects/x".into(),
            }),
        });

        match err {
            StoreError::Transient { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_policy_failures_map_one_to_one() {
        assert!(matches!(
            map_err(FirebaseError::AuthFailed("rejected".into())),
            StoreError::AuthRequired(_)
        ));
        assert!(matches!(
            map_err(FirebaseError::PermissionDenied { resource: "x".into() }),
            StoreError::PermissionDenied(_)
        ));
        assert!(matches!(
            map_err(FirebaseError::NotFound { resource: "x".into() }),
            StoreError::NotFound(_)
        ));
    }
}
