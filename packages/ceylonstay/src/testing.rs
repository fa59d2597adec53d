//! Testing utilities including in-memory store implementations.
//!
//! These are useful for exercising the read path and the operator commands
//! without a Firebase project: deterministic ids, recorded calls for
//! assertions, and injectable failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use crate::error::{Result, StoreError};
use crate::traits::{BlobStore, DocumentStore, RawDocument, StoredBlob};

/// Record of a call made to [`MemoryDocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCall {
    Create { collection: String },
    Get { collection: String, id: String },
    List { collection: String },
    Update { collection: String, id: String },
    Delete { collection: String, id: String },
}

/// In-memory document collection with server-assigned ids and merge
/// updates, preserving insertion order on list.
///
/// Clones share state, so a test can keep a handle for assertions after
/// moving one into a store.
#[derive(Default, Clone)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<RawDocument>>>>,
    next_id: Arc<AtomicU64>,
    calls: Arc<RwLock<Vec<DocumentCall>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one document with a fixed id.
    pub fn with_document(
        self,
        collection: impl Into<String>,
        id: impl Into<String>,
        data: JsonValue,
    ) -> Self {
        self.collections
            .write()
            .unwrap()
            .entry(collection.into())
            .or_default()
            .push(RawDocument {
                id: id.into(),
                data,
            });
        self
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<DocumentCall> {
        self.calls.read().unwrap().clone()
    }

    /// How many `List` calls hit this store.
    pub fn list_calls(&self, collection: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| {
                matches!(call, DocumentCall::List { collection: c } if c == collection)
            })
            .count()
    }

    /// A stored document, for assertions.
    pub fn document(&self, collection: &str, id: &str) -> Option<RawDocument> {
        self.collections
            .read()
            .unwrap()
            .get(collection)?
            .iter()
            .find(|doc| doc.id == id)
            .cloned()
    }

    /// Number of documents in a collection.
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn record(&self, call: DocumentCall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, collection: &str, data: &JsonValue) -> Result<String> {
        self.record(DocumentCall::Create {
            collection: collection.to_string(),
        });
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.collections
            .write()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(RawDocument {
                id: id.clone(),
                data: data.clone(),
            });
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<RawDocument>> {
        self.record(DocumentCall::Get {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        Ok(self.document(collection, id))
    }

    async fn list(&self, collection: &str) -> Result<Vec<RawDocument>> {
        self.record(DocumentCall::List {
            collection: collection.to_string(),
        });
        Ok(self
            .collections
            .read()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn update(&self, collection: &str, id: &str, patch: &JsonValue) -> Result<()> {
        self.record(DocumentCall::Update {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        let mut collections = self.collections.write().unwrap();
        let documents = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;
        let document = documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("{collection}/{id}")))?;

        // Top-level merge, like a partial document update
        if let (Some(target), Some(fields)) = (document.data.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.record(DocumentCall::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        let mut collections = self.collections.write().unwrap();
        if let Some(documents) = collections.get_mut(collection) {
            documents.retain(|doc| doc.id != id);
        }
        Ok(())
    }
}

/// Record of a call made to [`MemoryBlobStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobCall {
    Upload { path: String },
    Delete { path: String },
}

/// In-memory object store with injectable failures. Clones share state.
#[derive(Default, Clone)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    calls: Arc<RwLock<Vec<BlobCall>>>,
    failing_uploads: Arc<AtomicU32>,
    failing_deletes: Arc<AtomicBool>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` uploads fail as retry-exhausted transients.
    pub fn fail_next_uploads(&self, count: u32) {
        self.failing_uploads.store(count, Ordering::SeqCst);
    }

    /// Make every delete fail until reset.
    pub fn fail_deletes(&self, failing: bool) {
        self.failing_deletes.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<BlobCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, BlobCall::Upload { .. }))
            .count()
    }

    pub fn object_exists(&self, path: &str) -> bool {
        self.objects.read().unwrap().contains_key(path)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: &str) -> Result<StoredBlob> {
        self.calls.write().unwrap().push(BlobCall::Upload {
            path: path.to_string(),
        });

        let should_fail = self
            .failing_uploads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(StoreError::Transient {
                attempts: 3,
                source: "simulated network failure".into(),
            });
        }

        self.objects
            .write()
            .unwrap()
            .insert(path.to_string(), bytes);
        Ok(StoredBlob {
            path: path.to_string(),
            url: format!("memory://{path}"),
            uploaded_at: fixed_timestamp(),
        })
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.calls.write().unwrap().push(BlobCall::Delete {
            path: path.to_string(),
        });

        if self.failing_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated delete failure".into()));
        }

        self.objects.write().unwrap().remove(path);
        Ok(())
    }
}

fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}
