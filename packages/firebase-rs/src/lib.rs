//! Pure Firebase REST API client.
//!
//! Minimal clients for the Firebase services CeylonStay relies on:
//! anonymous authentication (Identity Toolkit), Cloud Firestore documents,
//! and Cloud Storage objects. Talks to the public REST endpoints directly,
//! no official SDK involved.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use firebase::{AuthClient, FirestoreClient, StorageClient};
//!
//! let auth = Arc::new(AuthClient::new("api-key"));
//! let firestore = FirestoreClient::new("my-project");
//! let storage = StorageClient::new("my-project.appspot.com", auth);
//!
//! let docs = firestore.list_documents("ceylonstays").await?;
//! let object = storage.upload("listings/cover.jpg", bytes, "image/jpeg").await?;
//! ```

pub mod auth;
pub mod error;
pub mod firestore;
pub mod storage;
pub mod types;

pub use auth::{AuthClient, Session};
pub use error::{FirebaseError, Result};
pub use firestore::{Document, FirestoreClient};
pub use storage::{StorageClient, UploadedObject};

/// Connection settings for one Firebase project.
#[derive(Debug, Clone)]
pub struct FirebaseOptions {
    pub api_key: String,
    pub project_id: String,
    pub storage_bucket: String,
}

impl FirebaseOptions {
    /// Read options from `FIREBASE_API_KEY`, `FIREBASE_PROJECT_ID` and
    /// `FIREBASE_STORAGE_BUCKET`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: require_env("FIREBASE_API_KEY")?,
            project_id: require_env("FIREBASE_PROJECT_ID")?,
            storage_bucket: require_env("FIREBASE_STORAGE_BUCKET")?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| FirebaseError::Config(format!("{} not set", name)))
}
