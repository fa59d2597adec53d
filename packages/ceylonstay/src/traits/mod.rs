//! Trait seams over the remote backend.
//!
//! The listing store talks to the document collection and the object store
//! only through these traits, so tests can swap in the in-memory
//! implementations from [`crate::testing`].

pub mod store;

pub use store::{BlobStore, DocumentStore, RawDocument, StoredBlob};
