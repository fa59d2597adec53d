//! CeylonStay listings core.
//!
//! Data-access library for the CeylonStay rental catalog: a store client
//! over a remote document collection and object store, a short-lived
//! snapshot cache on reads, the visitor-facing read path (normalize,
//! drop delisted records, order by availability), and the operator
//! command set (create listings with their photos, edit fields, toggle
//! visibility, manage the photo sequence).
//!
//! # Usage
//!
//! ```rust,ignore
//! use ceylonstay::{queries, stores, Config};
//!
//! let config = Config::from_env()?;
//! let store = stores::firebase::listing_store(&config);
//!
//! for listing in queries::visible_listings(&store).await? {
//!     println!("{} - {}", listing.title, listing.location);
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Typed domain model and the normalization boundary
//! - [`traits`] - Backend seams (`DocumentStore`, `BlobStore`)
//! - [`store`] - The listing store client with its snapshot cache
//! - [`queries`] - Visitor-facing read path
//! - [`commands`] - Operator mutations
//! - [`stores`] - Firebase-backed trait implementations
//! - [`testing`] - In-memory mocks for exercising flows offline

pub mod cache;
pub mod commands;
pub mod config;
pub mod error;
pub mod queries;
pub mod store;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod whatsapp;

pub use cache::{Clock, ManualClock, SnapshotCache, SystemClock};
pub use config::Config;
pub use error::{Result, StoreError, ValidationError};
pub use store::ListingStore;
pub use traits::{BlobStore, DocumentStore, RawDocument, StoredBlob};
pub use types::{Availability, Listing, Photo, Price};
