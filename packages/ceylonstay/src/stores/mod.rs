//! Backend implementations of the store traits.

pub mod firebase;

pub use firebase::{listing_store, FirebaseListingStore};
