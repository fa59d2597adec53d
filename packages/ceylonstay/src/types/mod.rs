//! Typed domain model for listings.

pub mod availability;
pub mod listing;
pub mod photo;

pub use availability::Availability;
pub use listing::{Listing, Price};
pub use photo::Photo;
