//! Listing command actions.
//!
//! Operator mutations behind the passcode-gated management surface:
//! create a listing with its photos, edit fields, toggle visibility, and
//! manage the photo sequence. Validation runs before any network call;
//! photo uploads for one submission run concurrently and the submission
//! is all-or-nothing.

use chrono::Utc;
use futures::future::try_join_all;
use serde_json::{json, Map, Value as JsonValue};
use tracing::info;

use crate::error::{Result, StoreError, ValidationError};
use crate::store::ListingStore;
use crate::traits::{BlobStore, DocumentStore};
use crate::types::photo;
use crate::types::{Availability, Listing, Photo, Price};

/// One photo payload selected by the operator.
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Input for a new listing submission.
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub price: Price,
    pub availability: Availability,
    pub photos: Vec<PhotoUpload>,
}

impl NewListing {
    /// Inline checks, reported before anything touches the network.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField { field });
            }
        }
        if self.photos.is_empty() {
            return Err(ValidationError::NoPhotos);
        }
        if self.price.amount() == 0 {
            return Err(ValidationError::ZeroPrice);
        }
        Ok(())
    }
}

/// Create a listing: validate, upload every photo concurrently, then write
/// the record.
///
/// The upload join is all-or-nothing: if any one photo exhausts its retry
/// budget the submission fails and no record is written.
pub async fn submit_listing<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
    input: NewListing,
) -> Result<String> {
    input.validate()?;

    let uploads = input
        .photos
        .iter()
        .map(|payload| store.upload_photo(payload.bytes.clone(), &payload.content_type));
    let mut photos = try_join_all(uploads).await?;
    photo::reindex(&mut photos);

    let listing = Listing {
        id: String::new(),
        title: input.title,
        description: input.description,
        location: input.location,
        bedrooms: input.bedrooms,
        bathrooms: input.bathrooms,
        price: input.price,
        photos,
        is_listed: true,
        created_at: Utc::now(),
        availability: input.availability,
    };

    let id = store.create(&listing.to_document()).await?;
    info!(%id, photos = listing.photos.len(), "listing submitted");
    Ok(id)
}

/// Field edits for an existing listing; unset fields are left untouched.
#[derive(Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub price: Option<Price>,
    pub availability: Option<Availability>,
}

impl ListingPatch {
    /// The merge document for the set fields only.
    pub fn into_document(self) -> JsonValue {
        let mut fields = Map::new();
        if let Some(title) = self.title {
            fields.insert("title".into(), json!(title));
        }
        if let Some(description) = self.description {
            fields.insert("description".into(), json!(description));
        }
        if let Some(location) = self.location {
            fields.insert("location".into(), json!(location));
        }
        if let Some(bedrooms) = self.bedrooms {
            fields.insert("bedrooms".into(), json!(bedrooms));
        }
        if let Some(bathrooms) = self.bathrooms {
            fields.insert("bathrooms".into(), json!(bathrooms));
        }
        if let Some(price) = self.price {
            let (per_night, per_month) = match price {
                Price::PerNight(amount) => (amount, 0),
                Price::PerMonth(amount) => (0, amount),
            };
            fields.insert("pricingType".into(), json!(price.mode()));
            fields.insert("pricePerNight".into(), json!(per_night));
            fields.insert("pricePerMonth".into(), json!(per_month));
        }
        if let Some(availability) = self.availability {
            fields.insert("availableDate".into(), json!(availability.to_wire()));
        }
        JsonValue::Object(fields)
    }
}

/// Merge field edits into an existing listing.
pub async fn update_listing<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
    id: &str,
    patch: ListingPatch,
) -> Result<()> {
    store.update(id, &patch.into_document()).await
}

/// Toggle visitor-facing visibility. Listings are never hard-deleted by
/// operator flows; delisting is the retirement path.
pub async fn set_listed<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
    id: &str,
    listed: bool,
) -> Result<()> {
    store.update(id, &json!({ "isListed": listed })).await?;
    info!(%id, listed, "listing visibility changed");
    Ok(())
}

/// Upload new photos and append them to the listing's sequence.
pub async fn add_photos<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
    id: &str,
    payloads: Vec<PhotoUpload>,
) -> Result<Vec<Photo>> {
    let mut listing = require_listing(store, id).await?;

    let uploads = payloads
        .iter()
        .map(|payload| store.upload_photo(payload.bytes.clone(), &payload.content_type));
    let uploaded = try_join_all(uploads).await?;

    listing.photos.extend(uploaded);
    photo::reindex(&mut listing.photos);
    store
        .update(id, &json!({ "photos": listing.photos }))
        .await?;
    Ok(listing.photos)
}

/// Remove one photo from the listing and reindex the rest.
///
/// The record is written first; deleting the backing storage object is
/// best-effort and never blocks the removal.
pub async fn remove_photo<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
    id: &str,
    photo_id: &str,
) -> Result<Vec<Photo>> {
    let mut listing = require_listing(store, id).await?;

    let position = listing
        .photos
        .iter()
        .position(|photo| photo.id == photo_id)
        .ok_or_else(|| StoreError::NotFound(format!("photo {photo_id}")))?;
    let removed = listing.photos.remove(position);

    photo::reindex(&mut listing.photos);
    store
        .update(id, &json!({ "photos": listing.photos }))
        .await?;

    store.delete_photo_blob(&removed.path).await;
    info!(%id, photo = %photo_id, "photo removed");
    Ok(listing.photos)
}

/// Apply a drag-and-drop permutation to the photo sequence.
///
/// `ordered_ids` must name every current photo exactly once; the rewritten
/// sequence gets contiguous order values `0..N-1`.
pub async fn reorder_photos<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
    id: &str,
    ordered_ids: &[String],
) -> Result<Vec<Photo>> {
    let mut listing = require_listing(store, id).await?;

    if ordered_ids.len() != listing.photos.len() {
        return Err(ValidationError::IncompletePhotoOrder.into());
    }

    let mut reordered = Vec::with_capacity(ordered_ids.len());
    for photo_id in ordered_ids {
        let position = listing
            .photos
            .iter()
            .position(|photo| &photo.id == photo_id)
            .ok_or_else(|| ValidationError::UnknownPhoto {
                id: photo_id.clone(),
            })?;
        reordered.push(listing.photos.remove(position));
    }

    photo::reindex(&mut reordered);
    store.update(id, &json!({ "photos": reordered })).await?;
    Ok(reordered)
}

async fn require_listing<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
    id: &str,
) -> Result<Listing> {
    let doc = store
        .fetch_one(id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("listing {id}")))?;
    Ok(Listing::from_document(&doc, Utc::now().date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewListing {
        NewListing {
            title: "Beach Villa".into(),
            description: "Two bedrooms near the beach".into(),
            location: "Unawatuna".into(),
            bedrooms: 2,
            bathrooms: 1,
            price: Price::PerNight(120),
            availability: Availability::Now,
            photos: vec![PhotoUpload {
                bytes: vec![1, 2, 3],
                content_type: "image/jpeg".into(),
            }],
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert_eq!(valid_input().validate(), Ok(()));
    }

    #[test]
    fn test_blank_required_fields_are_rejected() {
        let mut input = valid_input();
        input.title = "  ".into();
        assert_eq!(
            input.validate(),
            Err(ValidationError::MissingField { field: "title" })
        );

        let mut input = valid_input();
        input.location = String::new();
        assert_eq!(
            input.validate(),
            Err(ValidationError::MissingField { field: "location" })
        );
    }

    #[test]
    fn test_at_least_one_photo_is_required() {
        let mut input = valid_input();
        input.photos.clear();
        assert_eq!(input.validate(), Err(ValidationError::NoPhotos));
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let mut input = valid_input();
        input.price = Price::PerMonth(0);
        assert_eq!(input.validate(), Err(ValidationError::ZeroPrice));
    }

    #[test]
    fn test_patch_document_contains_only_set_fields() {
        let patch = ListingPatch {
            title: Some("New title".into()),
            price: Some(Price::PerMonth(900)),
            ..Default::default()
        };

        let document = patch.into_document();
        let object = document.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(object["title"], json!("New title"));
        assert_eq!(object["pricingType"], json!("month"));
        assert_eq!(object["pricePerMonth"], json!(900));
        assert_eq!(object["pricePerNight"], json!(0));
    }

    #[test]
    fn test_empty_patch_produces_empty_document() {
        let document = ListingPatch::default().into_document();
        assert!(document.as_object().unwrap().is_empty());
    }
}
