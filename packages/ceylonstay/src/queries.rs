//! Listing query actions.
//!
//! Read path for the visitor-facing catalog: fetch raw records, normalize,
//! drop delisted entries, and order by availability with move-in-ready
//! listings first.

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::error::Result;
use crate::store::ListingStore;
use crate::traits::{BlobStore, DocumentStore, RawDocument};
use crate::types::Listing;

/// The visitor-facing catalog, in display order.
///
/// Delisted records are removed; available-now listings come first (keeping
/// their input order), then future-dated listings by move-in date ascending.
pub async fn visible_listings<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
) -> Result<Vec<Listing>> {
    let raw = store.fetch_all().await?;
    let listings = process_listings(&raw, Utc::now().date_naive());
    debug!(
        total = raw.len(),
        visible = listings.len(),
        "assembled visible catalog"
    );
    Ok(listings)
}

/// One normalized listing for the management form, or `None` if absent.
pub async fn listing_by_id<D: DocumentStore, B: BlobStore>(
    store: &ListingStore<D, B>,
    id: &str,
) -> Result<Option<Listing>> {
    let doc = store.fetch_one(id).await?;
    Ok(doc.map(|doc| Listing::from_document(&doc, Utc::now().date_naive())))
}

/// Pure core of the read path, split from I/O so the ordering rules are
/// testable with pinned dates.
pub fn process_listings(raw: &[RawDocument], today: NaiveDate) -> Vec<Listing> {
    let mut listings: Vec<Listing> = raw
        .iter()
        .map(|doc| Listing::from_document(doc, today))
        .filter(|listing| listing.is_listed)
        .collect();

    // Stable sort: available-now entries keep their input order
    listings.sort_by_key(|listing| listing.availability.sort_key());
    listings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as JsonValue};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    fn doc(id: &str, data: JsonValue) -> RawDocument {
        RawDocument {
            id: id.to_string(),
            data,
        }
    }

    #[test]
    fn test_delisted_records_are_excluded_and_now_sorts_first() {
        let raw = vec![
            doc("1", json!({ "isListed": false })),
            doc("2", json!({ "availableDate": "now" })),
            doc("3", json!({ "availableDate": "2099-01-01" })),
        ];

        let listings = process_listings(&raw, today());
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_every_listed_record_appears_exactly_once() {
        let raw = vec![
            doc("a", json!({ "availableDate": "2099-06-01" })),
            doc("b", json!({})),
            doc("c", json!({ "isListed": true, "availableDate": "banana" })),
        ];

        let listings = process_listings(&raw, today());
        let mut ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_available_now_entries_keep_input_order() {
        let raw = vec![
            doc("first", json!({ "availableDate": "now" })),
            doc("second", json!({ "availableDate": "2020-01-01" })),
            doc("third", json!({ "availableDate": "banana" })),
        ];

        let listings = process_listings(&raw, today());
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_future_dates_sort_ascending_after_all_now_entries() {
        let raw = vec![
            doc("december", json!({ "availableDate": "2026-12-01" })),
            doc("september", json!({ "availableDate": "2026-09-01" })),
            doc("ready", json!({ "availableDate": "now" })),
        ];

        let listings = process_listings(&raw, today());
        let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["ready", "september", "december"]);
    }

    #[test]
    fn test_unparseable_date_is_treated_as_available_now() {
        let raw = vec![
            doc("future", json!({ "availableDate": "2026-09-01" })),
            doc("garbled", json!({ "availableDate": "banana" })),
        ];

        let listings = process_listings(&raw, today());
        assert_eq!(listings[0].id, "garbled");
        assert_eq!(listings[1].id, "future");
    }
}
