//! Listing model and the normalization boundary over raw records.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value as JsonValue};

use crate::traits::RawDocument;
use crate::types::photo;
use crate::types::{Availability, Photo};

/// Listing price: exactly one amount is meaningful, selected by the
/// pricing mode. The wire form keeps both numeric fields with the inactive
/// one zero, matching the stored record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Price {
    PerNight(u64),
    PerMonth(u64),
}

impl Price {
    pub fn amount(self) -> u64 {
        match self {
            Self::PerNight(amount) | Self::PerMonth(amount) => amount,
        }
    }

    /// The stored `pricingType` tag.
    pub fn mode(self) -> &'static str {
        match self {
            Self::PerNight(_) => "night",
            Self::PerMonth(_) => "month",
        }
    }
}

/// A rental property record, display-ready.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub price: Price,
    pub photos: Vec<Photo>,
    /// Delisted records stay in storage but never reach visitors.
    pub is_listed: bool,
    pub created_at: DateTime<Utc>,
    pub availability: Availability,
}

impl Listing {
    /// Build a display-ready listing from one raw record.
    ///
    /// This is the only place defaults are applied: missing text fields
    /// become empty strings, missing counts zero, a missing photo sequence
    /// empty, a missing listed flag `true`, and a missing or invalid
    /// availability "now". Photo entries are widened via
    /// [`Photo::from_value`] and reindexed to a contiguous order.
    pub fn from_document(doc: &RawDocument, today: NaiveDate) -> Self {
        let data = &doc.data;

        let pricing_type = str_field(data, "pricingType").unwrap_or("night");
        let price = if pricing_type == "month" {
            Price::PerMonth(u64_field(data, "pricePerMonth"))
        } else {
            Price::PerNight(u64_field(data, "pricePerNight"))
        };

        let mut photos: Vec<Photo> = data
            .get("photos")
            .and_then(JsonValue::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .enumerate()
                    .filter_map(|(index, entry)| Photo::from_value(entry, index))
                    .collect()
            })
            .unwrap_or_default();
        photos.sort_by_key(|p| p.order);
        photo::reindex(&mut photos);

        Self {
            id: doc.id.clone(),
            title: str_field(data, "title").unwrap_or_default().to_string(),
            description: str_field(data, "description")
                .unwrap_or_default()
                .to_string(),
            location: str_field(data, "location").unwrap_or_default().to_string(),
            bedrooms: u32_field(data, "bedrooms"),
            bathrooms: u32_field(data, "bathrooms"),
            price,
            photos,
            is_listed: data
                .get("isListed")
                .and_then(JsonValue::as_bool)
                .unwrap_or(true),
            created_at: str_field(data, "createdAt")
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            availability: Availability::parse(
                str_field(data, "availableDate").unwrap_or("now"),
                today,
            ),
        }
    }

    /// The stored record shape, without the id.
    pub fn to_document(&self) -> JsonValue {
        let (per_night, per_month) = match self.price {
            Price::PerNight(amount) => (amount, 0),
            Price::PerMonth(amount) => (0, amount),
        };

        json!({
            "title": self.title,
            "description": self.description,
            "location": self.location,
            "bedrooms": self.bedrooms,
            "bathrooms": self.bathrooms,
            "pricingType": self.price.mode(),
            "pricePerNight": per_night,
            "pricePerMonth": per_month,
            "photos": self.photos,
            "isListed": self.is_listed,
            "createdAt": self.created_at.to_rfc3339(),
            "availableDate": self.availability.to_wire(),
        })
    }
}

fn str_field<'a>(data: &'a JsonValue, key: &str) -> Option<&'a str> {
    data.get(key).and_then(JsonValue::as_str)
}

fn u64_field(data: &JsonValue, key: &str) -> u64 {
    // Numeric fields occasionally arrive as doubles from older writers
    data.get(key)
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
        .unwrap_or(0)
}

fn u32_field(data: &JsonValue, key: &str) -> u32 {
    u64_field(data, key) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

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
    fn test_empty_record_gets_every_default() {
        let listing = Listing::from_document(&doc("l1", json!({})), today());

        assert_eq!(listing.id, "l1");
        assert_eq!(listing.title, "");
        assert_eq!(listing.location, "");
        assert_eq!(listing.bedrooms, 0);
        assert_eq!(listing.bathrooms, 0);
        assert_eq!(listing.price, Price::PerNight(0));
        assert!(listing.photos.is_empty());
        assert!(listing.is_listed);
        assert_eq!(listing.availability, Availability::Now);
    }

    #[test]
    fn test_monthly_pricing_reads_the_month_field() {
        let listing = Listing::from_document(
            &doc(
                "l1",
                json!({
                    "pricingType": "month",
                    "pricePerMonth": 1200,
                    "pricePerNight": 45,
                }),
            ),
            today(),
        );

        assert_eq!(listing.price, Price::PerMonth(1200));
    }

    #[test]
    fn test_explicitly_delisted_flag_is_kept() {
        let listing =
            Listing::from_document(&doc("l1", json!({ "isListed": false })), today());
        assert!(!listing.is_listed);
    }

    #[test]
    fn test_mixed_photo_generations_normalize_to_contiguous_order() {
        let listing = Listing::from_document(
            &doc(
                "l1",
                json!({
                    "photos": [
                        "https://example.com/legacy.jpg",
                        { "id": "p2", "url": "https://example.com/b.jpg", "order": 5 },
                        { "path": "no-url" },
                    ]
                }),
            ),
            today(),
        );

        assert_eq!(listing.photos.len(), 2);
        let orders: Vec<u32> = listing.photos.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_to_document_zeroes_the_inactive_price_field() {
        let listing = Listing::from_document(
            &doc("l1", json!({ "pricingType": "month", "pricePerMonth": 900 })),
            today(),
        );
        let written = listing.to_document();

        assert_eq!(written["pricingType"], json!("month"));
        assert_eq!(written["pricePerMonth"], json!(900));
        assert_eq!(written["pricePerNight"], json!(0));
        assert_eq!(written["availableDate"], json!("now"));
    }

    #[test]
    fn test_double_encoded_counts_are_accepted() {
        let listing =
            Listing::from_document(&doc("l1", json!({ "bedrooms": 3.0 })), today());
        assert_eq!(listing.bedrooms, 3);
    }
}
