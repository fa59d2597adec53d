//! Listing photos and their display order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One image belonging to a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: String,
    pub url: String,
    /// Storage object name, kept for deletion.
    pub path: String,
    pub uploaded_at: DateTime<Utc>,
    /// Position in the display sequence; contiguous `0..N-1` after every write.
    pub order: u32,
}

impl Photo {
    /// Widen one stored photo entry into a `Photo`.
    ///
    /// Early records stored photos as plain URL strings; later ones as
    /// objects. Both are accepted, with `index` as the fallback position.
    /// Entries with no usable URL are dropped.
    pub fn from_value(value: &JsonValue, index: usize) -> Option<Self> {
        match value {
            JsonValue::String(url) if !url.is_empty() => Some(Self {
                id: String::new(),
                url: url.clone(),
                path: String::new(),
                uploaded_at: DateTime::<Utc>::UNIX_EPOCH,
                order: index as u32,
            }),
            JsonValue::Object(object) => {
                let url = object.get("url").and_then(JsonValue::as_str)?;
                if url.is_empty() {
                    return None;
                }
                Some(Self {
                    id: object
                        .get("id")
                        .and_then(JsonValue::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    url: url.to_string(),
                    path: object
                        .get("path")
                        .and_then(JsonValue::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    uploaded_at: object
                        .get("uploadedAt")
                        .and_then(JsonValue::as_str)
                        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                    order: object
                        .get("order")
                        .and_then(JsonValue::as_u64)
                        .unwrap_or(index as u64) as u32,
                })
            }
            _ => None,
        }
    }
}

/// Rewrite `order` to exactly `0..N-1` in sequence order.
///
/// Invoked after every reorder or removal; also repairs stale or duplicate
/// order values left behind by older writes.
pub fn reindex(photos: &mut [Photo]) {
    for (index, photo) in photos.iter_mut().enumerate() {
        photo.order = index as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn photo(id: &str, order: u32) -> Photo {
        Photo {
            id: id.to_string(),
            url: format!("https://example.com/{id}.jpg"),
            path: format!("listings/{id}.jpg"),
            uploaded_at: DateTime::<Utc>::UNIX_EPOCH,
            order,
        }
    }

    #[test]
    fn test_reindex_repairs_gaps_and_duplicates() {
        let mut photos = vec![photo("a", 4), photo("b", 4), photo("c", 0)];
        reindex(&mut photos);

        let orders: Vec<u32> = photos.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        // Sequence order untouched
        assert_eq!(photos[0].id, "a");
        assert_eq!(photos[2].id, "c");
    }

    #[test]
    fn test_legacy_string_entry_is_widened() {
        let value = json!("https://example.com/old.jpg");
        let photo = Photo::from_value(&value, 3).unwrap();

        assert_eq!(photo.url, "https://example.com/old.jpg");
        assert_eq!(photo.order, 3);
        assert!(photo.id.is_empty());
        assert!(photo.path.is_empty());
    }

    #[test]
    fn test_object_entry_reads_all_fields() {
        let value = json!({
            "id": "p1",
            "url": "https://example.com/new.jpg",
            "path": "listings/new.jpg",
            "uploadedAt": "2026-05-01T08:00:00Z",
            "order": 7,
        });
        let photo = Photo::from_value(&value, 0).unwrap();

        assert_eq!(photo.id, "p1");
        assert_eq!(photo.path, "listings/new.jpg");
        assert_eq!(photo.order, 7);
        assert_eq!(photo.uploaded_at.to_rfc3339(), "2026-05-01T08:00:00+00:00");
    }

    #[test]
    fn test_entries_without_url_are_dropped() {
        assert!(Photo::from_value(&json!(""), 0).is_none());
        assert!(Photo::from_value(&json!({ "path": "x" }), 0).is_none());
        assert!(Photo::from_value(&json!(42), 0).is_none());
    }
}
