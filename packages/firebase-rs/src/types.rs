//! Mapping between plain JSON values and the Firestore REST value envelope.
//!
//! The REST API wraps every field in a typed envelope, e.g.
//! `{"stringValue": "Villa"}` or `{"integerValue": "3"}` (integers are
//! string-encoded on the wire). This module converts both directions so the
//! rest of the crate can work with ordinary `serde_json::Value` records.

use serde_json::{json, Map, Value as JsonValue};

/// Wrap a plain JSON object into a Firestore `fields` map.
pub fn to_fields(data: &JsonValue) -> JsonValue {
    let mut fields = Map::new();
    if let Some(object) = data.as_object() {
        for (key, value) in object {
            fields.insert(key.clone(), to_value(value));
        }
    }
    JsonValue::Object(fields)
}

/// Unwrap a Firestore `fields` map into a plain JSON object.
pub fn from_fields(fields: &JsonValue) -> JsonValue {
    let mut data = Map::new();
    if let Some(object) = fields.as_object() {
        for (key, value) in object {
            data.insert(key.clone(), from_value(value));
        }
    }
    JsonValue::Object(data)
}

fn to_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Integers travel as strings on the wire
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            let values: Vec<JsonValue> = items.iter().map(to_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        JsonValue::Object(_) => json!({ "mapValue": { "fields": to_fields(value) } }),
    }
}

fn from_value(envelope: &JsonValue) -> JsonValue {
    let Some(object) = envelope.as_object() else {
        return JsonValue::Null;
    };

    if let Some(s) = object.get("stringValue").and_then(JsonValue::as_str) {
        return JsonValue::String(s.to_string());
    }
    if let Some(raw) = object.get("integerValue").and_then(JsonValue::as_str) {
        return raw
            .parse::<i64>()
            .map(|i| json!(i))
            .unwrap_or(JsonValue::Null);
    }
    if let Some(d) = object.get("doubleValue").and_then(JsonValue::as_f64) {
        return json!(d);
    }
    if let Some(b) = object.get("booleanValue").and_then(JsonValue::as_bool) {
        return JsonValue::Bool(b);
    }
    // Timestamps come back as RFC 3339 strings; keep them as strings
    if let Some(ts) = object.get("timestampValue").and_then(JsonValue::as_str) {
        return JsonValue::String(ts.to_string());
    }
    if let Some(array) = object.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(JsonValue::as_array)
            .map(|items| items.iter().map(from_value).collect())
            .unwrap_or_default();
        return JsonValue::Array(values);
    }
    if let Some(map) = object.get("mapValue") {
        return from_fields(map.get("fields").unwrap_or(&JsonValue::Null));
    }
    JsonValue::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_survive_the_envelope() {
        let data = json!({
            "title": "Beach Villa",
            "bedrooms": 3,
            "rating": 4.5,
            "isListed": true,
            "notes": null,
        });

        let decoded = from_fields(&to_fields(&data));
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_integers_are_string_encoded_on_the_wire() {
        let fields = to_fields(&json!({ "bedrooms": 3 }));
        assert_eq!(fields["bedrooms"], json!({ "integerValue": "3" }));
    }

    #[test]
    fn test_array_of_maps_round_trips() {
        let data = json!({
            "photos": [
                { "url": "https://example.com/a.jpg", "order": 0 },
                { "url": "https://example.com/b.jpg", "order": 1 },
            ]
        });

        let decoded = from_fields(&to_fields(&data));
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_timestamp_value_decodes_to_string() {
        let fields = json!({
            "createdAt": { "timestampValue": "2026-01-04T09:30:00Z" }
        });

        let decoded = from_fields(&fields);
        assert_eq!(decoded["createdAt"], json!("2026-01-04T09:30:00Z"));
    }
}
