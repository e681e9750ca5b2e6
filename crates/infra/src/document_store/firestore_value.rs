//! Codec between plain JSON documents and Firestore REST `Value`s.
//!
//! Firestore's REST surface wraps every field in a typed value object:
//!
//! ```text
//! { "quantity": 3 }  <->  { "quantity": { "integerValue": "3" } }
//! ```
//!
//! Integers travel as decimal strings (64-bit), nested objects as `mapValue`
//! and arrays as `arrayValue`. Types without a JSON counterpart (timestamps,
//! references, bytes, geo points) decode to their string or object form.

use serde_json::{json, Map, Number, Value as JsonValue};

use super::r#trait::{Document, StoreError};

/// Encode a JSON document into a Firestore `fields` map.
pub fn encode_fields(doc: &Document) -> JsonValue {
    let fields: Map<String, JsonValue> = doc
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    JsonValue::Object(fields)
}

/// Encode one JSON value into a Firestore typed `Value`.
pub fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            let values: Vec<JsonValue> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        JsonValue::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode a Firestore `fields` map (absent means an empty document).
pub fn decode_fields(fields: Option<&JsonValue>) -> Result<Document, StoreError> {
    let Some(fields) = fields else {
        return Ok(Document::new());
    };
    let map = fields
        .as_object()
        .ok_or_else(|| StoreError::Decode("fields is not an object".to_string()))?;

    let mut doc = Document::new();
    for (name, value) in map {
        let decoded = decode_value(value)
            .map_err(|e| StoreError::Decode(format!("field '{name}': {e}")))?;
        doc.insert(name.clone(), decoded);
    }
    Ok(doc)
}

/// Decode one Firestore typed `Value` into JSON.
pub fn decode_value(value: &JsonValue) -> Result<JsonValue, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "value is not an object".to_string())?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| "value has no type tag".to_string())?;

    match kind.as_str() {
        "nullValue" => Ok(JsonValue::Null),
        "booleanValue" => inner
            .as_bool()
            .map(JsonValue::Bool)
            .ok_or_else(|| "booleanValue is not a bool".to_string()),
        "integerValue" => {
            // Encoded as a decimal string; accept a bare number too.
            let parsed = match inner {
                JsonValue::String(s) => s.parse::<i64>().ok(),
                JsonValue::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(|i| JsonValue::Number(i.into()))
                .ok_or_else(|| format!("integerValue {inner} is not a 64-bit integer"))
        }
        "doubleValue" => {
            let f = match inner {
                JsonValue::Number(n) => n.as_f64(),
                JsonValue::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            f.and_then(Number::from_f64)
                .map(JsonValue::Number)
                .ok_or_else(|| format!("doubleValue {inner} is not a finite number"))
        }
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| JsonValue::String(s.to_string()))
            .ok_or_else(|| format!("{kind} is not a string")),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(JsonValue::Array(values)) => values.as_slice(),
                Some(_) => return Err("arrayValue.values is not an array".to_string()),
                None => &[],
            };
            values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array)
        }
        "mapValue" => decode_fields(inner.get("fields"))
            .map(JsonValue::Object)
            .map_err(|e| e.to_string()),
        other => Err(format!("unsupported value type '{other}'")),
    }
}

/// Last path segment of a Firestore document resource name
/// (`projects/p/databases/d/documents/inventory/apple` → `apple`).
pub fn key_from_resource_name(name: &str) -> Option<&str> {
    name.rsplit('/').next().filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(v: JsonValue) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn quantity_document_uses_string_integers() {
        let encoded = encode_fields(&doc(json!({ "quantity": 3 })));
        assert_eq!(encoded, json!({ "quantity": { "integerValue": "3" } }));
    }

    #[test]
    fn decodes_nested_document() {
        let fields = json!({
            "quantity": { "integerValue": "12" },
            "price": { "doubleValue": 2.5 },
            "label": { "stringValue": "fresh" },
            "organic": { "booleanValue": true },
            "note": { "nullValue": null },
            "tags": { "arrayValue": { "values": [ { "stringValue": "fruit" } ] } },
            "origin": { "mapValue": { "fields": { "country": { "stringValue": "NZ" } } } },
            "empty": { "arrayValue": {} },
            "seen": { "timestampValue": "2024-07-01T10:00:00Z" }
        });

        let decoded = decode_fields(Some(&fields)).unwrap();
        assert_eq!(
            JsonValue::Object(decoded),
            json!({
                "quantity": 12,
                "price": 2.5,
                "label": "fresh",
                "organic": true,
                "note": null,
                "tags": ["fruit"],
                "origin": { "country": "NZ" },
                "empty": [],
                "seen": "2024-07-01T10:00:00Z"
            })
        );
    }

    #[test]
    fn encode_then_decode_preserves_document() {
        let original = doc(json!({
            "quantity": 7,
            "ratio": 0.25,
            "nested": { "list": [1, "two", false, null] }
        }));
        let decoded = decode_fields(Some(&encode_fields(&original))).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn missing_fields_is_an_empty_document() {
        assert!(decode_fields(None).unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_values() {
        let bad_int = json!({ "quantity": { "integerValue": "lots" } });
        assert!(matches!(decode_fields(Some(&bad_int)), Err(StoreError::Decode(_))));

        let unknown = json!({ "quantity": { "vectorValue": {} } });
        assert!(decode_fields(Some(&unknown)).is_err());
    }

    #[test]
    fn key_is_last_resource_segment() {
        assert_eq!(
            key_from_resource_name("projects/p/databases/(default)/documents/inventory/apple"),
            Some("apple")
        );
        assert_eq!(key_from_resource_name("projects/p/documents/inventory/"), None);
    }
}
