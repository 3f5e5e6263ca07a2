//! The tagged value envelope used by the device
//!
//! Every scalar the speaker reads or writes travels as a small JSON
//! object of the form `{"type": "<tag>", "<tag>": <value>}` — for
//! example `{"type":"i32_","i32_":30}` for the volume. Nested
//! structures (the player snapshot) come through untagged. Decoding is
//! strictly tag-driven; there is no cross-type guessing.

use serde_json::{Map, Value};
use thiserror::Error;

/// A value envelope that could not be decoded
#[derive(Debug, Error)]
#[error("invalid value envelope: {0}")]
pub struct EnvelopeError(pub String);

/// A decoded device value
#[derive(Debug, Clone, PartialEq)]
pub enum KefValue {
    /// `i32_` / `i64_` envelopes
    Int(i64),
    /// `bool_` envelopes
    Bool(bool),
    /// `string_` and enumerated-string envelopes (`kefPhysicalSource`,
    /// `kefSpeakerStatus`)
    Str(String),
    /// `double_` envelopes
    Float(f64),
    /// Untagged nested structures, and envelopes with a tag this SDK
    /// does not model (kept verbatim for the `other` bucket)
    Object(Value),
}

impl KefValue {
    /// Decode a raw envelope according to its type tag
    pub fn decode(envelope: &Value) -> Result<KefValue, EnvelopeError> {
        let Some(obj) = envelope.as_object() else {
            return Err(EnvelopeError(format!("expected an object, got {envelope}")));
        };

        let Some(tag) = obj.get("type").and_then(Value::as_str) else {
            // Untagged objects are nested structures like the player snapshot.
            return Ok(KefValue::Object(envelope.clone()));
        };

        match tag {
            "i32_" | "i64_" => tagged_field(obj, tag)?
                .as_i64()
                .map(KefValue::Int)
                .ok_or_else(|| type_mismatch(tag, "an integer")),
            "bool_" => tagged_field(obj, tag)?
                .as_bool()
                .map(KefValue::Bool)
                .ok_or_else(|| type_mismatch(tag, "a boolean")),
            "string_" | "kefPhysicalSource" | "kefSpeakerStatus" => tagged_field(obj, tag)?
                .as_str()
                .map(|s| KefValue::Str(s.to_string()))
                .ok_or_else(|| type_mismatch(tag, "a string")),
            "double_" => tagged_field(obj, tag)?
                .as_f64()
                .map(KefValue::Float)
                .ok_or_else(|| type_mismatch(tag, "a float")),
            _ => Ok(KefValue::Object(envelope.clone())),
        }
    }

    /// Convert into a plain JSON value, shedding the envelope
    pub fn into_json(self) -> Value {
        match self {
            KefValue::Int(v) => Value::from(v),
            KefValue::Bool(v) => Value::from(v),
            KefValue::Str(v) => Value::from(v),
            KefValue::Float(v) => Value::from(v),
            KefValue::Object(v) => v,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            KefValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            KefValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            KefValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Value> {
        match self {
            KefValue::Object(v) => Some(v),
            _ => None,
        }
    }
}

/// Build an envelope for writing a value to the device
pub fn envelope(tag: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert("type".to_string(), Value::String(tag.to_string()));
    map.insert(tag.to_string(), value);
    Value::Object(map)
}

fn tagged_field<'a>(obj: &'a Map<String, Value>, tag: &str) -> Result<&'a Value, EnvelopeError> {
    obj.get(tag)
        .ok_or_else(|| EnvelopeError(format!("envelope tagged {tag} is missing its value field")))
}

fn type_mismatch(tag: &str, expected: &str) -> EnvelopeError {
    EnvelopeError(format!("envelope tagged {tag} does not carry {expected}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_integer_tags() {
        let value = KefValue::decode(&json!({"type":"i32_","i32_":30})).unwrap();
        assert_eq!(value, KefValue::Int(30));

        let value = KefValue::decode(&json!({"type":"i64_","i64_":215000})).unwrap();
        assert_eq!(value, KefValue::Int(215000));
    }

    #[test]
    fn test_decode_bool_tag() {
        let value = KefValue::decode(&json!({"type":"bool_","bool_":true})).unwrap();
        assert_eq!(value, KefValue::Bool(true));
    }

    #[test]
    fn test_decode_string_tags() {
        let value = KefValue::decode(&json!({"type":"string_","string_":"LSX II"})).unwrap();
        assert_eq!(value.as_str(), Some("LSX II"));

        let value =
            KefValue::decode(&json!({"type":"kefPhysicalSource","kefPhysicalSource":"wifi"}))
                .unwrap();
        assert_eq!(value.as_str(), Some("wifi"));

        let value =
            KefValue::decode(&json!({"type":"kefSpeakerStatus","kefSpeakerStatus":"powerOn"}))
                .unwrap();
        assert_eq!(value.as_str(), Some("powerOn"));
    }

    #[test]
    fn test_decode_float_tag() {
        let value = KefValue::decode(&json!({"type":"double_","double_":0.5})).unwrap();
        assert_eq!(value, KefValue::Float(0.5));
    }

    #[test]
    fn test_decode_untagged_object() {
        let snapshot = json!({"state":"playing","trackRoles":{"title":"Song"}});
        let value = KefValue::decode(&snapshot).unwrap();
        assert_eq!(value, KefValue::Object(snapshot));
    }

    #[test]
    fn test_decode_unknown_tag_is_kept_verbatim() {
        let raw = json!({"type":"kefMystery","kefMystery":7});
        let value = KefValue::decode(&raw).unwrap();
        assert_eq!(value, KefValue::Object(raw));
    }

    #[test]
    fn test_decode_rejects_missing_value_field() {
        let err = KefValue::decode(&json!({"type":"i32_"})).unwrap_err();
        assert!(err.to_string().contains("missing its value field"));
    }

    #[test]
    fn test_decode_rejects_mismatched_value() {
        let err = KefValue::decode(&json!({"type":"i32_","i32_":"ten"})).unwrap_err();
        assert!(err.to_string().contains("does not carry an integer"));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(KefValue::decode(&json!(42)).is_err());
    }

    #[test]
    fn test_envelope_round_trip() {
        let written = envelope("i32_", json!(25));
        assert_eq!(written, json!({"type":"i32_","i32_":25}));
        assert_eq!(KefValue::decode(&written).unwrap(), KefValue::Int(25));
    }
}
