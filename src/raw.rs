//! Ordered property bag backing every concrete record type.
//!
//! A [`RawObject`] is an insertion-ordered map from wire field name to raw
//! JSON value. Records decode by *taking* their declared fields out of the
//! bag; whatever remains is carried as the record's `extra` map and re-emitted
//! verbatim on encode, which is what makes unknown-field round-tripping work.
//!
//! A known optional field received as explicit `null` decodes to `None` and is
//! re-encoded as omitted; absent and `null` are equivalent for known optional
//! fields. Unknown fields (including `null` ones) round-trip exactly.

use serde_json::{Map, Value};

use crate::errors::DecodeError;

/// Wire name of the discriminator field.
pub(crate) const TYPE_FIELD: &str = "type";

/// Describes a JSON value's shape for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode half of a typed field: raw JSON value to domain type.
///
/// Implemented for JSON primitives, collections, and every model type in the
/// crate. Unlike going through serde, failures carry the crate's typed
/// [`DecodeError`] taxonomy end to end.
pub trait Decode: Sized {
    fn decode(value: Value) -> Result<Self, DecodeError>;
}

/// Encode half of a typed field: domain type to raw JSON value.
///
/// Infallible: every model type in the crate is JSON-representable. The one
/// lossy corner is a non-finite float, which encodes as `null`.
pub trait Encode {
    fn encode(&self) -> Value;
}

/// Insertion-ordered string-keyed map of raw JSON values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObject {
    entries: Map<String, Value>,
}

impl RawObject {
    /// Empty bag.
    pub fn new() -> Self {
        Self {
            entries: Map::new(),
        }
    }

    /// Fresh bag with the `"type"` discriminator pre-populated, so encoded
    /// records lead with their tag.
    pub fn tagged(tag: &str) -> Self {
        let mut entries = Map::new();
        entries.insert(TYPE_FIELD.to_string(), Value::String(tag.to_string()));
        Self { entries }
    }

    /// Trusted constructor over an already-parsed object. Performs no
    /// validation; used when reconstructing from wire JSON or from a union's
    /// dispatched body.
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Wraps a raw value, failing unless it is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(entries) => Ok(Self::from_map(entries)),
            other => Err(DecodeError::TypeMismatch {
                expected: "an object",
                found: value_kind(&other),
            }),
        }
    }

    /// O(1) lookup; never fails.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries.get(field)
    }

    /// O(1) upsert. Updating an existing key keeps its position; inserting a
    /// new key appends.
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.entries.insert(field.into(), value);
    }

    /// Removes and returns a field. Remaining keys keep their relative order.
    pub fn take(&mut self, field: &str) -> Option<Value> {
        self.entries.shift_remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Typed read of a required field. Takes the field out of the bag; the
    /// remainder becomes the enclosing record's `extra` map.
    pub fn required<T: Decode>(&mut self, field: &'static str) -> Result<T, DecodeError> {
        match self.take(field) {
            Some(value) => T::decode(value).map_err(|e| e.in_field(field)),
            None => Err(DecodeError::MissingRequiredField { field }),
        }
    }

    /// Typed read of an optional field. Absent and explicit `null` both yield
    /// `None`.
    pub fn optional<T: Decode>(&mut self, field: &'static str) -> Result<Option<T>, DecodeError> {
        match self.take(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::decode(value).map(Some).map_err(|e| e.in_field(field)),
        }
    }

    /// Consumes the record's `"type"` literal. Absence is tolerated (union
    /// dispatch has already routed on it); a mismatched literal is a
    /// malformed document.
    pub fn expect_tag(&mut self, expected: &'static str) -> Result<(), DecodeError> {
        match self.take(TYPE_FIELD) {
            None => Ok(()),
            Some(Value::String(tag)) if tag == expected => Ok(()),
            Some(Value::String(tag)) => Err(DecodeError::UnexpectedTag {
                expected,
                found: tag,
            }),
            Some(other) => Err(DecodeError::TypeMismatch {
                expected: "a string",
                found: value_kind(&other),
            }
            .in_field(TYPE_FIELD)),
        }
    }

    /// Typed write: encodes the value into the bag.
    pub fn set_field<T: Encode + ?Sized>(&mut self, field: &str, value: &T) {
        self.set(field, value.encode());
    }

    /// Typed write of an optional field; `None` writes nothing.
    pub fn set_optional<T: Encode>(&mut self, field: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.set_field(field, value);
        }
    }

    /// Appends preserved unknown fields after the declared ones, keeping
    /// their original relative order.
    pub fn extend_extra(&mut self, extra: &Map<String, Value>) {
        for (key, value) in extra {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }
}

impl From<RawObject> for Value {
    fn from(raw: RawObject) -> Self {
        raw.into_value()
    }
}

// ---------------------------------------------------------------------------
// Decode/Encode for JSON primitives and collections
// ---------------------------------------------------------------------------

impl Decode for Value {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        Ok(value)
    }
}

impl Encode for Value {
    fn encode(&self) -> Value {
        self.clone()
    }
}

impl Decode for String {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(DecodeError::TypeMismatch {
                expected: "a string",
                found: value_kind(&other),
            }),
        }
    }
}

impl Encode for String {
    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Encode for str {
    fn encode(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl Decode for bool {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(DecodeError::TypeMismatch {
                expected: "a boolean",
                found: value_kind(&other),
            }),
        }
    }
}

impl Encode for bool {
    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Decode for i64 {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        match value.as_i64() {
            Some(n) => Ok(n),
            None => Err(DecodeError::TypeMismatch {
                expected: "an integer",
                found: value_kind(&value),
            }),
        }
    }
}

impl Encode for i64 {
    fn encode(&self) -> Value {
        Value::Number((*self).into())
    }
}

impl Decode for f64 {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        match value.as_f64() {
            Some(n) => Ok(n),
            None => Err(DecodeError::TypeMismatch {
                expected: "a number",
                found: value_kind(&value),
            }),
        }
    }
}

impl Encode for f64 {
    fn encode(&self) -> Value {
        match serde_json::Number::from_f64(*self) {
            Some(n) => Value::Number(n),
            None => Value::Null,
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::decode(item).map_err(|e| e.at_index(i)))
                .collect(),
            other => Err(DecodeError::TypeMismatch {
                expected: "an array",
                found: value_kind(&other),
            }),
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self) -> Value {
        Value::Array(self.iter().map(Encode::encode).collect())
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode(&self) -> Value {
        match self {
            Some(value) => value.encode(),
            None => Value::Null,
        }
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        T::decode(value).map(Box::new)
    }
}

impl<T: Encode> Encode for Box<T> {
    fn encode(&self) -> Value {
        (**self).encode()
    }
}

impl Decode for Map<String, Value> {
    fn decode(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(DecodeError::TypeMismatch {
                expected: "an object",
                found: value_kind(&other),
            }),
        }
    }
}

impl Encode for Map<String, Value> {
    fn encode(&self) -> Value {
        Value::Object(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag(value: Value) -> RawObject {
        RawObject::from_value(value).unwrap()
    }

    #[test]
    fn set_preserves_position_on_update_and_appends_on_insert() {
        let mut raw = bag(json!({"a": 1, "b": 2, "c": 3}));
        raw.set("b", json!(20));
        raw.set("d", json!(4));
        let keys: Vec<&String> = raw.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b", "c", "d"]);
        assert_eq!(raw.get("b"), Some(&json!(20)));
    }

    #[test]
    fn take_keeps_remaining_key_order() {
        let mut raw = bag(json!({"a": 1, "b": 2, "c": 3, "d": 4}));
        assert_eq!(raw.take("b"), Some(json!(2)));
        let keys: Vec<&String> = raw.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "c", "d"]);
    }

    #[test]
    fn required_reports_missing_field_by_name() {
        let mut raw = bag(json!({"text": "hi"}));
        let err = raw.required::<String>("model").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingRequiredField { field: "model" }
        ));
    }

    #[test]
    fn required_wraps_decode_failure_as_malformed_field() {
        let mut raw = bag(json!({"text": 42}));
        let err = raw.required::<String>("text").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedField { field: "text", .. }));
        assert_eq!(
            err.to_string(),
            "malformed field `text`: expected a string, found a number"
        );
    }

    #[test]
    fn optional_treats_null_and_absent_alike() {
        let mut raw = bag(json!({"citations": null}));
        assert_eq!(raw.optional::<Vec<String>>("citations").unwrap(), None);
        assert_eq!(raw.optional::<Vec<String>>("absent").unwrap(), None);
    }

    #[test]
    fn tagged_bag_leads_with_the_discriminator() {
        let mut raw = RawObject::tagged("text");
        raw.set_field("text", "hi");
        let keys: Vec<&String> = raw.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["type", "text"]);
    }

    #[test]
    fn expect_tag_tolerates_absence_and_rejects_mismatch() {
        let mut absent = bag(json!({"text": "hi"}));
        assert!(absent.expect_tag("text").is_ok());

        let mut matching = bag(json!({"type": "text", "text": "hi"}));
        assert!(matching.expect_tag("text").is_ok());
        assert!(!matching.contains("type"));

        let mut wrong = bag(json!({"type": "image"}));
        let err = wrong.expect_tag("text").unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedTag { expected: "text", .. }));
    }

    #[test]
    fn vec_decode_reports_element_index() {
        let err = Vec::<String>::decode(json!(["ok", 7])).unwrap_err();
        assert_eq!(err.to_string(), "[1]: expected a string, found a number");
    }

    #[test]
    fn non_finite_floats_encode_as_null() {
        assert_eq!(f64::NAN.encode(), Value::Null);
        assert_eq!(1.5f64.encode(), json!(1.5));
    }
}
