//! Decode/encode entry points.
//!
//! Options are an explicit value held by [`WireCodec`], never process-wide
//! state, so differing strictness levels can coexist and tests stay isolated.
//! The free functions at the bottom cover the common permissive path.

use serde_json::Value;

use crate::errors::{DecodeError, Error, Result};
use crate::raw::{Decode, Encode};
use crate::validate::Validate;

/// Codec behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireOptions {
    /// Run [`Validate`] after every successful decode, rejecting unknown
    /// union variants and unrecognized enum values up front. Off by default:
    /// the permissive path decodes anything structurally absorbable so
    /// callers can inspect payloads from newer server versions.
    pub validate: bool,
}

impl Default for WireOptions {
    fn default() -> Self {
        Self { validate: false }
    }
}

impl WireOptions {
    /// Strict preset: validate after decode.
    pub fn strict() -> Self {
        Self { validate: true }
    }
}

/// JSON codec over the crate's wire-model types.
#[derive(Debug, Clone, Default)]
pub struct WireCodec {
    options: WireOptions,
}

impl WireCodec {
    /// Codec with default (permissive) options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WireOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WireOptions {
        &self.options
    }

    /// Decodes a model type from a JSON document.
    pub fn decode_str<T>(&self, json: &str) -> Result<T>
    where
        T: Decode + Validate,
    {
        let value: Value = serde_json::from_str(json).map_err(DecodeError::Json)?;
        self.decode_value(value)
    }

    /// Decodes a model type from a raw JSON body (e.g. an HTTP response or
    /// one SSE event's data payload).
    pub fn decode_slice<T>(&self, json: &[u8]) -> Result<T>
    where
        T: Decode + Validate,
    {
        let value: Value = serde_json::from_slice(json).map_err(DecodeError::Json)?;
        self.decode_value(value)
    }

    /// Decodes a model type from an already-parsed JSON tree.
    pub fn decode_value<T>(&self, value: Value) -> Result<T>
    where
        T: Decode + Validate,
    {
        let decoded = T::decode(value).map_err(Error::Decode)?;
        if self.options.validate {
            decoded.validate().map_err(Error::Validate)?;
        }
        Ok(decoded)
    }

    /// Encodes a model type to a JSON tree.
    pub fn encode_value<T: Encode>(&self, value: &T) -> Value {
        value.encode()
    }

    /// Encodes a model type to a compact JSON string.
    pub fn encode_string<T: Encode>(&self, value: &T) -> String {
        self.encode_value(value).to_string()
    }
}

/// Decodes a model type from a JSON document with default options.
pub fn from_str<T: Decode + Validate>(json: &str) -> Result<T> {
    WireCodec::new().decode_str(json)
}

/// Decodes a model type from a raw JSON body with default options.
pub fn from_slice<T: Decode + Validate>(json: &[u8]) -> Result<T> {
    WireCodec::new().decode_slice(json)
}

/// Decodes a model type from a JSON tree with default options.
pub fn from_value<T: Decode + Validate>(value: Value) -> Result<T> {
    WireCodec::new().decode_value(value)
}

/// Encodes a model type to a JSON tree.
pub fn to_value<T: Encode>(value: &T) -> Value {
    value.encode()
}

/// Encodes a model type to a compact JSON string.
pub fn to_string<T: Encode>(value: &T) -> String {
    value.encode().to_string()
}

/// Bridges a wire-model type into serde: `Serialize` goes through `Encode`,
/// `Deserialize` buffers a `Value` and goes through `Decode`. Keeps the
/// crate's types usable anywhere serde types are, while the typed codec
/// remains the error-bearing source of truth.
macro_rules! wire_serde {
    ($name:ident) => {
        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                ::serde::Serialize::serialize(&$crate::raw::Encode::encode(self), serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                $crate::raw::Decode::decode(value).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use wire_serde;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_permissive() {
        assert!(!WireOptions::default().validate);
        assert!(WireOptions::strict().validate);
    }

    #[test]
    fn invalid_json_surfaces_as_decode_error() {
        let err = from_str::<crate::TextBlock>("{not json").unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Json(_))));
    }

    #[test]
    fn codecs_with_different_options_coexist() {
        let permissive = WireCodec::new();
        let strict = WireCodec::with_options(WireOptions::strict());
        assert!(!permissive.options().validate);
        assert!(strict.options().validate);
    }
}
