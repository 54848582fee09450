//! Open string enums: a closed set of known symbols plus a lossless escape
//! hatch for strings the server added after this crate shipped.
//!
//! `open_enum!` expands to the full surface the crate uses everywhere:
//! `as_str`/`is_known`, exact-string `From` conversions in both directions,
//! `Display`, serde via `from`/`into` String, the typed codec, and a
//! `Validate` impl that rejects `Other` with `UnrecognizedEnumValue`.
//!
//! Decoding never fails on an unrecognized string; the raw value is carried
//! in `Other` and re-encoded verbatim.

/// Declares an open string enum.
///
/// ```ignore
/// open_enum! {
///     /// The reason the model stopped generating.
///     StopReason, "stop reason" {
///         EndTurn => "end_turn",
///         MaxTokens => "max_tokens",
///     }
/// }
/// ```
///
/// The string label names the enum in validation errors.
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Unrecognized wire value, carried verbatim.
            Other(String),
        }

        impl $name {
            /// Canonical wire string for this value.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(other) => other.as_str(),
                }
            }

            /// Whether this is one of the known symbols.
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $wire => Self::$variant, )+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $( $wire => Self::$variant, )+
                    _ => {
                        #[cfg(feature = "tracing")]
                        ::tracing::debug!(kind = $label, value = %value, "unrecognized open enum value");
                        Self::Other(value)
                    }
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(other) => other,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl $crate::raw::Decode for $name {
            fn decode(
                value: ::serde_json::Value,
            ) -> Result<Self, $crate::errors::DecodeError> {
                <String as $crate::raw::Decode>::decode(value).map(Self::from)
            }
        }

        impl $crate::raw::Encode for $name {
            fn encode(&self) -> ::serde_json::Value {
                ::serde_json::Value::String(self.as_str().to_string())
            }
        }

        impl $crate::validate::Validate for $name {
            fn validate(&self) -> Result<(), $crate::errors::ValidateError> {
                match self {
                    Self::Other(value) => {
                        Err($crate::errors::ValidateError::UnrecognizedEnumValue {
                            name: $label,
                            value: value.clone(),
                        })
                    }
                    _ => Ok(()),
                }
            }
        }
    };
}

pub(crate) use open_enum;

#[cfg(test)]
mod tests {
    use crate::errors::ValidateError;
    use crate::raw::{Decode, Encode};
    use crate::validate::Validate;

    open_enum! {
        /// Test-only enum exercising the generated surface.
        Flavor, "flavor" {
            Sweet => "sweet",
            Sour => "sour",
        }
    }

    #[test]
    fn known_values_map_both_ways() {
        assert_eq!(Flavor::from("sweet"), Flavor::Sweet);
        assert_eq!(Flavor::Sour.as_str(), "sour");
        assert_eq!(String::from(Flavor::Sweet), "sweet");
        assert_eq!(Flavor::Sweet.to_string(), "sweet");
    }

    #[test]
    fn unrecognized_value_round_trips_verbatim() {
        let flavor = Flavor::from("umami-2".to_string());
        assert!(matches!(&flavor, Flavor::Other(v) if v == "umami-2"));
        assert!(!flavor.is_known());
        assert_eq!(flavor.encode(), serde_json::json!("umami-2"));
    }

    #[test]
    fn matching_is_exact_not_normalized() {
        assert!(matches!(Flavor::from("Sweet"), Flavor::Other(_)));
        assert!(matches!(Flavor::from(" sweet"), Flavor::Other(_)));
    }

    #[test]
    fn decode_never_fails_validate_rejects_other() {
        let flavor = Flavor::decode(serde_json::json!("umami-2")).unwrap();
        let err = flavor.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidateError::UnrecognizedEnumValue { name: "flavor", value } if value == "umami-2"
        ));
        assert!(Flavor::Sweet.validate().is_ok());
    }

    #[test]
    fn serde_round_trips_through_strings() {
        let flavor: Flavor = serde_json::from_str("\"sour\"").unwrap();
        assert_eq!(flavor, Flavor::Sour);
        let other: Flavor = serde_json::from_str("\"umami-2\"").unwrap();
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"umami-2\"");
    }
}
