//! Generic union envelope: descriptor tables and the two dispatch strategies.
//!
//! Every polymorphic wire type in the crate is an enum over concrete record
//! types plus (for discriminated unions) an [`UnknownVariant`] escape hatch.
//! The enum's `Decode` impl is one call into this module with a per-union
//! table of `{tag, decode fn}` pairs; encoding is transparent (the wrapper
//! contributes no wire representation of its own).
//!
//! Two dispatch strategies:
//!
//! - **Discriminated** ([`decode_tagged`]): the `"type"` string selects the
//!   alternative by exact match. The tag is authoritative: a body that fails
//!   to decode as the tagged alternative is a malformed document, never
//!   retried against other alternatives. A tag outside the table decodes to
//!   `UnknownVariant` (success), supporting additive API evolution.
//! - **Trial** ([`decode_trial`]): no reliable discriminator exists, so
//!   alternatives are attempted in declared order and the first structurally
//!   valid parse wins. Declared order is part of the union's contract.

use serde_json::Value;

use crate::errors::{DecodeError, TrialFailure};
use crate::raw::TYPE_FIELD;

/// Descriptor for a discriminated union: ordered `{tag, decoder}` table.
pub struct UnionDef<T: 'static> {
    /// Human-readable union name, used in errors.
    pub name: &'static str,
    pub variants: &'static [VariantDef<T>],
}

/// One alternative of a discriminated union.
pub struct VariantDef<T: 'static> {
    /// Exact `"type"` string selecting this alternative.
    pub tag: &'static str,
    pub decode: fn(Value) -> Result<T, DecodeError>,
}

/// Descriptor for a trial (undiscriminated) union.
pub struct TrialDef<T: 'static> {
    pub name: &'static str,
    pub variants: &'static [TrialVariantDef<T>],
}

/// One alternative of a trial union, attempted in declared order.
pub struct TrialVariantDef<T: 'static> {
    /// Label used in `NoVariantMatched` diagnostics.
    pub name: &'static str,
    pub decode: fn(Value) -> Result<T, DecodeError>,
}

/// A successfully-decoded union value whose tag matched no known alternative.
///
/// Holds the raw JSON verbatim so re-encoding reproduces it exactly. Fails
/// validation with `UnrecognizedVariant`; everything else about it is
/// inspectable.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownVariant {
    raw: Value,
}

impl UnknownVariant {
    /// Wraps a raw payload. Public so callers can round-trip hand-built
    /// payloads for variants this crate does not model yet.
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// The `"type"` string carried by the payload, if any.
    pub fn tag(&self) -> Option<&str> {
        self.raw.get(TYPE_FIELD).and_then(Value::as_str)
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

/// Decodes a discriminated union via its descriptor table.
///
/// `unknown` wraps an [`UnknownVariant`] into the union's escape variant.
pub fn decode_tagged<T>(
    def: &UnionDef<T>,
    unknown: fn(UnknownVariant) -> T,
    value: Value,
) -> Result<T, DecodeError> {
    let tag = value
        .get(TYPE_FIELD)
        .and_then(Value::as_str)
        .map(str::to_owned);
    match tag {
        Some(tag) => match def.variants.iter().find(|v| v.tag == tag) {
            Some(variant) => {
                (variant.decode)(value).map_err(|source| DecodeError::VariantDecodeFailed {
                    union: def.name,
                    tag,
                    source: Box::new(source),
                })
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(union = def.name, %tag, "preserving unknown union variant");
                Ok(unknown(UnknownVariant::new(value)))
            }
        },
        // Absent (or non-string) discriminator: treated as "no match", not an
        // error.
        None => {
            #[cfg(feature = "tracing")]
            tracing::debug!(union = def.name, "union payload without a type tag");
            Ok(unknown(UnknownVariant::new(value)))
        }
    }
}

/// Decodes a trial union by attempting each alternative in declared order.
pub fn decode_trial<T>(def: &TrialDef<T>, value: Value) -> Result<T, DecodeError> {
    let mut causes = Vec::with_capacity(def.variants.len());
    for variant in def.variants {
        match (variant.decode)(value.clone()) {
            Ok(decoded) => return Ok(decoded),
            Err(error) => causes.push(TrialFailure {
                variant: variant.name,
                error,
            }),
        }
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(union = def.name, causes = causes.len(), "no trial variant matched");
    Err(DecodeError::NoVariantMatched {
        union: def.name,
        causes,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::raw::RawObject;

    #[derive(Debug, PartialEq)]
    enum Toy {
        Num(i64),
        Word(String),
        Unknown(UnknownVariant),
    }

    static TOY: UnionDef<Toy> = UnionDef {
        name: "toy",
        variants: &[
            VariantDef {
                tag: "num",
                decode: |value| {
                    let mut raw = RawObject::from_value(value)?;
                    raw.expect_tag("num")?;
                    Ok(Toy::Num(raw.required("n")?))
                },
            },
            VariantDef {
                tag: "word",
                decode: |value| {
                    let mut raw = RawObject::from_value(value)?;
                    raw.expect_tag("word")?;
                    Ok(Toy::Word(raw.required("w")?))
                },
            },
        ],
    };

    static TOY_TRIAL: TrialDef<Toy> = TrialDef {
        name: "toy",
        variants: &[
            TrialVariantDef {
                name: "string",
                decode: |value| String::decode(value).map(Toy::Word),
            },
            TrialVariantDef {
                name: "integer",
                decode: |value| i64::decode(value).map(Toy::Num),
            },
        ],
    };

    use crate::raw::Decode;

    #[test]
    fn tag_selects_the_matching_variant() {
        let toy = decode_tagged(&TOY, Toy::Unknown, json!({"type": "num", "n": 7})).unwrap();
        assert_eq!(toy, Toy::Num(7));
    }

    #[test]
    fn unknown_tag_is_preserved_not_rejected() {
        let payload = json!({"type": "future_toy", "data": [1, 2]});
        let toy = decode_tagged(&TOY, Toy::Unknown, payload.clone()).unwrap();
        match toy {
            Toy::Unknown(unknown) => {
                assert_eq!(unknown.tag(), Some("future_toy"));
                assert_eq!(unknown.raw(), &payload);
            }
            other => panic!("expected unknown variant, got {other:?}"),
        }
    }

    #[test]
    fn absent_tag_is_treated_as_no_match() {
        let toy = decode_tagged(&TOY, Toy::Unknown, json!({"n": 7})).unwrap();
        assert!(matches!(toy, Toy::Unknown(_)));
    }

    #[test]
    fn matched_tag_with_bad_body_fails_without_retry() {
        let err = decode_tagged(&TOY, Toy::Unknown, json!({"type": "num", "w": "seven"}))
            .unwrap_err();
        match err {
            DecodeError::VariantDecodeFailed { union, tag, .. } => {
                assert_eq!(union, "toy");
                assert_eq!(tag, "num");
            }
            other => panic!("expected VariantDecodeFailed, got {other:?}"),
        }
    }

    #[test]
    fn trial_attempts_in_declared_order() {
        assert_eq!(
            decode_trial(&TOY_TRIAL, json!("hello")).unwrap(),
            Toy::Word("hello".into())
        );
        assert_eq!(decode_trial(&TOY_TRIAL, json!(9)).unwrap(), Toy::Num(9));
    }

    #[test]
    fn trial_exhaustion_carries_every_cause() {
        let err = decode_trial(&TOY_TRIAL, json!({"neither": true})).unwrap_err();
        match err {
            DecodeError::NoVariantMatched { union, causes } => {
                assert_eq!(union, "toy");
                assert_eq!(causes.len(), 2);
                assert_eq!(causes[0].variant, "string");
                assert_eq!(causes[1].variant, "integer");
            }
            other => panic!("expected NoVariantMatched, got {other:?}"),
        }
    }
}
