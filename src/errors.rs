use std::fmt;

use thiserror::Error;

/// Failure of one alternative during trial-union decoding.
///
/// Collected into [`DecodeError::NoVariantMatched`] so callers can see why
/// every plausible shape was rejected, not just the last one.
#[derive(Debug, Error)]
#[error("{variant}: {error}")]
pub struct TrialFailure {
    /// Declared name of the alternative that was attempted.
    pub variant: &'static str,
    /// Why that alternative rejected the input.
    pub error: DecodeError,
}

/// Decode-time error: the document cannot be mapped onto the typed model.
///
/// These abort the decode of the enclosing structure and propagate to the
/// caller. Forward-compat outcomes (unknown variants, unrecognized enum
/// values) are *not* decode errors; they decode successfully and are rejected
/// later by [`Validate`](crate::Validate).
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A required field was absent from the wire object.
    #[error("missing required field `{field}`")]
    MissingRequiredField { field: &'static str },

    /// A field was present but its value did not decode as the declared type.
    #[error("malformed field `{field}`: {source}")]
    MalformedField {
        field: &'static str,
        #[source]
        source: Box<DecodeError>,
    },

    /// A raw value had the wrong JSON shape.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A list element failed to decode.
    #[error("[{index}]: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },

    /// A record's `"type"` literal did not match the expected discriminator.
    #[error("expected type tag `{expected}`, found `{found}`")]
    UnexpectedTag {
        expected: &'static str,
        found: String,
    },

    /// Discriminated union: the tag matched a known alternative but the body
    /// did not decode as that alternative. The tag is authoritative, so this
    /// is a malformed document, not a wrong guess to retry.
    #[error("`{union}` variant `{tag}` failed to decode: {source}")]
    VariantDecodeFailed {
        union: &'static str,
        tag: String,
        #[source]
        source: Box<DecodeError>,
    },

    /// Trial union: no alternative accepted the input.
    #[error("no `{union}` variant matched: {}", TrialFailureList(.causes))]
    NoVariantMatched {
        union: &'static str,
        causes: Vec<TrialFailure>,
    },

    /// The document itself was not parseable JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    pub(crate) fn in_field(self, field: &'static str) -> Self {
        DecodeError::MalformedField {
            field,
            source: Box::new(self),
        }
    }

    pub(crate) fn at_index(self, index: usize) -> Self {
        DecodeError::Element {
            index,
            source: Box::new(self),
        }
    }
}

/// Display adapter over a slice of trial failures.
struct TrialFailureList<'a>(&'a [TrialFailure]);

impl fmt::Display for TrialFailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cause) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{cause}")?;
        }
        Ok(())
    }
}

/// Validation-time error: the value decoded, but strict inspection rejects it.
///
/// Deliberately deferred past decode so callers can decode-and-inspect
/// payloads from newer server versions without crashing, then opt into
/// strictness by calling [`Validate`](crate::Validate).
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A union value holds an alternative outside the known set.
    #[error("unrecognized `{union}` variant{}", OptTag(.tag))]
    UnrecognizedVariant {
        union: &'static str,
        tag: Option<String>,
    },

    /// An open enum holds a string outside its known symbol set.
    #[error("unrecognized {name} value `{value}`")]
    UnrecognizedEnumValue { name: &'static str, value: String },

    /// A semantic rule on an otherwise well-shaped value failed.
    #[error("{field}: {message}")]
    Invalid { field: String, message: String },

    /// Context frame: where in the structure the inner failure occurred.
    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<ValidateError>,
    },
}

impl ValidateError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidateError::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Prefixes a path segment, merging with an existing context frame so
    /// nested walks produce `content[0].citations[1]`-style paths.
    pub fn at(self, segment: impl Into<String>) -> Self {
        let mut path = segment.into();
        match self {
            ValidateError::At {
                path: inner,
                source,
            } => {
                if !inner.starts_with('[') {
                    path.push('.');
                }
                path.push_str(&inner);
                ValidateError::At { path, source }
            }
            other => ValidateError::At {
                path,
                source: Box::new(other),
            },
        }
    }
}

struct OptTag<'a>(&'a Option<String>);

impl fmt::Display for OptTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(tag) => write!(f, " `{tag}`"),
            None => Ok(()),
        }
    }
}

/// Unified error type surfaced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    Validate(#[from] ValidateError),
}

/// Convenience alias for fallible results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_field_names_the_field() {
        let err = DecodeError::MissingRequiredField { field: "text" };
        assert_eq!(err.to_string(), "missing required field `text`");
    }

    #[test]
    fn malformed_field_chains_the_cause() {
        let err = DecodeError::TypeMismatch {
            expected: "a string",
            found: "a number",
        }
        .in_field("model");
        assert_eq!(
            err.to_string(),
            "malformed field `model`: expected a string, found a number"
        );
    }

    #[test]
    fn no_variant_matched_lists_every_cause() {
        let err = DecodeError::NoVariantMatched {
            union: "message content",
            causes: vec![
                TrialFailure {
                    variant: "string",
                    error: DecodeError::TypeMismatch {
                        expected: "a string",
                        found: "an object",
                    },
                },
                TrialFailure {
                    variant: "blocks",
                    error: DecodeError::TypeMismatch {
                        expected: "an array",
                        found: "an object",
                    },
                },
            ],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("string: expected a string"));
        assert!(rendered.contains("blocks: expected an array"));
    }

    #[test]
    fn validate_paths_merge_across_frames() {
        let err = ValidateError::UnrecognizedEnumValue {
            name: "stop reason",
            value: "vendor_reason".into(),
        }
        .at("stop_reason")
        .at("[2]")
        .at("messages");
        assert_eq!(
            err.to_string(),
            "messages[2].stop_reason: unrecognized stop reason value `vendor_reason`"
        );
    }

    #[test]
    fn unrecognized_variant_formats_with_and_without_tag() {
        let with_tag = ValidateError::UnrecognizedVariant {
            union: "content block",
            tag: Some("future_block".into()),
        };
        assert_eq!(
            with_tag.to_string(),
            "unrecognized `content block` variant `future_block`"
        );
        let without = ValidateError::UnrecognizedVariant {
            union: "content block",
            tag: None,
        };
        assert_eq!(without.to_string(), "unrecognized `content block` variant");
    }
}
