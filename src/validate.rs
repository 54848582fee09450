//! Recursive strict validation, deferred past decode.
//!
//! Decode already forces required fields and shapes, so a validator's job is
//! the forward-compat checks the decoder deliberately tolerates — unknown
//! union variants, unrecognized open-enum values — plus semantic rules on
//! requests. Policy is fail-fast at every level: the first failure is
//! surfaced with a field/index path and the walk stops.

use crate::errors::ValidateError;

/// Strict inspection of a decoded value.
///
/// Records validate their declared fields in declaration order, recursing
/// into nested records, unions, open enums, and collections.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidateError>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            Some(value) => value.validate(),
            None => Ok(()),
        }
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidateError> {
        for (i, item) in self.iter().enumerate() {
            item.validate().map_err(|e| e.at(format!("[{i}]")))?;
        }
        Ok(())
    }
}

impl<T: Validate> Validate for Box<T> {
    fn validate(&self) -> Result<(), ValidateError> {
        (**self).validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidateError;

    struct AlwaysBad;

    impl Validate for AlwaysBad {
        fn validate(&self) -> Result<(), ValidateError> {
            Err(ValidateError::invalid("value", "always bad"))
        }
    }

    #[test]
    fn vec_reports_the_failing_index() {
        struct Flaky(bool);
        impl Validate for Flaky {
            fn validate(&self) -> Result<(), ValidateError> {
                if self.0 {
                    Ok(())
                } else {
                    Err(ValidateError::invalid("value", "bad"))
                }
            }
        }
        let items = vec![Flaky(true), Flaky(true), Flaky(false)];
        let err = items.validate().unwrap_err();
        assert_eq!(err.to_string(), "[2]: value: bad");
    }

    #[test]
    fn none_is_vacuously_valid() {
        let absent: Option<AlwaysBad> = None;
        assert!(absent.validate().is_ok());
        assert!(Some(AlwaysBad).validate().is_err());
    }
}
