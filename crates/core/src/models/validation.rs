//! Field validators shared by the `New*` input types.

use crate::types::EmailError;

/// A field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field is empty or blank.
    #[error("{field} cannot be empty")]
    Required {
        /// Field name.
        field: &'static str,
    },

    /// A text field exceeds its column width.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Column width.
        max: usize,
    },

    /// A numeric field is negative.
    #[error("{field} cannot be negative")]
    Negative {
        /// Field name.
        field: &'static str,
    },

    /// The email field is not a valid address.
    #[error("email: {0}")]
    Email(#[from] EmailError),
}

/// Require a non-blank value no longer than `max` characters.
pub(crate) fn required(
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    max_length(field, Some(value), max)
}

/// Check an optional value against its column width.
pub(crate) fn max_length(
    field: &'static str,
    value: Option<&str>,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    match (value, max) {
        (Some(v), Some(max)) if v.chars().count() > max => {
            Err(ValidationError::TooLong { field, max })
        }
        _ => Ok(()),
    }
}

/// Reject negative integer counts.
pub(crate) fn non_negative(field: &'static str, value: Option<i32>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < 0 => Err(ValidationError::Negative { field }),
        _ => Ok(()),
    }
}
