//! Structural validator error types

use thiserror::Error;

/// Result type for structural checks
pub type StructuralResult<T> = Result<T, StructuralError>;

/// Field-level validation errors, independent of JSON-Schema.
#[derive(Debug, Error)]
pub enum StructuralError {
    /// A required field is absent or empty
    #[error("{entity}: field '{field}' must not be empty")]
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },

    /// A field does not match its required format
    #[error("{entity}: field '{field}' is malformed: {reason}")]
    Malformed {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    /// Two fields that must agree do not
    #[error("{entity}: '{left}' ({left_value}) must equal '{right}' ({right_value})")]
    FieldMismatch {
        entity: &'static str,
        left: &'static str,
        left_value: String,
        right: &'static str,
        right_value: String,
    },

    /// A numeric field is outside its valid range
    #[error("{entity}: field '{field}' is {value}, valid range is {min}..={max}")]
    OutOfRange {
        entity: &'static str,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A name pattern failed to compile
    #[error("name pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}
