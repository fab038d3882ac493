//! Admission pipeline error types
//!
//! Every stage wraps its underlying cause with a stage name so callers can
//! present "schema validation failed: ..." diagnostics without losing the
//! root cause.

use thiserror::Error;

use crate::expr::ExprError;
use crate::schema::SchemaError;
use crate::structural::StructuralError;

/// Result type for admission operations
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// The pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Structural,
    Schema,
    Expression,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Structural => "structural",
            Stage::Schema => "schema",
            Stage::Expression => "expression",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admission errors
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// The controller has not completed `initialize()`
    #[error("validator is not initialized")]
    NotInitialized,

    /// Initialization failed; the controller refuses to operate
    #[error("initialization failed: {0}")]
    Initialization(#[source] Box<AdmissionError>),

    /// The structural stage rejected the document
    #[error("structural validation failed: {0}")]
    Structural(#[from] StructuralError),

    /// The schema stage rejected the document
    #[error("schema validation failed: {0}")]
    Schema(#[from] SchemaError),

    /// The expression stage rejected the document
    #[error("expression validation failed: {0}")]
    Expression(#[from] ExprError),
}

impl AdmissionError {
    /// The pipeline stage this error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            AdmissionError::Structural(_) => Some(Stage::Structural),
            AdmissionError::Schema(_) => Some(Stage::Schema),
            AdmissionError::Expression(_) => Some(Stage::Expression),
            _ => None,
        }
    }
}
