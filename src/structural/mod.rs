//! Structural validation subsystem
//!
//! Field-presence and format checks for admitted documents, independent of
//! JSON-Schema. This is the first stage of the admission pipeline.

mod errors;
mod validator;

pub use errors::{StructuralError, StructuralResult};
pub use validator::{FieldValidator, StructuralValidator, PRIORITY_MAX, PRIORITY_MIN};
