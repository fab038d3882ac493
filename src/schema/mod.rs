//! Schema store subsystem
//!
//! Compiles and caches named JSON-Schema documents, and validates JSON or
//! YAML payloads against them.
//!
//! # Design Principles
//!
//! - Compiled schemas are immutable; reload is a full replace
//! - Violations are aggregated, not first-failure
//! - Validation is deterministic and performs no I/O

mod builtin;
mod errors;
mod store;

pub use builtin::{POLICY_SCHEMA, POLICY_SCHEMA_NAME, WORKLOAD_SCHEMA, WORKLOAD_SCHEMA_NAME};
pub use errors::{SchemaError, SchemaResult, Violation};
pub use store::SchemaStore;
