//! Admission orchestration subsystem
//!
//! The [`AdmissionController`] composes structural, schema, and expression
//! validation into one pipeline per document kind and keeps process-wide
//! validation metrics under a single read/write lock.

mod controller;
mod errors;
mod metrics;

pub use controller::AdmissionController;
pub use errors::{AdmissionError, AdmissionResult, Stage};
pub use metrics::{MetricsSnapshot, ValidationMetrics};
