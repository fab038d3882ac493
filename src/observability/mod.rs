//! Observability for the admission core
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation outcomes
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! The core logs only at fixed checkpoints (initialization complete, each
//! successful validation); logging is never used for control flow.

mod logger;

pub use logger::{Logger, Severity};
