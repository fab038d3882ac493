//! costguard - admission-time validation for a cost-optimization control plane
//!
//! Validates policy, workload, and automation-rule documents before they
//! are admitted: structural field checks, compiled JSON-Schema validation,
//! and expression-safety analysis, orchestrated with concurrent metrics
//! bookkeeping.

pub mod admission;
pub mod expr;
pub mod model;
pub mod observability;
pub mod schema;
pub mod structural;
