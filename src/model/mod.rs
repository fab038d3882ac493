//! Document model for admission-time validation
//!
//! These are the three document kinds the control plane admits:
//!
//! - [`Policy`]: optimization objectives, constraints, and rules
//! - [`Workload`]: a schedulable unit subject to policy
//! - [`AutomationRule`]: a trigger/action binding with guard conditions
//!
//! All types are plain serde data; validation logic lives in the
//! `structural`, `schema`, and `expr` subsystems.

mod automation;
mod policy;
mod workload;

pub use automation::AutomationRule;
pub use policy::{
    Constraint, Objective, Policy, PolicyAction, PolicyMetadata, PolicyRule, PolicySpec,
    PolicyTarget, PolicyType,
};
pub use workload::{ResourceRequirements, Workload, WorkloadStatus, WorkloadType};
