//! Policy document types
//!
//! A policy is a declarative document describing optimization objectives,
//! constraints, and rules to enforce against workloads. The policy kind is a
//! closed enum so nested rule lists are always reachable by the validator
//! without downcasting.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Closed set of policy kinds recognized by the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyType {
    CostOptimization,
    Automation,
    WorkloadPriority,
    Security,
    ResourceQuota,
}

impl PolicyType {
    /// Returns the wire representation of this policy kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::CostOptimization => "cost-optimization",
            PolicyType::Automation => "automation",
            PolicyType::WorkloadPriority => "workload-priority",
            PolicyType::Security => "security",
            PolicyType::ResourceQuota => "resource-quota",
        }
    }
}

/// Identifying metadata for a policy document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyMetadata {
    /// DNS-label name (validated structurally)
    pub name: String,

    /// Policy kind; must match `spec.type`
    #[serde(rename = "type")]
    pub policy_type: PolicyType,

    /// Lifecycle status (e.g., "active", "draft")
    #[serde(default)]
    pub status: String,

    /// Scheduling priority; valid range is 1..=1000
    #[serde(default = "default_priority")]
    pub priority: i64,

    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

fn default_priority() -> i64 {
    100
}

/// Target selector for the workloads a policy applies to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyTarget {
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub selector: HashMap<String, String>,
}

/// A weighted optimization objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    #[serde(rename = "type")]
    pub objective_type: String,

    /// Relative weight in 0.0..=1.0
    #[serde(default)]
    pub weight: f64,

    #[serde(default)]
    pub target_value: f64,
}

/// A hard constraint the optimizer must not violate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub constraint_type: String,

    #[serde(default)]
    pub operator: String,

    #[serde(default)]
    pub value: Value,
}

/// A condition/action pair nested inside a policy.
///
/// The condition must compile and evaluate to a boolean; the action must
/// belong to the recognized action taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    pub name: String,
    pub condition: String,
    pub action: String,

    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

/// A standalone action entry in a policy spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyAction {
    #[serde(rename = "type")]
    pub action_type: String,

    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

/// Behavioral specification of a policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySpec {
    /// Policy kind; must match `metadata.type`
    #[serde(rename = "type")]
    pub policy_type: PolicyType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PolicyTarget>,

    #[serde(default)]
    pub objectives: Vec<Objective>,

    #[serde(default)]
    pub constraints: Vec<Constraint>,

    #[serde(default)]
    pub rules: Vec<PolicyRule>,

    #[serde(default)]
    pub actions: Vec<PolicyAction>,
}

/// A complete policy document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub metadata: PolicyMetadata,
    pub spec: PolicySpec,
}
