//! Field-level structural validator
//!
//! Presence and format checks that do not require a compiled schema.
//! These run first in the admission pipeline; the schema and expression
//! stages assume structurally sound input.

use regex::Regex;

use crate::model::{AutomationRule, Policy, Workload};

use super::errors::{StructuralError, StructuralResult};

/// Valid range for policy priority.
pub const PRIORITY_MIN: i64 = 1;
pub const PRIORITY_MAX: i64 = 1000;

/// DNS-label pattern for policy names.
const NAME_PATTERN: &str = "^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

/// Maximum DNS-label length.
const NAME_MAX_LEN: usize = 63;

/// Field-presence and format checks for the three admitted document kinds.
///
/// The contract mirrors what an HTTP or CLI admission layer needs: cheap,
/// deterministic checks with field-addressed diagnostics.
pub trait StructuralValidator {
    fn validate_policy(&self, policy: &Policy) -> StructuralResult<()>;
    fn validate_workload(&self, workload: &Workload) -> StructuralResult<()>;
    fn validate_automation_rule(&self, rule: &AutomationRule) -> StructuralResult<()>;
    fn validate_expression(&self, text: &str) -> StructuralResult<()>;
}

/// Default structural validator.
pub struct FieldValidator {
    name_pattern: Regex,
}

impl FieldValidator {
    /// Builds the validator, compiling the DNS-label name pattern.
    pub fn new() -> StructuralResult<Self> {
        Ok(Self {
            name_pattern: Regex::new(NAME_PATTERN)?,
        })
    }
}

impl StructuralValidator for FieldValidator {
    fn validate_policy(&self, policy: &Policy) -> StructuralResult<()> {
        let name = policy.metadata.name.trim();
        if name.is_empty() {
            return Err(StructuralError::EmptyField {
                entity: "policy",
                field: "metadata.name",
            });
        }
        if name.len() > NAME_MAX_LEN || !self.name_pattern.is_match(name) {
            return Err(StructuralError::Malformed {
                entity: "policy",
                field: "metadata.name",
                reason: format!(
                    "'{}' is not a DNS label (lowercase alphanumerics and '-', at most {} chars)",
                    name, NAME_MAX_LEN
                ),
            });
        }

        if policy.metadata.policy_type != policy.spec.policy_type {
            return Err(StructuralError::FieldMismatch {
                entity: "policy",
                left: "metadata.type",
                left_value: policy.metadata.policy_type.as_str().to_string(),
                right: "spec.type",
                right_value: policy.spec.policy_type.as_str().to_string(),
            });
        }

        let priority = policy.metadata.priority;
        if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
            return Err(StructuralError::OutOfRange {
                entity: "policy",
                field: "metadata.priority",
                value: priority,
                min: PRIORITY_MIN,
                max: PRIORITY_MAX,
            });
        }

        Ok(())
    }

    fn validate_workload(&self, workload: &Workload) -> StructuralResult<()> {
        if workload.id.trim().is_empty() {
            return Err(StructuralError::EmptyField {
                entity: "workload",
                field: "id",
            });
        }
        if workload.name.trim().is_empty() {
            return Err(StructuralError::EmptyField {
                entity: "workload",
                field: "name",
            });
        }
        // type and status are closed enums; membership holds by construction
        Ok(())
    }

    fn validate_automation_rule(&self, rule: &AutomationRule) -> StructuralResult<()> {
        if rule.trigger.trim().is_empty() {
            return Err(StructuralError::EmptyField {
                entity: "automation rule",
                field: "trigger",
            });
        }
        if rule.action.trim().is_empty() {
            return Err(StructuralError::EmptyField {
                entity: "automation rule",
                field: "action",
            });
        }
        Ok(())
    }

    fn validate_expression(&self, text: &str) -> StructuralResult<()> {
        if text.trim().is_empty() {
            return Err(StructuralError::EmptyField {
                entity: "expression",
                field: "text",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        PolicyMetadata, PolicySpec, PolicyType, ResourceRequirements, WorkloadStatus,
        WorkloadType,
    };
    use std::collections::HashMap;

    fn sample_policy() -> Policy {
        Policy {
            metadata: PolicyMetadata {
                name: "cut-costs".into(),
                policy_type: PolicyType::CostOptimization,
                status: "active".into(),
                priority: 100,
                namespace: "default".into(),
                labels: HashMap::new(),
                annotations: HashMap::new(),
            },
            spec: PolicySpec {
                policy_type: PolicyType::CostOptimization,
                target: None,
                objectives: vec![],
                constraints: vec![],
                rules: vec![],
                actions: vec![],
            },
        }
    }

    fn sample_workload() -> Workload {
        Workload {
            id: "wl-1".into(),
            name: "api".into(),
            workload_type: WorkloadType::Deployment,
            status: WorkloadStatus::Running,
            namespace: "default".into(),
            cluster_id: "c1".into(),
            node_id: "n1".into(),
            labels: HashMap::new(),
            annotations: HashMap::new(),
            requirements: ResourceRequirements::default(),
        }
    }

    #[test]
    fn test_valid_policy() {
        let v = FieldValidator::new().unwrap();
        assert!(v.validate_policy(&sample_policy()).is_ok());
    }

    #[test]
    fn test_empty_policy_name() {
        let v = FieldValidator::new().unwrap();
        let mut policy = sample_policy();
        policy.metadata.name = "".into();
        assert!(matches!(
            v.validate_policy(&policy),
            Err(StructuralError::EmptyField { field: "metadata.name", .. })
        ));
    }

    #[test]
    fn test_non_dns_name_rejected() {
        let v = FieldValidator::new().unwrap();
        for bad in ["Has_Caps", "-leading", "trailing-", "dots.inside"] {
            let mut policy = sample_policy();
            policy.metadata.name = bad.into();
            assert!(
                matches!(
                    v.validate_policy(&policy),
                    Err(StructuralError::Malformed { .. })
                ),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let v = FieldValidator::new().unwrap();
        let mut policy = sample_policy();
        policy.spec.policy_type = PolicyType::Security;
        assert!(matches!(
            v.validate_policy(&policy),
            Err(StructuralError::FieldMismatch { .. })
        ));
    }

    #[test]
    fn test_priority_bounds() {
        let v = FieldValidator::new().unwrap();
        for (value, ok) in [(1, true), (1000, true), (0, false), (1001, false)] {
            let mut policy = sample_policy();
            policy.metadata.priority = value;
            assert_eq!(v.validate_policy(&policy).is_ok(), ok, "priority {}", value);
        }
    }

    #[test]
    fn test_workload_required_fields() {
        let v = FieldValidator::new().unwrap();
        assert!(v.validate_workload(&sample_workload()).is_ok());

        let mut workload = sample_workload();
        workload.id = " ".into();
        assert!(matches!(
            v.validate_workload(&workload),
            Err(StructuralError::EmptyField { field: "id", .. })
        ));
    }

    #[test]
    fn test_automation_rule_required_fields() {
        let v = FieldValidator::new().unwrap();
        let rule = AutomationRule {
            trigger: "cpu-usage".into(),
            action: "scale-down".into(),
            conditions: vec![],
        };
        assert!(v.validate_automation_rule(&rule).is_ok());

        let rule = AutomationRule {
            trigger: "".into(),
            action: "scale-down".into(),
            conditions: vec![],
        };
        assert!(v.validate_automation_rule(&rule).is_err());
    }

    #[test]
    fn test_expression_presence() {
        let v = FieldValidator::new().unwrap();
        assert!(v.validate_expression("workload.cpu.usage > 0.5").is_ok());
        assert!(v.validate_expression("  ").is_err());
    }
}
