//! Workload document types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported workload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadType {
    Deployment,
    Statefulset,
    Daemonset,
    Job,
    Cronjob,
}

impl WorkloadType {
    /// Returns the wire representation of this workload kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadType::Deployment => "deployment",
            WorkloadType::Statefulset => "statefulset",
            WorkloadType::Daemonset => "daemonset",
            WorkloadType::Job => "job",
            WorkloadType::Cronjob => "cronjob",
        }
    }
}

/// Observed workload lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadStatus {
    Running,
    Stopped,
    Pending,
    Failed,
}

impl WorkloadStatus {
    /// Returns the wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadStatus::Running => "running",
            WorkloadStatus::Stopped => "stopped",
            WorkloadStatus::Pending => "pending",
            WorkloadStatus::Failed => "failed",
        }
    }
}

/// Requested resource quantities for a workload.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub cpu: f64,

    #[serde(default)]
    pub memory: f64,

    #[serde(default)]
    pub storage: f64,
}

/// A schedulable unit whose resource usage is subject to policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workload {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub workload_type: WorkloadType,

    pub status: WorkloadStatus,

    #[serde(default)]
    pub namespace: String,

    #[serde(default)]
    pub cluster_id: String,

    #[serde(default)]
    pub node_id: String,

    #[serde(default)]
    pub labels: HashMap<String, String>,

    #[serde(default)]
    pub annotations: HashMap<String, String>,

    #[serde(default)]
    pub requirements: ResourceRequirements,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workload_round_trip() {
        let doc = json!({
            "id": "wl-42",
            "name": "billing-api",
            "type": "deployment",
            "status": "running",
            "namespace": "prod",
            "requirements": { "cpu": 0.5, "memory": 512.0, "storage": 10.0 }
        });

        let workload: Workload = serde_json::from_value(doc).unwrap();
        assert_eq!(workload.workload_type, WorkloadType::Deployment);
        assert_eq!(workload.status, WorkloadStatus::Running);
        assert_eq!(workload.requirements.memory, 512.0);
    }

    #[test]
    fn test_unknown_workload_type_rejected() {
        let doc = json!({
            "id": "wl-1",
            "name": "x",
            "type": "replicaset",
            "status": "running"
        });
        assert!(serde_json::from_value::<Workload>(doc).is_err());
    }
}
