//! Built-in schema definitions
//!
//! Two schemas are pre-registered at initialization: `policy` and
//! `workload`. Field names, enums, and numeric bounds here are normative;
//! downstream consumers depend on rejecting out-of-range priorities and
//! objective weights.

/// Name the policy schema is registered under.
pub const POLICY_SCHEMA_NAME: &str = "policy";

/// Name the workload schema is registered under.
pub const WORKLOAD_SCHEMA_NAME: &str = "workload";

/// JSON-Schema for policy documents.
///
/// Requires `metadata.name` (DNS label), `metadata.type` from the policy
/// kind enum, and `spec.type`; bounds priority to 1..=1000 and objective
/// weight to 0.0..=1.0.
pub const POLICY_SCHEMA: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "policy",
  "type": "object",
  "required": ["metadata", "spec"],
  "properties": {
    "metadata": {
      "type": "object",
      "required": ["name", "type"],
      "properties": {
        "name": {
          "type": "string",
          "pattern": "^[a-z0-9]([-a-z0-9]*[a-z0-9])?$",
          "maxLength": 63
        },
        "type": {
          "type": "string",
          "enum": [
            "cost-optimization",
            "automation",
            "workload-priority",
            "security",
            "resource-quota"
          ]
        },
        "status": { "type": "string" },
        "priority": { "type": "integer", "minimum": 1, "maximum": 1000 },
        "namespace": { "type": "string" },
        "labels": {
          "type": "object",
          "additionalProperties": { "type": "string" }
        },
        "annotations": {
          "type": "object",
          "additionalProperties": { "type": "string" }
        }
      }
    },
    "spec": {
      "type": "object",
      "required": ["type"],
      "properties": {
        "type": {
          "type": "string",
          "enum": [
            "cost-optimization",
            "automation",
            "workload-priority",
            "security",
            "resource-quota"
          ]
        },
        "target": {
          "type": "object",
          "properties": {
            "kind": { "type": "string" },
            "selector": {
              "type": "object",
              "additionalProperties": { "type": "string" }
            }
          }
        },
        "objectives": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["type"],
            "properties": {
              "type": { "type": "string" },
              "weight": { "type": "number", "minimum": 0, "maximum": 1 },
              "target_value": { "type": "number" }
            }
          }
        },
        "constraints": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["type"],
            "properties": {
              "type": { "type": "string" },
              "operator": { "type": "string" },
              "value": {}
            }
          }
        },
        "rules": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["name", "condition", "action"],
            "properties": {
              "name": { "type": "string", "minLength": 1 },
              "condition": { "type": "string", "minLength": 1 },
              "action": { "type": "string", "minLength": 1 },
              "parameters": { "type": "object" }
            }
          }
        },
        "actions": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["type"],
            "properties": {
              "type": { "type": "string" },
              "parameters": { "type": "object" }
            }
          }
        }
      }
    }
  }
}"##;

/// JSON-Schema for workload documents.
pub const WORKLOAD_SCHEMA: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "workload",
  "type": "object",
  "required": ["id", "name", "type", "status"],
  "properties": {
    "id": { "type": "string", "minLength": 1 },
    "name": { "type": "string", "minLength": 1 },
    "type": {
      "type": "string",
      "enum": ["deployment", "statefulset", "daemonset", "job", "cronjob"]
    },
    "status": {
      "type": "string",
      "enum": ["running", "stopped", "pending", "failed"]
    },
    "namespace": { "type": "string" },
    "cluster_id": { "type": "string" },
    "node_id": { "type": "string" },
    "labels": {
      "type": "object",
      "additionalProperties": { "type": "string" }
    },
    "annotations": {
      "type": "object",
      "additionalProperties": { "type": "string" }
    },
    "requirements": {
      "type": "object",
      "properties": {
        "cpu": { "type": "number", "minimum": 0 },
        "memory": { "type": "number", "minimum": 0 },
        "storage": { "type": "number", "minimum": 0 }
      }
    }
  }
}"##;
