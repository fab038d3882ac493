//! Automation rule document type

use serde::{Deserialize, Serialize};

/// A reactive trigger/action binding with optional guard conditions.
///
/// `trigger` and `action` must match the recognized taxonomies; each entry
/// of `conditions` must independently pass the expression-safety contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationRule {
    pub trigger: String,
    pub action: String,

    #[serde(default)]
    pub conditions: Vec<String>,
}
