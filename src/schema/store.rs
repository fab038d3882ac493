//! Compiled-schema store
//!
//! Compiles named JSON-Schema documents once and validates JSON or YAML
//! payloads against them. The compiled map is read-mostly: validation takes
//! the read lock, (re)loading takes the write lock, so callers never observe
//! a store mid-reload.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use jsonschema::JSONSchema;
use serde_json::Value;

use super::builtin::{POLICY_SCHEMA, POLICY_SCHEMA_NAME, WORKLOAD_SCHEMA, WORKLOAD_SCHEMA_NAME};
use super::errors::{SchemaError, SchemaResult, Violation};

/// Stores compiled schemas keyed by name.
///
/// Compiled schemas are immutable once built; re-loading a name replaces
/// the previous compilation wholesale.
pub struct SchemaStore {
    schemas: RwLock<HashMap<String, JSONSchema>>,
}

impl SchemaStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store with the built-in `policy` and `workload` schemas
    /// already registered.
    pub fn with_builtin() -> SchemaResult<Self> {
        let store = Self::new();
        store.load_builtin()?;
        Ok(store)
    }

    /// Compiles `text` as a JSON-Schema document and registers it under
    /// `name`, replacing any previous registration.
    pub fn load(&self, name: &str, text: &str) -> SchemaResult<()> {
        let compiled = compile_schema(name, text)?;
        self.write_schemas().insert(name.to_string(), compiled);
        Ok(())
    }

    /// Registers the two built-in schemas, replacing the entire store
    /// contents. Both compile before the swap, so a compile failure leaves
    /// the previous registrations intact.
    pub fn load_builtin(&self) -> SchemaResult<()> {
        let mut fresh = HashMap::new();
        fresh.insert(
            POLICY_SCHEMA_NAME.to_string(),
            compile_schema(POLICY_SCHEMA_NAME, POLICY_SCHEMA)?,
        );
        fresh.insert(
            WORKLOAD_SCHEMA_NAME.to_string(),
            compile_schema(WORKLOAD_SCHEMA_NAME, WORKLOAD_SCHEMA)?,
        );
        *self.write_schemas() = fresh;
        Ok(())
    }

    /// Validates a JSON payload against the named schema.
    pub fn validate(&self, name: &str, payload: &str) -> SchemaResult<()> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| SchemaError::PayloadParse {
                format: "JSON",
                reason: e.to_string(),
            })?;
        self.validate_value(name, &value)
    }

    /// Validates a YAML payload against the named schema.
    ///
    /// The payload is re-encoded losslessly into the JSON data model before
    /// validation; numeric and boolean typing is preserved, which schema
    /// `type` constraints depend on.
    pub fn validate_yaml(&self, name: &str, payload: &str) -> SchemaResult<()> {
        let value: Value =
            serde_norway::from_str(payload).map_err(|e| SchemaError::PayloadParse {
                format: "YAML",
                reason: e.to_string(),
            })?;
        self.validate_value(name, &value)
    }

    /// Validates an already-parsed JSON value against the named schema.
    ///
    /// On failure the error carries every violation found in one pass,
    /// each addressed by its instance path.
    pub fn validate_value(&self, name: &str, value: &Value) -> SchemaResult<()> {
        let schemas = self.read_schemas();
        let schema = schemas
            .get(name)
            .ok_or_else(|| SchemaError::NotLoaded(name.to_string()))?;

        let violations: Vec<Violation> = match schema.validate(value) {
            Ok(()) => return Ok(()),
            Err(errors) => errors
                .map(|e| Violation::new(e.instance_path.to_string(), e.to_string()))
                .collect(),
        };

        Err(SchemaError::Violations {
            name: name.to_string(),
            violations,
        })
    }

    /// Returns the registered schema names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_schemas().keys().cloned().collect();
        names.sort();
        names
    }

    /// Checks whether a schema is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.read_schemas().contains_key(name)
    }

    /// Returns the number of registered schemas.
    pub fn len(&self) -> usize {
        self.read_schemas().len()
    }

    /// Checks whether the store holds no schemas.
    pub fn is_empty(&self) -> bool {
        self.read_schemas().is_empty()
    }

    // A poisoned lock means a panic interrupted another thread mid-update;
    // the map itself is still structurally sound, so recover the guard.
    fn read_schemas(&self) -> RwLockReadGuard<'_, HashMap<String, JSONSchema>> {
        self.schemas.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_schemas(&self) -> RwLockWriteGuard<'_, HashMap<String, JSONSchema>> {
        self.schemas.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses and compiles one schema text.
fn compile_schema(name: &str, text: &str) -> SchemaResult<JSONSchema> {
    let document: Value = serde_json::from_str(text).map_err(|e| SchemaError::Compile {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    JSONSchema::compile(&document).map_err(|e| SchemaError::Compile {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_policy() -> Value {
        json!({
            "metadata": { "name": "cut-costs", "type": "cost-optimization", "priority": 10 },
            "spec": {
                "type": "cost-optimization",
                "objectives": [ { "type": "cost", "weight": 0.8 } ],
                "rules": [
                    { "name": "r1", "condition": "workload.cpu.usage > 0.8", "action": "scale-down" }
                ]
            }
        })
    }

    #[test]
    fn test_builtin_schemas_compile() {
        let store = SchemaStore::with_builtin().unwrap();
        assert_eq!(store.names(), vec!["policy", "workload"]);
    }

    #[test]
    fn test_valid_policy_accepted() {
        let store = SchemaStore::with_builtin().unwrap();
        assert!(store.validate_value("policy", &valid_policy()).is_ok());
    }

    #[test]
    fn test_unknown_schema_name() {
        let store = SchemaStore::with_builtin().unwrap();
        let err = store.validate_value("pod", &valid_policy()).unwrap_err();
        assert!(matches!(err, SchemaError::NotLoaded(_)));
    }

    #[test]
    fn test_malformed_schema_text_rejected() {
        let store = SchemaStore::new();
        let err = store.load("broken", "{ not json").unwrap_err();
        assert!(matches!(err, SchemaError::Compile { .. }));
    }

    #[test]
    fn test_invalid_draft_syntax_rejected() {
        let store = SchemaStore::new();
        // "type" must be a string or array of strings in draft-07
        let err = store.load("bad", r#"{ "type": 42 }"#).unwrap_err();
        assert!(matches!(err, SchemaError::Compile { .. }));
    }

    #[test]
    fn test_payload_parse_error() {
        let store = SchemaStore::with_builtin().unwrap();
        let err = store.validate("policy", "{ truncated").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::PayloadParse { format: "JSON", .. }
        ));
    }

    #[test]
    fn test_out_of_range_priority_rejected() {
        let store = SchemaStore::with_builtin().unwrap();
        let mut doc = valid_policy();
        doc["metadata"]["priority"] = json!(1001);
        let err = store.validate_value("policy", &doc).unwrap_err();
        let violations = err.violations().unwrap();
        assert!(violations.iter().any(|v| v.path.contains("priority")));
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let store = SchemaStore::with_builtin().unwrap();
        let mut doc = valid_policy();
        doc["spec"]["objectives"][0]["weight"] = json!(1.5);
        assert!(store.validate_value("policy", &doc).is_err());
    }

    #[test]
    fn test_all_violations_reported_in_one_pass() {
        let store = SchemaStore::with_builtin().unwrap();
        let doc = json!({
            "metadata": { "name": "Bad_Name!", "type": "cost-optimization", "priority": 0 },
            "spec": { "type": "cost-optimization" }
        });
        let err = store.validate_value("policy", &doc).unwrap_err();
        // Both the name pattern and the priority bound are reported
        assert!(err.violations().unwrap().len() >= 2);
    }

    #[test]
    fn test_workload_enum_membership() {
        let store = SchemaStore::with_builtin().unwrap();
        let doc = json!({
            "id": "w1", "name": "api", "type": "replicaset", "status": "running"
        });
        assert!(store.validate_value("workload", &doc).is_err());

        let doc = json!({
            "id": "w1", "name": "api", "type": "deployment", "status": "running"
        });
        assert!(store.validate_value("workload", &doc).is_ok());
    }

    #[test]
    fn test_yaml_preserves_typing() {
        let store = SchemaStore::with_builtin().unwrap();
        let yaml = r#"
id: w1
name: api
type: deployment
status: running
requirements:
  cpu: 0.5
  memory: 512
"#;
        assert!(store.validate_yaml("workload", yaml).is_ok());
    }

    #[test]
    fn test_yaml_syntax_error() {
        let store = SchemaStore::with_builtin().unwrap();
        let err = store
            .validate_yaml("workload", "id: [unclosed")
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::PayloadParse { format: "YAML", .. }
        ));
    }

    #[test]
    fn test_reload_is_idempotent() {
        let store = SchemaStore::with_builtin().unwrap();
        let doc = valid_policy();
        assert!(store.validate_value("policy", &doc).is_ok());

        store.load_builtin().unwrap();
        assert!(store.validate_value("policy", &doc).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reload_replaces_extra_schemas() {
        let store = SchemaStore::with_builtin().unwrap();
        store
            .load("extra", r#"{ "type": "object" }"#)
            .unwrap();
        assert_eq!(store.len(), 3);

        // Full replace, not incremental patch
        store.load_builtin().unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.contains("extra"));
    }
}
