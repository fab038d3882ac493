//! Typed evaluation environments
//!
//! The environment is the primary safety boundary: expressions can only
//! reference the closed set of bindings enumerated here. There is no
//! reflection, no I/O, and no way to reach anything outside these shapes.

use std::collections::HashMap;

use super::ast::{Path, PathSegment};

/// The kinds an expression leaf can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Text,
    Flag,
}

impl ValueKind {
    /// Returns the kind name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Text => "string",
            ValueKind::Flag => "boolean",
        }
    }
}

/// A runtime value produced by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Flag(_) => ValueKind::Flag,
        }
    }
}

/// The shape (and representative value) of one environment node.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Numeric leaf with a representative sample value
    Number(f64),
    /// String leaf with a representative sample value
    Text(&'static str),
    /// Nested object of named fields
    Object(HashMap<String, Shape>),
    /// String-keyed map of strings; access requires `["key"]` indexing
    TextMap,
}

/// A closed, read-only evaluation environment.
///
/// Paths are resolved against the shape tree both at compile time (for
/// typing) and at evaluation time (for sample values).
pub struct EvalEnv {
    roots: HashMap<String, Shape>,
}

impl EvalEnv {
    /// The full admission environment: exactly three read-only root
    /// bindings (`workload`, `policy`, `cluster`) with fixed field shapes.
    pub fn full() -> Self {
        let mut workload = HashMap::new();
        workload.insert("id".into(), Shape::Text("wl-1"));
        workload.insert("name".into(), Shape::Text("workload"));
        workload.insert("type".into(), Shape::Text("deployment"));
        workload.insert("status".into(), Shape::Text("running"));
        workload.insert("namespace".into(), Shape::Text("default"));
        workload.insert("labels".into(), Shape::TextMap);
        workload.insert("cpu".into(), usage_limit(0.5, 1.0));
        workload.insert("memory".into(), usage_limit(0.6, 1.0));
        workload.insert("storage".into(), usage_limit(0.3, 1.0));

        let mut policy = HashMap::new();
        policy.insert("id".into(), Shape::Text("pol-1"));
        policy.insert("name".into(), Shape::Text("policy"));
        policy.insert("type".into(), Shape::Text("cost-optimization"));
        policy.insert("status".into(), Shape::Text("active"));
        policy.insert("priority".into(), Shape::Number(100.0));

        let mut resources = HashMap::new();
        resources.insert("cpu".into(), Shape::Number(64.0));
        resources.insert("memory".into(), Shape::Number(256.0));
        resources.insert("storage".into(), Shape::Number(1024.0));
        let mut cluster = HashMap::new();
        cluster.insert("resources".into(), Shape::Object(resources));

        let mut roots = HashMap::new();
        roots.insert("workload".into(), Shape::Object(workload));
        roots.insert("policy".into(), Shape::Object(policy));
        roots.insert("cluster".into(), Shape::Object(cluster));
        Self { roots }
    }

    /// The minimal numeric sub-environment conditions are exercised
    /// against: `workload.cpu.usage = 0.5` and `workload.memory.usage = 0.6`.
    pub fn condition_sample() -> Self {
        let mut cpu = HashMap::new();
        cpu.insert("usage".into(), Shape::Number(0.5));
        let mut memory = HashMap::new();
        memory.insert("usage".into(), Shape::Number(0.6));

        let mut workload = HashMap::new();
        workload.insert("cpu".into(), Shape::Object(cpu));
        workload.insert("memory".into(), Shape::Object(memory));

        let mut roots = HashMap::new();
        roots.insert("workload".into(), Shape::Object(workload));
        Self { roots }
    }

    /// Resolves a path to its kind, or an explanation of why it is not a
    /// valid reference into this environment.
    pub fn resolve(&self, path: &Path) -> Result<ValueKind, String> {
        let mut current: Option<&Shape> = None;

        for (i, segment) in path.segments.iter().enumerate() {
            let next = match (current, segment) {
                (None, PathSegment::Field(name)) => self
                    .roots
                    .get(name)
                    .ok_or_else(|| format!("undefined binding '{}'", name))?,
                (None, PathSegment::Key(_)) => {
                    return Err("path cannot start with key access".into());
                }
                (Some(Shape::Object(fields)), PathSegment::Field(name)) => {
                    fields.get(name).ok_or_else(|| {
                        format!("unknown field '{}' in '{}'", name, prefix(path, i))
                    })?
                }
                (Some(Shape::TextMap), PathSegment::Key(_)) => {
                    // Map access yields a string value
                    return if i + 1 == path.segments.len() {
                        Ok(ValueKind::Text)
                    } else {
                        Err(format!("'{}' does not nest further", prefix(path, i + 1)))
                    };
                }
                (Some(Shape::TextMap), PathSegment::Field(_)) => {
                    return Err(format!(
                        "'{}' is a map and requires [\"key\"] access",
                        prefix(path, i)
                    ));
                }
                (Some(_), PathSegment::Field(name)) => {
                    return Err(format!(
                        "'{}' has no field '{}'",
                        prefix(path, i),
                        name
                    ));
                }
                (Some(_), PathSegment::Key(_)) => {
                    return Err(format!("'{}' is not a map", prefix(path, i)));
                }
            };
            current = Some(next);
        }

        match current {
            Some(Shape::Number(_)) => Ok(ValueKind::Number),
            Some(Shape::Text(_)) => Ok(ValueKind::Text),
            Some(Shape::Object(_)) => Err(format!(
                "'{}' is an object, not a value",
                path
            )),
            Some(Shape::TextMap) => Err(format!(
                "'{}' is a map and requires [\"key\"] access",
                path
            )),
            None => Err("empty path".into()),
        }
    }

    /// Looks up the representative value at a path. Paths that resolve via
    /// [`EvalEnv::resolve`] always produce a value; map keys not present
    /// read as the empty string.
    pub fn lookup(&self, path: &Path) -> Option<Value> {
        let mut current: Option<&Shape> = None;

        for segment in &path.segments {
            current = match (current, segment) {
                (None, PathSegment::Field(name)) => Some(self.roots.get(name)?),
                (Some(Shape::Object(fields)), PathSegment::Field(name)) => {
                    Some(fields.get(name)?)
                }
                (Some(Shape::TextMap), PathSegment::Key(_)) => {
                    return Some(Value::Text(String::new()));
                }
                _ => return None,
            };
        }

        match current {
            Some(Shape::Number(n)) => Some(Value::Number(*n)),
            Some(Shape::Text(s)) => Some(Value::Text((*s).to_string())),
            _ => None,
        }
    }
}

fn usage_limit(usage: f64, limit: f64) -> Shape {
    let mut fields = HashMap::new();
    fields.insert("usage".into(), Shape::Number(usage));
    fields.insert("limit".into(), Shape::Number(limit));
    Shape::Object(fields)
}

fn prefix(path: &Path, len: usize) -> String {
    Path {
        segments: path.segments[..len].to_vec(),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parser::parse;
    use crate::expr::ast::Expr;

    fn path_of(src: &str) -> Path {
        match parse(src).unwrap() {
            Expr::Path(path) => path,
            other => panic!("expected path, got {:?}", other),
        }
    }

    #[test]
    fn test_full_env_resolves_documented_bindings() {
        let env = EvalEnv::full();
        assert_eq!(
            env.resolve(&path_of("workload.cpu.usage")).unwrap(),
            ValueKind::Number
        );
        assert_eq!(
            env.resolve(&path_of("policy.priority")).unwrap(),
            ValueKind::Number
        );
        assert_eq!(
            env.resolve(&path_of("cluster.resources.memory")).unwrap(),
            ValueKind::Number
        );
        assert_eq!(
            env.resolve(&path_of("workload.status")).unwrap(),
            ValueKind::Text
        );
    }

    #[test]
    fn test_undefined_binding_rejected() {
        let env = EvalEnv::full();
        let err = env.resolve(&path_of("node.cpu")).unwrap_err();
        assert!(err.contains("undefined binding"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let env = EvalEnv::full();
        let err = env.resolve(&path_of("workload.gpu.usage")).unwrap_err();
        assert!(err.contains("gpu"));
    }

    #[test]
    fn test_object_is_not_a_value() {
        let env = EvalEnv::full();
        assert!(env.resolve(&path_of("workload.cpu")).is_err());
    }

    #[test]
    fn test_label_key_access() {
        let env = EvalEnv::full();
        assert_eq!(
            env.resolve(&path_of(r#"workload.labels["team"]"#)).unwrap(),
            ValueKind::Text
        );
        // Bare map access without a key is rejected
        assert!(env.resolve(&path_of("workload.labels")).is_err());
    }

    #[test]
    fn test_sample_env_excludes_full_bindings() {
        let env = EvalEnv::condition_sample();
        assert!(env.resolve(&path_of("workload.cpu.usage")).is_ok());
        assert!(env.resolve(&path_of("policy.priority")).is_err());
        assert!(env.resolve(&path_of("workload.cpu.limit")).is_err());
    }

    #[test]
    fn test_sample_values() {
        let env = EvalEnv::condition_sample();
        assert_eq!(
            env.lookup(&path_of("workload.cpu.usage")),
            Some(Value::Number(0.5))
        );
        assert_eq!(
            env.lookup(&path_of("workload.memory.usage")),
            Some(Value::Number(0.6))
        );
    }
}
