//! Schema store error types

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A single schema violation, addressed by instance path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-pointer path into the offending document ("" for the root)
    pub path: String,
    /// Human-readable description of the violation
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Schema store errors
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema text is not a valid JSON-Schema document
    #[error("schema '{name}' failed to compile: {reason}")]
    Compile { name: String, reason: String },

    /// No schema registered under the given name
    #[error("schema '{0}' is not loaded")]
    NotLoaded(String),

    /// Payload could not be parsed into the JSON data model
    #[error("payload is not valid {format}: {reason}")]
    PayloadParse {
        format: &'static str,
        reason: String,
    },

    /// Payload violates the named schema; carries every violation found
    /// in one pass so callers get a complete correction list.
    #[error("payload violates schema '{name}': {}", summarize(.violations))]
    Violations {
        name: String,
        violations: Vec<Violation>,
    },
}

impl SchemaError {
    /// Returns the violation list when this is a [`SchemaError::Violations`].
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            SchemaError::Violations { violations, .. } => Some(violations),
            _ => None,
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violations_display_lists_all_entries() {
        let err = SchemaError::Violations {
            name: "policy".into(),
            violations: vec![
                Violation::new("/metadata/name", "is a required property"),
                Violation::new("/metadata/priority", "exceeds maximum 1000"),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("/metadata/name"));
        assert!(text.contains("/metadata/priority"));
    }

    #[test]
    fn test_root_violation_omits_path() {
        let v = Violation::new("", "expected object");
        assert_eq!(v.to_string(), "expected object");
    }
}
