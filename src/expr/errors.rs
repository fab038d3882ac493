//! Expression analyzer error types

use thiserror::Error;

/// Result type for expression operations
pub type ExprResult<T> = Result<T, ExprError>;

/// Expression safety errors
#[derive(Debug, Error)]
pub enum ExprError {
    /// Expression text is empty
    #[error("expression is empty")]
    EmptyExpression,

    /// Expression cannot be compiled against the evaluation environment
    /// (malformed grammar, undefined identifiers, type mismatches)
    #[error("expression syntax error: {0}")]
    Syntax(String),

    /// Expression text matches a denylisted dangerous pattern
    #[error("expression contains forbidden pattern: {0}")]
    ForbiddenPattern(String),

    /// Expression references none of the evaluation roots
    #[error("expression references none of 'workload', 'policy', 'cluster'")]
    Ungrounded,

    /// Parentheses do not balance
    #[error("unbalanced parentheses in expression")]
    UnbalancedParentheses,

    /// Square brackets do not balance
    #[error("unbalanced brackets in expression")]
    UnbalancedBrackets,

    /// Condition failed to compile against the sample context
    #[error("condition failed to compile against sample context: {0}")]
    ConditionCompile(String),

    /// Condition failed to evaluate with sample values
    #[error("condition failed to evaluate: {0}")]
    ConditionEval(String),

    /// Condition evaluated to a non-boolean result
    #[error("condition evaluates to {0}, expected boolean")]
    ConditionNotBoolean(&'static str),

    /// Action string matches nothing in the action taxonomy
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// Trigger string matches nothing in the trigger taxonomy
    #[error("unknown trigger '{0}'")]
    UnknownTrigger(String),

    /// A policy rule field is absent or empty
    #[error("rule '{rule}' is missing required field '{field}'")]
    MissingRuleField { rule: String, field: &'static str },

    /// An automation rule field is absent or empty
    #[error("automation rule is missing required field '{0}'")]
    MissingAutomationField(&'static str),

    /// A policy rule failed a delegated check
    #[error("rule '{rule}': {source}")]
    Rule {
        rule: String,
        #[source]
        source: Box<ExprError>,
    },

    /// An automation rule condition failed, identified by index
    #[error("condition[{index}]: {source}")]
    ConditionAt {
        index: usize,
        #[source]
        source: Box<ExprError>,
    },

    /// A denylist pattern failed to compile
    #[error("denylist pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}
