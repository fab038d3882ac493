//! Expression safety analyzer
//!
//! Decides whether rule and condition text is admissible. Safety is
//! two-tier: the closed typed environment is the primary boundary (no
//! reflection, no I/O, no unbounded iteration exists in the grammar), and a
//! textual denylist scan is a secondary tripwire for content the control
//! plane refuses to execute even if it were expressible.
//!
//! The textual scans run before compilation so a hazardous or malformed
//! text is reported as such rather than as a generic parse failure.

use regex::Regex;

use crate::model::{AutomationRule, PolicyRule};

use super::compile::{compile, CompiledExpr};
use super::env::{EvalEnv, Value, ValueKind};
use super::errors::{ExprError, ExprResult};
use super::eval::evaluate;

/// Textual patterns the analyzer refuses outright: process and eval
/// primitives, dunder-style names, `os`/`sys`/`runtime`-qualified calls,
/// and control primitives.
const DENYLIST: &[&str] = &[
    r"(?i)\b(exec|system|eval|import)\s*\(",
    r"(?i)\.\s*(exec|system|eval|import)\b",
    r"__\w+",
    r"(?i)\b(os|sys|runtime)\s*\.\s*\w+\s*\(",
    r"(?i)\b(panic|recover|defer)\s*\(",
];

/// Action vocabulary; an action is accepted when it contains one of these
/// case-insensitively, or carries the `custom-` escape-hatch prefix.
const ACTION_VOCABULARY: &[&str] = &[
    "scale-up",
    "scale-down",
    "scale-workload",
    "reduce-cpu",
    "reduce-memory",
    "reduce-storage",
    "optimize-storage",
    "resource-adjustment",
    "notification",
    "alert",
    "log",
    "enable",
    "disable",
    "suspend",
];

/// Trigger vocabulary; matched case-insensitively by containment.
const TRIGGER_VOCABULARY: &[&str] = &[
    "event-based",
    "time-based",
    "threshold-based",
    "schedule-based",
    "condition-based",
    "metric-based",
    "cpu-usage",
    "memory-usage",
    "workload-created",
    "workload-updated",
    "workload-deleted",
    "policy-violation",
];

/// Validates expressions, conditions, actions, triggers, and rules against
/// the admission safety contract.
pub struct ExpressionAnalyzer {
    denylist: Vec<Regex>,
    full_env: EvalEnv,
    sample_env: EvalEnv,
}

impl ExpressionAnalyzer {
    /// Builds an analyzer with the fixed denylist and evaluation
    /// environments.
    pub fn new() -> ExprResult<Self> {
        let mut denylist = Vec::with_capacity(DENYLIST.len());
        for pattern in DENYLIST {
            denylist.push(Regex::new(pattern)?);
        }
        Ok(Self {
            denylist,
            full_env: EvalEnv::full(),
            sample_env: EvalEnv::condition_sample(),
        })
    }

    /// Validates that an expression is syntactically well-formed, grounded
    /// in the evaluation context, and free of denylisted content.
    pub fn validate_expression(&self, text: &str) -> ExprResult<()> {
        self.compile_expression(text).map(|_| ())
    }

    /// Validates a gating condition: everything `validate_expression`
    /// checks, plus a compile-and-evaluate pass against representative
    /// sample values that must produce a boolean.
    pub fn validate_condition(&self, text: &str) -> ExprResult<()> {
        self.validate_expression(text)?;

        let compiled = compile(text, &self.sample_env)
            .map_err(|e| ExprError::ConditionCompile(e.to_string()))?;
        let value = evaluate(compiled.ast(), &self.sample_env)
            .map_err(|e| ExprError::ConditionEval(e.to_string()))?;

        match value {
            Value::Flag(_) => Ok(()),
            other => Err(ExprError::ConditionNotBoolean(other.kind().as_str())),
        }
    }

    /// Validates an action string against the action taxonomy.
    pub fn validate_action(&self, text: &str) -> ExprResult<()> {
        let lowered = text.trim().to_lowercase();
        if lowered.starts_with("custom-") {
            return Ok(());
        }
        if ACTION_VOCABULARY.iter().any(|known| lowered.contains(known)) {
            return Ok(());
        }
        Err(ExprError::UnknownAction(text.to_string()))
    }

    /// Validates a trigger string against the trigger taxonomy.
    pub fn validate_trigger(&self, text: &str) -> ExprResult<()> {
        let lowered = text.trim().to_lowercase();
        if TRIGGER_VOCABULARY.iter().any(|known| lowered.contains(known)) {
            return Ok(());
        }
        Err(ExprError::UnknownTrigger(text.to_string()))
    }

    /// Validates a policy rule: required fields, then condition and action.
    pub fn validate_rule(&self, rule: &PolicyRule) -> ExprResult<()> {
        if rule.name.trim().is_empty() {
            return Err(ExprError::MissingRuleField {
                rule: rule.name.clone(),
                field: "name",
            });
        }
        if rule.condition.trim().is_empty() {
            return Err(ExprError::MissingRuleField {
                rule: rule.name.clone(),
                field: "condition",
            });
        }
        if rule.action.trim().is_empty() {
            return Err(ExprError::MissingRuleField {
                rule: rule.name.clone(),
                field: "action",
            });
        }

        self.validate_condition(&rule.condition)
            .map_err(|e| ExprError::Rule {
                rule: rule.name.clone(),
                source: Box::new(e),
            })?;
        self.validate_action(&rule.action)
            .map_err(|e| ExprError::Rule {
                rule: rule.name.clone(),
                source: Box::new(e),
            })
    }

    /// Validates an automation rule: trigger and action taxonomies, plus
    /// every guard condition independently.
    pub fn validate_automation_rule(&self, rule: &AutomationRule) -> ExprResult<()> {
        if rule.trigger.trim().is_empty() {
            return Err(ExprError::MissingAutomationField("trigger"));
        }
        self.validate_trigger(&rule.trigger)?;

        if rule.action.trim().is_empty() {
            return Err(ExprError::MissingAutomationField("action"));
        }
        self.validate_action(&rule.action)?;

        for (index, condition) in rule.conditions.iter().enumerate() {
            self.validate_condition(condition)
                .map_err(|e| ExprError::ConditionAt {
                    index,
                    source: Box::new(e),
                })?;
        }
        Ok(())
    }

    /// Full expression admission pipeline; returns the compiled form for
    /// callers that want the typed result.
    fn compile_expression(&self, text: &str) -> ExprResult<CompiledExpr> {
        if text.trim().is_empty() {
            return Err(ExprError::EmptyExpression);
        }

        for pattern in &self.denylist {
            if let Some(found) = pattern.find(text) {
                return Err(ExprError::ForbiddenPattern(found.as_str().to_string()));
            }
        }

        scan_balance(text, '(', ')', ExprError::UnbalancedParentheses)?;
        scan_balance(text, '[', ']', ExprError::UnbalancedBrackets)?;

        let compiled = compile(text, &self.full_env)?;
        if compiled.roots().is_empty() {
            return Err(ExprError::Ungrounded);
        }
        Ok(compiled)
    }

    /// The result kind an expression would produce, for advanced callers.
    pub fn expression_kind(&self, text: &str) -> ExprResult<ValueKind> {
        self.compile_expression(text).map(|c| c.result_kind())
    }
}

/// Running-counter balance scan; the counter must never go negative and
/// must end at zero.
fn scan_balance(text: &str, open: char, close: char, err: ExprError) -> ExprResult<()> {
    let mut depth: i32 = 0;
    for c in text.chars() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth < 0 {
                return Err(err);
            }
        }
    }
    if depth != 0 {
        return Err(err);
    }
    Ok(())
}
