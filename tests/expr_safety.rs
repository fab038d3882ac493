//! Expression Safety Invariant Tests
//!
//! Properties of the expression analyzer observed through the public API:
//! - Denylisted text is rejected before any parse attempt
//! - Expressions must reference at least one known document root
//! - Balance defects are named as such, not as generic syntax errors
//! - Conditions must compile and evaluate to a boolean
//! - Action and trigger names come from a closed vocabulary

use costguard::expr::{ExprError, ExpressionAnalyzer, ValueKind};
use costguard::model::{AutomationRule, PolicyRule};
use std::collections::HashMap;

// =============================================================================
// Helper Functions
// =============================================================================

fn analyzer() -> ExpressionAnalyzer {
    ExpressionAnalyzer::new().unwrap()
}

fn rule(name: &str, condition: &str, action: &str) -> PolicyRule {
    PolicyRule {
        name: name.into(),
        condition: condition.into(),
        action: action.into(),
        parameters: HashMap::new(),
    }
}

// =============================================================================
// Denylist Tests
// =============================================================================

/// Call-shaped and dunder text never reaches the parser.
#[test]
fn test_denylist_rejects_hostile_text() {
    let a = analyzer();
    for expr in [
        "exec(\"rm -rf /\")",
        "system('reboot')",
        "eval(workload.name)",
        "import(\"net\")",
        "workload.__proto__",
        "os.Exit(1)",
        "runtime.GC()",
        "panic(\"boom\")",
    ] {
        assert!(
            matches!(
                a.validate_expression(expr),
                Err(ExprError::ForbiddenPattern(_))
            ),
            "expected denylist rejection for {expr:?}"
        );
    }
}

/// Plain field paths that merely contain denylisted words as substrings
/// of larger identifiers are not rejected by the denylist.
#[test]
fn test_denylist_is_not_substring_matching() {
    let a = analyzer();
    // "executor" contains "exec" but is not a call
    assert!(a
        .validate_expression("workload.labels[\"executor\"] == \"batch\"")
        .is_ok());
}

// =============================================================================
// Grounding Tests
// =============================================================================

/// Pure literals reference no document root and are refused.
#[test]
fn test_literal_only_expressions_ungrounded() {
    let a = analyzer();
    assert!(matches!(
        a.validate_expression("1 + 2 > 1"),
        Err(ExprError::Ungrounded)
    ));
    assert!(matches!(
        a.validate_expression("true && false"),
        Err(ExprError::Ungrounded)
    ));
}

/// Any known root grounds the whole expression.
#[test]
fn test_known_roots_ground_expressions() {
    let a = analyzer();
    assert!(a.validate_expression("workload.cpu.usage > 0.8").is_ok());
    assert!(a.validate_expression("policy.priority >= 100").is_ok());
    assert!(a
        .validate_expression("cluster.resources.memory < 0.9")
        .is_ok());
}

/// Unknown roots fail compilation, not grounding.
#[test]
fn test_unknown_root_is_a_compile_error() {
    let a = analyzer();
    let err = a.validate_expression("node.cpu.usage > 0.5").unwrap_err();
    assert!(matches!(err, ExprError::Syntax(_)), "got {err:?}");
}

// =============================================================================
// Balance and Syntax Tests
// =============================================================================

/// Unbalanced delimiters are reported by name.
#[test]
fn test_balance_defects_named() {
    let a = analyzer();
    assert!(matches!(
        a.validate_expression("workload.cpu.usage > 0)"),
        Err(ExprError::UnbalancedParentheses)
    ));
    assert!(matches!(
        a.validate_expression("(workload.cpu.usage > 0"),
        Err(ExprError::UnbalancedParentheses)
    ));
    assert!(matches!(
        a.validate_expression("workload.labels[\"team\" == \"ml\""),
        Err(ExprError::UnbalancedBrackets)
    ));
}

/// A balanced but deeply nested expression is rejected with a syntax
/// diagnostic instead of exhausting the stack.
#[test]
fn test_deeply_nested_expression_rejected() {
    let a = analyzer();
    let src = format!(
        "{}workload.cpu.usage > 0.5{}",
        "(".repeat(200_000),
        ")".repeat(200_000)
    );
    match a.validate_expression(&src) {
        Err(ExprError::Syntax(msg)) => assert!(msg.contains("nests deeper")),
        other => panic!("expected nesting rejection, got {:?}", other),
    }

    let chained = vec!["workload.cpu.usage > 0.5"; 100_000].join(" && ");
    assert!(matches!(
        a.validate_expression(&chained),
        Err(ExprError::Syntax(_))
    ));
}

#[test]
fn test_empty_expression_rejected() {
    let a = analyzer();
    assert!(matches!(
        a.validate_expression(""),
        Err(ExprError::EmptyExpression)
    ));
    assert!(matches!(
        a.validate_expression("   "),
        Err(ExprError::EmptyExpression)
    ));
}

/// Assignment and call syntax are outside the grammar.
#[test]
fn test_mutation_syntax_rejected() {
    let a = analyzer();
    assert!(matches!(
        a.validate_expression("workload.status = \"stopped\""),
        Err(ExprError::Syntax(_))
    ));
    assert!(matches!(
        a.validate_expression("workload.scale(3)"),
        Err(ExprError::Syntax(_))
    ));
}

/// Type confusion is caught without evaluation.
#[test]
fn test_type_mismatch_rejected() {
    let a = analyzer();
    assert!(matches!(
        a.validate_expression("workload.name > 0.5"),
        Err(ExprError::Syntax(_))
    ));
    assert!(matches!(
        a.validate_expression("workload.cpu.usage && true"),
        Err(ExprError::Syntax(_))
    ));
}

/// Well-typed expressions report their result kind.
#[test]
fn test_expression_kind() {
    let a = analyzer();
    assert_eq!(
        a.expression_kind("workload.cpu.usage > 0.8").unwrap(),
        ValueKind::Flag
    );
    assert_eq!(
        a.expression_kind("workload.cpu.usage * 2").unwrap(),
        ValueKind::Number
    );
    assert_eq!(
        a.expression_kind("workload.name").unwrap(),
        ValueKind::Text
    );
}

// =============================================================================
// Condition Tests
// =============================================================================

/// A condition must evaluate to a boolean over the sample document.
#[test]
fn test_condition_must_be_boolean() {
    let a = analyzer();
    assert!(a.validate_condition("workload.cpu.usage > 0.8").is_ok());
    assert!(matches!(
        a.validate_condition("workload.cpu.usage + 0.1"),
        Err(ExprError::ConditionNotBoolean(_))
    ));
}

/// Conditions over fields absent from the sample document fail with a
/// compile diagnostic rather than a panic.
#[test]
fn test_condition_over_unsampled_field() {
    let a = analyzer();
    assert!(matches!(
        a.validate_condition("workload.storage.usage > 0.8"),
        Err(ExprError::ConditionCompile(_))
    ));
}

/// Division by a zero-valued sample field surfaces as an eval error.
#[test]
fn test_condition_eval_errors_surface() {
    let a = analyzer();
    let err = a
        .validate_condition("workload.cpu.usage / (workload.cpu.usage - 0.5) > 1")
        .unwrap_err();
    assert!(matches!(err, ExprError::ConditionEval(_)), "got {err:?}");
}

// =============================================================================
// Vocabulary Tests
// =============================================================================

#[test]
fn test_action_vocabulary() {
    let a = analyzer();
    for action in ["scale-up", "scale-down", "notification", "alert", "log"] {
        assert!(a.validate_action(action).is_ok(), "expected ok: {action}");
    }
    // Containment and case-insensitivity widen the match
    assert!(a.validate_action("scale-up-replicas").is_ok());
    assert!(a.validate_action("Scale-Down").is_ok());
    // Prefixed extension point
    assert!(a.validate_action("custom-rebalance").is_ok());

    assert!(matches!(
        a.validate_action("delete-everything"),
        Err(ExprError::UnknownAction(_))
    ));
}

#[test]
fn test_trigger_vocabulary() {
    let a = analyzer();
    for trigger in ["event-based", "threshold-based", "cpu-usage", "policy-violation"] {
        assert!(a.validate_trigger(trigger).is_ok(), "expected ok: {trigger}");
    }
    assert!(matches!(
        a.validate_trigger("on-coffee-break"),
        Err(ExprError::UnknownTrigger(_))
    ));
}

// =============================================================================
// Rule-Level Tests
// =============================================================================

/// A rule failure names the rule it came from.
#[test]
fn test_rule_errors_name_the_rule() {
    let a = analyzer();
    let bad = rule("burst-guard", "workload.cpu.usage >", "scale-up");
    let err = a.validate_rule(&bad).unwrap_err();
    match err {
        ExprError::Rule { rule, source } => {
            assert_eq!(rule, "burst-guard");
            assert!(matches!(*source, ExprError::Syntax(_)));
        }
        other => panic!("expected rule wrapper, got {other:?}"),
    }
}

#[test]
fn test_rule_missing_fields() {
    let a = analyzer();
    let err = a.validate_rule(&rule("", "workload.cpu.usage > 0.5", "scale-up"));
    assert!(matches!(
        err,
        Err(ExprError::MissingRuleField { field: "name", .. })
    ));
    let err = a.validate_rule(&rule("r", "", "scale-up"));
    assert!(matches!(
        err,
        Err(ExprError::MissingRuleField {
            field: "condition",
            ..
        })
    ));
    let err = a.validate_rule(&rule("r", "workload.cpu.usage > 0.5", ""));
    assert!(matches!(
        err,
        Err(ExprError::MissingRuleField { field: "action", .. })
    ));
}

/// Automation rules validate trigger, action, and each condition in order.
#[test]
fn test_automation_rule_validation() {
    let a = analyzer();
    let good = AutomationRule {
        trigger: "memory-usage".into(),
        action: "reduce-memory".into(),
        conditions: vec!["workload.memory.usage > 0.9".into()],
    };
    assert!(a.validate_automation_rule(&good).is_ok());

    let bad_condition = AutomationRule {
        conditions: vec![
            "workload.memory.usage > 0.5".into(),
            "1 + 1 > 1".into(),
        ],
        ..good.clone()
    };
    match a.validate_automation_rule(&bad_condition).unwrap_err() {
        ExprError::ConditionAt { index, source } => {
            assert_eq!(index, 1);
            assert!(matches!(*source, ExprError::Ungrounded));
        }
        other => panic!("expected indexed condition error, got {other:?}"),
    }
}
