//! Expression compilation: parse plus type-check
//!
//! Compilation proves an expression well-formed against a specific
//! environment before anything is ever evaluated. The checker also records
//! which root bindings the expression references, which the analyzer uses
//! for the grounding requirement.

use std::collections::BTreeSet;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::env::{EvalEnv, ValueKind};
use super::errors::{ExprError, ExprResult};
use super::parser::{nesting_limit, parse, MAX_NESTING};

/// A type-checked expression bound to one environment's shapes.
#[derive(Debug)]
pub struct CompiledExpr {
    ast: Expr,
    result: ValueKind,
    roots: BTreeSet<String>,
}

impl CompiledExpr {
    /// The checked AST.
    pub fn ast(&self) -> &Expr {
        &self.ast
    }

    /// The kind the expression produces when evaluated.
    pub fn result_kind(&self) -> ValueKind {
        self.result
    }

    /// Root bindings the expression references, sorted.
    pub fn roots(&self) -> &BTreeSet<String> {
        &self.roots
    }
}

/// Compiles `text` against `env`.
pub fn compile(text: &str, env: &EvalEnv) -> ExprResult<CompiledExpr> {
    let ast = parse(text)?;
    let mut roots = BTreeSet::new();
    let result = check(&ast, env, &mut roots, 0)?;
    Ok(CompiledExpr { ast, result, roots })
}

// The parser bounds group and unary nesting, but long operator chains still
// produce deep ASTs; the depth parameter bounds checker recursion the same
// way.
fn check(
    expr: &Expr,
    env: &EvalEnv,
    roots: &mut BTreeSet<String>,
    depth: usize,
) -> ExprResult<ValueKind> {
    if depth >= MAX_NESTING {
        return Err(nesting_limit());
    }
    match expr {
        Expr::Number(_) => Ok(ValueKind::Number),
        Expr::Str(_) => Ok(ValueKind::Text),
        Expr::Bool(_) => Ok(ValueKind::Flag),
        Expr::Path(path) => {
            if let Some(root) = path.root() {
                roots.insert(root.to_string());
            }
            env.resolve(path).map_err(ExprError::Syntax)
        }
        Expr::Unary { op, operand } => {
            let kind = check(operand, env, roots, depth + 1)?;
            match op {
                UnaryOp::Not if kind == ValueKind::Flag => Ok(ValueKind::Flag),
                UnaryOp::Neg if kind == ValueKind::Number => Ok(ValueKind::Number),
                _ => Err(ExprError::Syntax(format!(
                    "operator '{}' cannot apply to {}",
                    op.as_str(),
                    kind.as_str()
                ))),
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let left = check(lhs, env, roots, depth + 1)?;
            let right = check(rhs, env, roots, depth + 1)?;
            check_binary(*op, left, right)
        }
    }
}

fn check_binary(op: BinaryOp, left: ValueKind, right: ValueKind) -> ExprResult<ValueKind> {
    use BinaryOp::*;
    match op {
        Or | And => {
            if left == ValueKind::Flag && right == ValueKind::Flag {
                Ok(ValueKind::Flag)
            } else {
                Err(type_error(op, left, right, "boolean operands"))
            }
        }
        Eq | Ne => {
            if left == right {
                Ok(ValueKind::Flag)
            } else {
                Err(type_error(op, left, right, "operands of the same kind"))
            }
        }
        Lt | Le | Gt | Ge => {
            let comparable = (left == ValueKind::Number && right == ValueKind::Number)
                || (left == ValueKind::Text && right == ValueKind::Text);
            if comparable {
                Ok(ValueKind::Flag)
            } else {
                Err(type_error(op, left, right, "two numbers or two strings"))
            }
        }
        Add | Sub | Mul | Div | Rem => {
            if left == ValueKind::Number && right == ValueKind::Number {
                Ok(ValueKind::Number)
            } else {
                Err(type_error(op, left, right, "numeric operands"))
            }
        }
    }
}

fn type_error(op: BinaryOp, left: ValueKind, right: ValueKind, want: &str) -> ExprError {
    ExprError::Syntax(format!(
        "operator '{}' requires {}, got {} and {}",
        op.as_str(),
        want,
        left.as_str(),
        right.as_str()
    ))
}
