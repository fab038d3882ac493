//! Tree-walking evaluator with an explicit step budget
//!
//! Evaluation is pure: representative values come from the environment,
//! there is no I/O, and the step budget bounds work even if the grammar
//! ever grows constructs with non-obvious cost.

use std::fmt;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::env::{EvalEnv, Value};

/// Maximum AST nodes one evaluation may visit.
pub const STEP_BUDGET: u32 = 10_000;

/// Evaluation failure.
#[derive(Debug)]
pub struct EvalError {
    message: String,
}

impl EvalError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

/// Evaluates a checked expression against an environment.
pub fn evaluate(expr: &Expr, env: &EvalEnv) -> Result<Value, EvalError> {
    let mut steps = STEP_BUDGET;
    eval_node(expr, env, &mut steps)
}

fn eval_node(expr: &Expr, env: &EvalEnv, steps: &mut u32) -> Result<Value, EvalError> {
    if *steps == 0 {
        return Err(EvalError::new("evaluation step budget exhausted"));
    }
    *steps -= 1;

    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Str(s) => Ok(Value::Text(s.clone())),
        Expr::Bool(b) => Ok(Value::Flag(*b)),
        Expr::Path(path) => env
            .lookup(path)
            .ok_or_else(|| EvalError::new(format!("unbound path '{}'", path))),
        Expr::Unary { op, operand } => {
            let value = eval_node(operand, env, steps)?;
            match (op, value) {
                (UnaryOp::Not, Value::Flag(b)) => Ok(Value::Flag(!b)),
                (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
                (op, value) => Err(EvalError::new(format!(
                    "operator '{}' cannot apply to {}",
                    op.as_str(),
                    value.kind().as_str()
                ))),
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            // Short-circuit the boolean connectives
            match op {
                BinaryOp::And => {
                    return match eval_node(lhs, env, steps)? {
                        Value::Flag(false) => Ok(Value::Flag(false)),
                        Value::Flag(true) => expect_flag(eval_node(rhs, env, steps)?, op),
                        other => non_boolean(op, &other),
                    };
                }
                BinaryOp::Or => {
                    return match eval_node(lhs, env, steps)? {
                        Value::Flag(true) => Ok(Value::Flag(true)),
                        Value::Flag(false) => expect_flag(eval_node(rhs, env, steps)?, op),
                        other => non_boolean(op, &other),
                    };
                }
                _ => {}
            }

            let left = eval_node(lhs, env, steps)?;
            let right = eval_node(rhs, env, steps)?;
            eval_binary(*op, left, right)
        }
    }
}

fn expect_flag(value: Value, op: &BinaryOp) -> Result<Value, EvalError> {
    match value {
        Value::Flag(_) => Ok(value),
        other => non_boolean(op, &other),
    }
}

fn non_boolean(op: &BinaryOp, value: &Value) -> Result<Value, EvalError> {
    Err(EvalError::new(format!(
        "operator '{}' requires boolean operands, got {}",
        op.as_str(),
        value.kind().as_str()
    )))
}

fn eval_binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
    use BinaryOp::*;
    match (op, left, right) {
        (Eq, l, r) => Ok(Value::Flag(l == r)),
        (Ne, l, r) => Ok(Value::Flag(l != r)),

        (Lt, Value::Number(a), Value::Number(b)) => Ok(Value::Flag(a < b)),
        (Le, Value::Number(a), Value::Number(b)) => Ok(Value::Flag(a <= b)),
        (Gt, Value::Number(a), Value::Number(b)) => Ok(Value::Flag(a > b)),
        (Ge, Value::Number(a), Value::Number(b)) => Ok(Value::Flag(a >= b)),

        (Lt, Value::Text(a), Value::Text(b)) => Ok(Value::Flag(a < b)),
        (Le, Value::Text(a), Value::Text(b)) => Ok(Value::Flag(a <= b)),
        (Gt, Value::Text(a), Value::Text(b)) => Ok(Value::Flag(a > b)),
        (Ge, Value::Text(a), Value::Text(b)) => Ok(Value::Flag(a >= b)),

        (Add, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Sub, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
        (Mul, Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
        (Div, Value::Number(a), Value::Number(b)) => {
            if b == 0.0 {
                Err(EvalError::new("division by zero"))
            } else {
                Ok(Value::Number(a / b))
            }
        }
        (Rem, Value::Number(a), Value::Number(b)) => {
            if b == 0.0 {
                Err(EvalError::new("remainder by zero"))
            } else {
                Ok(Value::Number(a % b))
            }
        }

        (op, l, r) => Err(EvalError::new(format!(
            "operator '{}' cannot apply to {} and {}",
            op.as_str(),
            l.kind().as_str(),
            r.kind().as_str()
        ))),
    }
}
