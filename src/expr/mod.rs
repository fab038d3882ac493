//! Expression safety subsystem
//!
//! Validates rule and condition expressions before the control plane will
//! ever execute them. Two enforcement tiers, both mandatory:
//!
//! 1. A closed grammar compiled against a typed, read-only environment
//!    (three root bindings: `workload`, `policy`, `cluster`). No calls, no
//!    loops, no reflection, no I/O.
//! 2. A textual denylist scan plus action/trigger taxonomies deciding what
//!    the system is willing to execute, independent of what the grammar
//!    permits.

mod analyzer;
mod ast;
mod compile;
mod env;
mod errors;
mod eval;
mod parser;

pub use analyzer::ExpressionAnalyzer;
pub use ast::{BinaryOp, Expr, Path, PathSegment, UnaryOp};
pub use compile::{compile, CompiledExpr};
pub use env::{EvalEnv, Shape, Value, ValueKind};
pub use errors::{ExprError, ExprResult};
pub use eval::{evaluate, EvalError, STEP_BUDGET};
