//! Expression AST
//!
//! The grammar is deliberately closed: literals, binding paths, comparison,
//! boolean, and arithmetic operators. There are no calls, no loops, and no
//! assignment, so every expression terminates by construction.

use std::fmt;

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Boolean negation `!`
    Not,
    /// Arithmetic negation `-`
    Neg,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

/// Binary operators, lowest to highest precedence tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

/// One step of a binding path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Dotted field access (`cpu` in `workload.cpu.usage`)
    Field(String),
    /// String-keyed map access (`["team"]` in `workload.labels["team"]`)
    Key(String),
}

/// A reference into the evaluation environment, e.g. `workload.cpu.usage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    /// Returns the root binding name (`workload`, `policy`, or `cluster`
    /// for any path the environment accepts).
    pub fn root(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Field(name)) => Some(name),
            _ => None,
        }
    }
}

// Path display is used verbatim in diagnostics, so it round-trips the
// source syntax.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Key(key) => write!(f, "[\"{}\"]", key)?,
            }
        }
        Ok(())
    }
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Path(Path),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}
