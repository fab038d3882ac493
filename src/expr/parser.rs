//! Expression lexer and parser
//!
//! Recursive descent over a closed grammar:
//!
//! ```text
//! expr       := or
//! or         := and ("||" and)*
//! and        := equality ("&&" equality)*
//! equality   := comparison (("==" | "!=") comparison)*
//! comparison := term (("<" | "<=" | ">" | ">=") term)*
//! term       := factor (("+" | "-") factor)*
//! factor     := unary (("*" | "/" | "%") unary)*
//! unary      := ("!" | "-") unary | primary
//! primary    := number | string | "true" | "false" | path | "(" expr ")"
//! path       := ident ("." ident | "[" string "]")*
//! ```

use super::ast::{BinaryOp, Expr, Path, PathSegment, UnaryOp};
use super::errors::{ExprError, ExprResult};

/// Maximum nesting depth for parenthesized groups, unary chains, and the
/// resulting AST. Recursion in the parser and checker is bounded by this,
/// so hostile input cannot exhaust the stack.
pub(super) const MAX_NESTING: usize = 128;

pub(super) fn nesting_limit() -> ExprError {
    ExprError::Syntax(format!(
        "expression nests deeper than {} levels",
        MAX_NESTING
    ))
}

/// Lexical tokens
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
    OrOr,
    AndAnd,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Str(s) => format!("string \"{}\"", s),
            Token::Ident(name) => format!("identifier '{}'", name),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::LBracket => "'['".into(),
            Token::RBracket => "']'".into(),
            Token::Dot => "'.'".into(),
            Token::OrOr => "'||'".into(),
            Token::AndAnd => "'&&'".into(),
            Token::Bang => "'!'".into(),
            Token::EqEq => "'=='".into(),
            Token::NotEq => "'!='".into(),
            Token::Lt => "'<'".into(),
            Token::Le => "'<='".into(),
            Token::Gt => "'>'".into(),
            Token::Ge => "'>='".into(),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Percent => "'%'".into(),
        }
    }
}

/// Tokenizes expression text.
fn tokenize(src: &str) -> ExprResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' | '\n' => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            '.' => {
                chars.next();
                tokens.push(Token::Dot);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '|' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '|')) => {
                        chars.next();
                        tokens.push(Token::OrOr);
                    }
                    _ => return Err(syntax(pos, "expected '||'")),
                }
            }
            '&' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '&')) => {
                        chars.next();
                        tokens.push(Token::AndAnd);
                    }
                    _ => return Err(syntax(pos, "expected '&&'")),
                }
            }
            '!' => {
                chars.next();
                if let Some(&(_, '=')) = chars.peek() {
                    chars.next();
                    tokens.push(Token::NotEq);
                } else {
                    tokens.push(Token::Bang);
                }
            }
            '=' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '=')) => {
                        chars.next();
                        tokens.push(Token::EqEq);
                    }
                    _ => return Err(syntax(pos, "expected '==' (assignment is not allowed)")),
                }
            }
            '<' => {
                chars.next();
                if let Some(&(_, '=')) = chars.peek() {
                    chars.next();
                    tokens.push(Token::Le);
                } else {
                    tokens.push(Token::Lt);
                }
            }
            '>' => {
                chars.next();
                if let Some(&(_, '=')) = chars.peek() {
                    chars.next();
                    tokens.push(Token::Ge);
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '"' | '\'' => {
                let quote = c;
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                for (_, sc) in chars.by_ref() {
                    if sc == quote {
                        closed = true;
                        break;
                    }
                    value.push(sc);
                }
                if !closed {
                    return Err(syntax(pos, "unterminated string literal"));
                }
                tokens.push(Token::Str(value));
            }
            c if c.is_ascii_digit() => {
                let mut literal = String::new();
                let mut seen_dot = false;
                while let Some(&(_, nc)) = chars.peek() {
                    if nc.is_ascii_digit() {
                        literal.push(nc);
                        chars.next();
                    } else if nc == '.' && !seen_dot {
                        // Only consume the dot when a digit follows; otherwise
                        // it belongs to a path that starts oddly and the
                        // parser will reject it.
                        let mut lookahead = chars.clone();
                        lookahead.next();
                        match lookahead.peek() {
                            Some(&(_, d)) if d.is_ascii_digit() => {
                                seen_dot = true;
                                literal.push(nc);
                                chars.next();
                            }
                            _ => break,
                        }
                    } else {
                        break;
                    }
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| syntax(pos, "malformed number literal"))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, nc)) = chars.peek() {
                    if nc.is_ascii_alphanumeric() || nc == '_' {
                        name.push(nc);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            other => {
                return Err(syntax(pos, &format!("unexpected character '{}'", other)));
            }
        }
    }

    Ok(tokens)
}

fn syntax(pos: usize, message: &str) -> ExprError {
    ExprError::Syntax(format!("at offset {}: {}", pos, message))
}

/// Parses expression text into an AST.
pub fn parse(src: &str) -> ExprResult<Expr> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(ExprError::Syntax(format!(
            "unexpected trailing {}",
            token.describe()
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, want: Token, context: &str) -> ExprResult<()> {
        match self.advance() {
            Some(token) if token == want => Ok(()),
            Some(token) => Err(ExprError::Syntax(format!(
                "expected {} {}, found {}",
                want.describe(),
                context,
                token.describe()
            ))),
            None => Err(ExprError::Syntax(format!(
                "expected {} {}, found end of expression",
                want.describe(),
                context
            ))),
        }
    }

    fn expression(&mut self) -> ExprResult<Expr> {
        if self.depth >= MAX_NESTING {
            return Err(nesting_limit());
        }
        self.depth += 1;
        let expr = self.or_expr();
        self.depth -= 1;
        expr
    }

    // Each binary production caps its chain length: chains build left-deep
    // trees, so an unbounded loop would produce an AST whose recursive
    // traversal (and drop) exhausts the stack even though the loop itself
    // never recurses.

    fn or_expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.and_expr()?;
        let mut ops = 0;
        while self.peek() == Some(&Token::OrOr) {
            ops += 1;
            if ops > MAX_NESTING {
                return Err(nesting_limit());
            }
            self.advance();
            let rhs = self.and_expr()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.equality()?;
        let mut ops = 0;
        while self.peek() == Some(&Token::AndAnd) {
            ops += 1;
            if ops > MAX_NESTING {
                return Err(nesting_limit());
            }
            self.advance();
            let rhs = self.equality()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.comparison()?;
        let mut ops = 0;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::Ne,
                _ => break,
            };
            ops += 1;
            if ops > MAX_NESTING {
                return Err(nesting_limit());
            }
            self.advance();
            let rhs = self.comparison()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn comparison(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.term()?;
        let mut ops = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => break,
            };
            ops += 1;
            if ops > MAX_NESTING {
                return Err(nesting_limit());
            }
            self.advance();
            let rhs = self.term()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn term(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.factor()?;
        let mut ops = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            ops += 1;
            if ops > MAX_NESTING {
                return Err(nesting_limit());
            }
            self.advance();
            let rhs = self.factor()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.unary()?;
        let mut ops = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            ops += 1;
            if ops > MAX_NESTING {
                return Err(nesting_limit());
            }
            self.advance();
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> ExprResult<Expr> {
        let op = match self.peek() {
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Minus) => UnaryOp::Neg,
            _ => return self.primary(),
        };
        self.advance();
        if self.depth >= MAX_NESTING {
            return Err(nesting_limit());
        }
        self.depth += 1;
        let operand = self.unary();
        self.depth -= 1;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand?),
        })
    }

    fn primary(&mut self) -> ExprResult<Expr> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::Ident(name)) if name == "true" => Ok(Expr::Bool(true)),
            Some(Token::Ident(name)) if name == "false" => Ok(Expr::Bool(false)),
            Some(Token::Ident(name)) => self.path(name),
            Some(Token::LParen) => {
                let inner = self.expression()?;
                self.expect(Token::RParen, "to close group")?;
                Ok(inner)
            }
            Some(token) => Err(ExprError::Syntax(format!(
                "unexpected {}",
                token.describe()
            ))),
            None => Err(ExprError::Syntax("unexpected end of expression".into())),
        }
    }

    fn path(&mut self, root: String) -> ExprResult<Expr> {
        let mut segments = vec![PathSegment::Field(root)];
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.advance();
                    match self.advance() {
                        Some(Token::Ident(name)) => segments.push(PathSegment::Field(name)),
                        Some(token) => {
                            return Err(ExprError::Syntax(format!(
                                "expected field name after '.', found {}",
                                token.describe()
                            )))
                        }
                        None => {
                            return Err(ExprError::Syntax(
                                "expected field name after '.', found end of expression".into(),
                            ))
                        }
                    }
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let key = match self.advance() {
                        Some(Token::Str(key)) => key,
                        Some(token) => {
                            return Err(ExprError::Syntax(format!(
                                "expected string key inside '[]', found {}",
                                token.describe()
                            )))
                        }
                        None => {
                            return Err(ExprError::Syntax(
                                "expected string key inside '[]', found end of expression".into(),
                            ))
                        }
                    };
                    self.expect(Token::RBracket, "to close key access")?;
                    segments.push(PathSegment::Key(key));
                }
                _ => break,
            }
        }
        Ok(Expr::Path(Path { segments }))
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
