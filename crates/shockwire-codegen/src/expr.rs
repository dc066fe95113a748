//! Condition expressions for conditional mapping nodes.
//!
//! The authoring tool writes conditions as free text, e.g. `HasStyle`,
//! `!Muted`, `Gesture != 0`, `VersionId >= 401 && HasUrl`. The grammar:
//!
//! ```text
//! expr    := and ("||" and)*
//! and     := cmp ("&&" cmp)*
//! cmp     := unary (("==" | "!=" | "<" | "<=" | ">" | ">=") unary)?
//! unary   := "!" unary | primary
//! primary := ident | integer | "true" | "false" | "(" expr ")"
//! ```
//!
//! Identifiers name fields bound earlier in the same structure; the
//! generator verifies that, so evaluation never needs to look ahead of
//! the cursor. Expressions are parsed once at generation time and the
//! AST is interpreted per frame.

use std::fmt;

use indexmap::IndexMap;

use crate::FieldValue;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CmpOp {
    fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// A parsed condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum CondExpr {
    /// Reference to a field bound earlier in the same structure.
    Field(String),
    /// Unsigned integer literal.
    Int(u32),
    /// Boolean literal.
    Bool(bool),
    /// Logical negation.
    Not(Box<CondExpr>),
    /// Comparison of two operands.
    Cmp(CmpOp, Box<CondExpr>, Box<CondExpr>),
    /// Short-circuit conjunction.
    And(Box<CondExpr>, Box<CondExpr>),
    /// Short-circuit disjunction.
    Or(Box<CondExpr>, Box<CondExpr>),
}

/// What an operand evaluates to before the final boolean coercion.
enum Operand {
    Num(u64),
    Flag(bool),
    Text(String),
}

impl CondExpr {
    /// Parses a condition source string.
    pub fn parse(input: &str) -> Result<Self, String> {
        let tokens = tokenize(input)?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.expr()?;
        if parser.pos != parser.tokens.len() {
            return Err(format!("unexpected trailing `{}`", parser.tokens[parser.pos]));
        }
        Ok(expr)
    }

    /// Collects every field identifier the expression references.
    pub fn referenced_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Field(name) => out.push(name),
            Self::Int(_) | Self::Bool(_) => {}
            Self::Not(inner) => inner.referenced_fields(out),
            Self::Cmp(_, lhs, rhs) | Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.referenced_fields(out);
                rhs.referenced_fields(out);
            }
        }
    }

    /// Evaluates against the fields bound so far.
    ///
    /// Fails on an unbound field or a kind mismatch; with a generated
    /// plan both indicate a packet object that violates its contract.
    pub fn evaluate(&self, fields: &IndexMap<String, FieldValue>) -> Result<bool, String> {
        match self.operand(fields)? {
            Operand::Flag(b) => Ok(b),
            Operand::Num(n) => Ok(n != 0),
            Operand::Text(_) => Err("condition evaluates to a string, not a boolean".into()),
        }
    }

    fn operand(&self, fields: &IndexMap<String, FieldValue>) -> Result<Operand, String> {
        match self {
            Self::Field(name) => match fields.get(name) {
                Some(FieldValue::Int(v)) => Ok(Operand::Num(u64::from(*v))),
                Some(FieldValue::Short(v)) => Ok(Operand::Num(u64::from(*v))),
                Some(FieldValue::Bool(v)) => Ok(Operand::Flag(*v)),
                Some(FieldValue::Str(v)) => Ok(Operand::Text(v.clone())),
                None => Err(format!("field `{name}` is not bound")),
            },
            Self::Int(v) => Ok(Operand::Num(u64::from(*v))),
            Self::Bool(v) => Ok(Operand::Flag(*v)),
            Self::Not(inner) => Ok(Operand::Flag(!inner.evaluate(fields)?)),
            Self::Cmp(op, lhs, rhs) => {
                let lhs = lhs.operand(fields)?;
                let rhs = rhs.operand(fields)?;
                Ok(Operand::Flag(compare(*op, lhs, rhs)?))
            }
            Self::And(lhs, rhs) => {
                Ok(Operand::Flag(lhs.evaluate(fields)? && rhs.evaluate(fields)?))
            }
            Self::Or(lhs, rhs) => {
                Ok(Operand::Flag(lhs.evaluate(fields)? || rhs.evaluate(fields)?))
            }
        }
    }
}

fn compare(op: CmpOp, lhs: Operand, rhs: Operand) -> Result<bool, String> {
    match (lhs, rhs) {
        (Operand::Num(a), Operand::Num(b)) => Ok(match op {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        }),
        (Operand::Flag(a), Operand::Flag(b)) => match op {
            CmpOp::Eq => Ok(a == b),
            CmpOp::Ne => Ok(a != b),
            _ => Err("booleans only support == and !=".into()),
        },
        (Operand::Text(a), Operand::Text(b)) => match op {
            CmpOp::Eq => Ok(a == b),
            CmpOp::Ne => Ok(a != b),
            _ => Err("strings only support == and !=".into()),
        },
        _ => Err("comparison between mismatched kinds".into()),
    }
}

/// Canonical rendering: fully parenthesized, single-spaced. Two
/// conditions that parse to the same AST render identically, which
/// keeps generated artifacts diffable.
impl fmt::Display for CondExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Cmp(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.as_str()),
            Self::And(lhs, rhs) => write!(f, "({lhs} && {rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs} || {rhs})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tokenizer and parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(u32),
    Op(&'static str),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Op(s) => f.write_str(s),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' => i += 1,
            b'(' | b')' => {
                tokens.push(Token::Op(if c == b'(' { "(" } else { ")" }));
                i += 1;
            }
            b'&' | b'|' => {
                if i + 1 >= bytes.len() || bytes[i + 1] != c {
                    return Err(format!("single `{}`", c as char));
                }
                tokens.push(Token::Op(if c == b'&' { "&&" } else { "||" }));
                i += 2;
            }
            b'=' => {
                if i + 1 >= bytes.len() || bytes[i + 1] != b'=' {
                    return Err("single `=`".into());
                }
                tokens.push(Token::Op("=="));
                i += 2;
            }
            b'!' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    tokens.push(Token::Op("!="));
                    i += 2;
                } else {
                    tokens.push(Token::Op("!"));
                    i += 1;
                }
            }
            b'<' | b'>' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    tokens.push(Token::Op(if c == b'<' { "<=" } else { ">=" }));
                    i += 2;
                } else {
                    tokens.push(Token::Op(if c == b'<' { "<" } else { ">" }));
                    i += 1;
                }
            }
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let literal = &input[start..i];
                let value: u32 = literal
                    .parse()
                    .map_err(|_| format!("integer `{literal}` out of range"))?;
                tokens.push(Token::Int(value));
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => {
                let start = i;
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_')
                {
                    i += 1;
                }
                tokens.push(Token::Ident(input[start..i].to_owned()));
            }
            other => return Err(format!("unexpected character `{}`", other as char)),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat_op(&mut self, op: &'static str) -> bool {
        if self.peek() == Some(&Token::Op(op)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<CondExpr, String> {
        let mut lhs = self.and()?;
        while self.eat_op("||") {
            let rhs = self.and()?;
            lhs = CondExpr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<CondExpr, String> {
        let mut lhs = self.cmp()?;
        while self.eat_op("&&") {
            let rhs = self.cmp()?;
            lhs = CondExpr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn cmp(&mut self) -> Result<CondExpr, String> {
        let lhs = self.unary()?;
        for op in [
            ("==", CmpOp::Eq),
            ("!=", CmpOp::Ne),
            ("<=", CmpOp::Le),
            (">=", CmpOp::Ge),
            ("<", CmpOp::Lt),
            (">", CmpOp::Gt),
        ] {
            if self.eat_op(op.0) {
                let rhs = self.unary()?;
                return Ok(CondExpr::Cmp(op.1, Box::new(lhs), Box::new(rhs)));
            }
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<CondExpr, String> {
        if self.eat_op("!") {
            return Ok(CondExpr::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<CondExpr, String> {
        if self.eat_op("(") {
            let inner = self.expr()?;
            if !self.eat_op(")") {
                return Err("missing closing parenthesis".into());
            }
            return Ok(inner);
        }
        match self.peek().cloned() {
            Some(Token::Int(v)) => {
                self.pos += 1;
                Ok(CondExpr::Int(v))
            }
            Some(Token::Ident(name)) => {
                self.pos += 1;
                match name.as_str() {
                    "true" => Ok(CondExpr::Bool(true)),
                    "false" => Ok(CondExpr::Bool(false)),
                    _ => Ok(CondExpr::Field(name)),
                }
            }
            Some(token) => Err(format!("unexpected `{token}`")),
            None => Err("unexpected end of condition".into()),
        }
    }
}
