//! Expression node definitions.
//!
//! Expressions form a tree built once by the parser. The shape never
//! changes afterwards; the only mutation is the resolver filling the symbol
//! slot of every name expression. Display renders expressions back to
//! B-minor source, which the diagnostics use to name offending constructs.

use std::fmt::Display;

use crate::resolver::symbols::SymbolId;

/// Binary operators, loosest-binding groups first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::Pow
        )
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt
                | BinaryOp::Lte
                | BinaryOp::Gt
                | BinaryOp::Gte
                | BinaryOp::Eq
                | BinaryOp::Neq
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
        };
        write!(f, "{}", symbol)
    }
}

/// Unary operators. Negate and Not are prefix; Increment and Decrement are
/// postfix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    Increment,
    Decrement,
}

/// An expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A name reference. The symbol slot is filled by the resolver and read
    /// by every later pass.
    Name {
        name: String,
        symbol: Option<SymbolId>,
    },
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    CharLiteral(char),
    StringLiteral(String),
    /// A parenthesized expression, kept so the pretty-printer can round-trip
    /// the source.
    Group(Box<Expr>),
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Subscript {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    /// `{ e1, e2, ... }` array initializer.
    ArrayLiteral(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assignment {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name {
            name: name.into(),
            symbol: None,
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Name { name, .. } => write!(f, "{}", name),
            Expr::IntegerLiteral(value) => write!(f, "{}", value),
            Expr::BooleanLiteral(value) => {
                write!(f, "{}", if *value { "true" } else { "false" })
            }
            Expr::CharLiteral(value) => write!(f, "'{}'", value),
            Expr::StringLiteral(value) => write!(f, "{:?}", value),
            Expr::Group(inner) => write!(f, "({})", inner),
            Expr::Call { callee, arguments } => {
                write!(f, "{}(", callee)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            Expr::Subscript { array, index } => write!(f, "{}[{}]", array, index),
            Expr::ArrayLiteral(elements) => {
                write!(f, "{{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "}}")
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Negate => write!(f, "-{}", operand),
                UnaryOp::Not => write!(f, "!{}", operand),
                UnaryOp::Increment => write!(f, "{}++", operand),
                UnaryOp::Decrement => write!(f, "{}--", operand),
            },
            Expr::Binary { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Assignment { target, value } => write!(f, "{} = {}", target, value),
        }
    }
}
