//! Statement node definitions.
//!
//! `Block` carries an explicit lexical-scope boundary: the resolver pushes
//! a scope when it enters one and pops it on the way out. `If` and `For`
//! additionally scope their own headers and bodies, independent of any
//! block they happen to contain.

use std::fmt::Display;

use crate::ast::decls::Decl;
use crate::ast::expressions::Expr;

/// A statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    Decl(Box<Decl>),
    Expr(Expr),
    If {
        condition: Expr,
        body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    /// All three header expressions are optional, as in `for (;;)`.
    For {
        init: Option<Expr>,
        condition: Option<Expr>,
        next: Option<Expr>,
        body: Box<Stmt>,
    },
    Print(Vec<Expr>),
    Return(Option<Expr>),
    Block(Vec<Stmt>),
}

impl Stmt {
    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, indent: usize) -> std::fmt::Result {
        let pad = " ".repeat(indent);
        match self {
            Stmt::Decl(decl) => write!(f, "{}{}", pad, decl),
            Stmt::Expr(expr) => write!(f, "{}{};", pad, expr),
            Stmt::If {
                condition,
                body,
                else_body,
            } => {
                write!(f, "{}if ({}) ", pad, condition)?;
                body.fmt_body(f, indent)?;
                if let Some(else_body) = else_body {
                    write!(f, " else ")?;
                    else_body.fmt_body(f, indent)?;
                }
                Ok(())
            }
            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                write!(f, "{}for (", pad)?;
                if let Some(init) = init {
                    write!(f, "{}", init)?;
                }
                write!(f, "; ")?;
                if let Some(condition) = condition {
                    write!(f, "{}", condition)?;
                }
                write!(f, "; ")?;
                if let Some(next) = next {
                    write!(f, "{}", next)?;
                }
                write!(f, ") ")?;
                body.fmt_body(f, indent)
            }
            Stmt::Print(expressions) => {
                write!(f, "{}print", pad)?;
                for (i, expression) in expressions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}", expression)?;
                }
                write!(f, ";")
            }
            Stmt::Return(value) => match value {
                Some(value) => write!(f, "{}return {};", pad, value),
                None => write!(f, "{}return;", pad),
            },
            Stmt::Block(statements) => {
                writeln!(f, "{}{{", pad)?;
                for statement in statements {
                    statement.fmt_indented(f, indent + 4)?;
                    writeln!(f)?;
                }
                write!(f, "{}}}", pad)
            }
        }
    }

    /// A statement used as an `if`/`for` body: blocks print inline after the
    /// header, anything else starts on its own line.
    fn fmt_body(&self, f: &mut std::fmt::Formatter<'_>, indent: usize) -> std::fmt::Result {
        match self {
            Stmt::Block(statements) => {
                writeln!(f, "{{")?;
                for statement in statements {
                    statement.fmt_indented(f, indent + 4)?;
                    writeln!(f)?;
                }
                write!(f, "{}}}", " ".repeat(indent))
            }
            other => {
                writeln!(f)?;
                other.fmt_indented(f, indent + 4)
            }
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}
