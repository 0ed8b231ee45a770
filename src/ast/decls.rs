//! Declaration node definitions.
//!
//! A B-minor program is an ordered list of declarations. Each carries a
//! name, a declared type, and optionally an initializer expression or a
//! function body. The parser builds declarations immutable in shape; the
//! resolver fills the two symbol slots and nothing mutates them afterwards.

use std::fmt::Display;

use crate::ast::expressions::Expr;
use crate::ast::statements::Stmt;
use crate::ast::types::Type;
use crate::resolver::symbols::SymbolId;

#[derive(Debug, Clone)]
pub struct Decl {
    pub name: String,
    pub ty: Type,
    /// Initializer expression, `x: integer = 4;`.
    pub value: Option<Expr>,
    /// Function body, present only for function definitions.
    pub code: Option<Vec<Stmt>>,
    /// The symbol this declaration produced, assigned by the resolver.
    pub symbol: Option<SymbolId>,
    /// The symbol previously bound to the same name in the same scope at
    /// the moment this declaration was bound. Set for function definitions
    /// whose prototype was declared earlier; the type checker compares the
    /// two signatures.
    pub prior: Option<SymbolId>,
}

impl Decl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Decl {
            name: name.into(),
            ty,
            value: None,
            code: None,
            symbol: None,
            prior: None,
        }
    }

    pub fn with_value(mut self, value: Expr) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_code(mut self, code: Vec<Stmt>) -> Self {
        self.code = Some(code);
        self
    }
}

impl Display for Decl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)?;

        if let Some(value) = &self.value {
            write!(f, " = {};", value)
        } else if let Some(code) = &self.code {
            writeln!(f, " =\n{{")?;
            for statement in code {
                writeln!(f, "    {}", statement)?;
            }
            write!(f, "}}")
        } else {
            write!(f, ";")
        }
    }
}
