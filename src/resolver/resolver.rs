//! The resolution pass.
//!
//! One pre-order walk over the declaration list with a single side effect:
//! every declaration and parameter gains a symbol, and every name
//! expression gains the id of the symbol it denotes. An unresolved name is
//! fatal: the type checker assumes every name already carries a symbol, so
//! the pipeline stops here rather than limping into it.

use crate::ast::decls::Decl;
use crate::ast::expressions::Expr;
use crate::ast::statements::Stmt;
use crate::ast::types::{Param, Type};
use crate::errors::errors::ResolveError;

use super::scope::ScopeStack;
use super::symbols::{Symbol, SymbolKind, SymbolTable};

pub struct Resolver {
    symbols: SymbolTable,
    scopes: ScopeStack,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            symbols: SymbolTable::new(),
            scopes: ScopeStack::new(),
        }
    }

    fn resolve_decl(&mut self, decl: &mut Decl) -> Result<(), ResolveError> {
        let kind = if self.scopes.level() > 1 {
            SymbolKind::Local
        } else {
            SymbolKind::Global
        };

        let symbol = self
            .symbols
            .insert(Symbol::new(kind, decl.name.clone(), decl.ty.clone()));
        decl.symbol = Some(symbol);

        log::debug!("declared '{}' as {:?} symbol", decl.name, kind);

        // The initializer is resolved before the declaration's own name is
        // bound: in `x: integer = x;` the right-hand `x` refers to whatever
        // outer binding exists, never to the one being created.
        if let Some(value) = &mut decl.value {
            self.resolve_expr(value)?;
        }

        decl.prior = self.scopes.lookup_current(&decl.name);
        self.scopes.bind(&decl.name, symbol);

        if decl.code.is_some() {
            self.scopes.enter();

            if let Type::Function { params, .. } = &mut decl.ty {
                resolve_params(params, &mut self.symbols, &mut self.scopes);
            }

            // Borrow dance: take the body out while the statements resolve
            // against the function scope.
            let mut code = decl.code.take().unwrap();
            let outcome = code
                .iter_mut()
                .try_for_each(|statement| self.resolve_stmt(statement));
            decl.code = Some(code);
            outcome?;

            self.scopes.exit();
        }

        Ok(())
    }

    fn resolve_stmt(&mut self, stmt: &mut Stmt) -> Result<(), ResolveError> {
        match stmt {
            Stmt::Decl(decl) => self.resolve_decl(decl),
            Stmt::Expr(expr) => self.resolve_expr(expr),
            Stmt::If {
                condition,
                body,
                else_body,
            } => {
                self.scopes.enter();
                self.resolve_expr(condition)?;
                self.resolve_stmt(body)?;
                if let Some(else_body) = else_body {
                    self.resolve_stmt(else_body)?;
                }
                self.scopes.exit();
                Ok(())
            }
            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                self.scopes.enter();
                if let Some(init) = init {
                    self.resolve_expr(init)?;
                }
                if let Some(condition) = condition {
                    self.resolve_expr(condition)?;
                }
                if let Some(next) = next {
                    self.resolve_expr(next)?;
                }
                self.resolve_stmt(body)?;
                self.scopes.exit();
                Ok(())
            }
            Stmt::Print(expressions) => expressions
                .iter_mut()
                .try_for_each(|expression| self.resolve_expr(expression)),
            Stmt::Return(value) => match value {
                Some(value) => self.resolve_expr(value),
                None => Ok(()),
            },
            Stmt::Block(statements) => {
                self.scopes.enter();
                let outcome = statements
                    .iter_mut()
                    .try_for_each(|statement| self.resolve_stmt(statement));
                self.scopes.exit();
                outcome
            }
        }
    }

    fn resolve_expr(&mut self, expr: &mut Expr) -> Result<(), ResolveError> {
        match expr {
            Expr::Name { name, symbol } => match self.scopes.lookup(name) {
                Some(id) => {
                    *symbol = Some(id);
                    Ok(())
                }
                None => Err(ResolveError::UndeclaredSymbol { name: name.clone() }),
            },
            Expr::IntegerLiteral(_)
            | Expr::BooleanLiteral(_)
            | Expr::CharLiteral(_)
            | Expr::StringLiteral(_) => Ok(()),
            Expr::Group(inner) => self.resolve_expr(inner),
            Expr::Call { callee, arguments } => {
                self.resolve_expr(callee)?;
                arguments
                    .iter_mut()
                    .try_for_each(|argument| self.resolve_expr(argument))
            }
            Expr::Subscript { array, index } => {
                self.resolve_expr(array)?;
                self.resolve_expr(index)
            }
            Expr::ArrayLiteral(elements) => elements
                .iter_mut()
                .try_for_each(|element| self.resolve_expr(element)),
            Expr::Unary { operand, .. } => self.resolve_expr(operand),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left)?;
                self.resolve_expr(right)
            }
            Expr::Assignment { target, value } => {
                self.resolve_expr(target)?;
                self.resolve_expr(value)
            }
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new()
    }
}

/// Parameters become `Parameter`-kind symbols bound in the function's
/// scope, recorded both in the scope stack and in the parameter entries
/// themselves.
fn resolve_params(params: &mut [Param], symbols: &mut SymbolTable, scopes: &mut ScopeStack) {
    for param in params.iter_mut() {
        let id = symbols.insert(Symbol::new(
            SymbolKind::Parameter,
            param.name.clone(),
            param.ty.clone(),
        ));
        param.symbol = Some(id);
        scopes.bind(&param.name, id);
    }
}

/// Resolve a whole program, returning the symbol table its annotations
/// point into.
pub fn resolve(program: &mut [Decl]) -> Result<SymbolTable, ResolveError> {
    let mut resolver = Resolver::new();

    for decl in program.iter_mut() {
        resolver.resolve_decl(decl)?;
    }

    Ok(resolver.symbols)
}
