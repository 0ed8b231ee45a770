//! The type-checking pass.
//!
//! Expressions are checked post-order: the operand types are computed
//! first, then the node's own rule runs and produces a fresh owned `Type`.
//! A computed type is never aliased into another node; every consumer
//! clones what it keeps. Failed rules report a diagnostic and return a
//! recovery type so checking can continue through the rest of the program.

use crate::ast::decls::Decl;
use crate::ast::expressions::{BinaryOp, Expr, UnaryOp};
use crate::ast::statements::Stmt;
use crate::ast::types::{params_equal, params_to_string, Param, Type};
use crate::errors::errors::TypeError;
use crate::resolver::symbols::SymbolTable;

pub struct TypeChecker<'a> {
    symbols: &'a SymbolTable,
    errors: Vec<TypeError>,
    /// The declared return type of the function currently being checked.
    /// A single value, not a stack: functions do not nest in this language.
    current_return_type: Type,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        TypeChecker {
            symbols,
            errors: Vec::new(),
            current_return_type: Type::Void,
        }
    }

    pub fn errors(&self) -> &[TypeError] {
        &self.errors
    }

    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    fn report(&mut self, error: TypeError) {
        log::debug!("type error: {}", error);
        self.errors.push(error);
    }

    pub fn check_program(&mut self, program: &[Decl]) {
        for decl in program {
            self.check_decl(decl);
        }
    }

    fn check_decl(&mut self, decl: &Decl) {
        if let Some(value) = &decl.value {
            let found = self.check_expr(value);

            if found != decl.ty {
                self.report(TypeError::DeclarationMismatch {
                    name: decl.name.clone(),
                    declared: decl.ty.clone(),
                    found,
                });
            } else if let Some((declared, got)) = array_overflow(&decl.ty, &found) {
                self.report(TypeError::InitializerTooLarge {
                    name: decl.name.clone(),
                    declared,
                    found: got,
                });
            }
        }

        if let Type::Function {
            return_type,
            params,
        } = &decl.ty
        {
            // A previously bound symbol of the same name is a forward
            // prototype; its signature must agree with this declaration's.
            if let Some(prior) = decl.prior {
                if let Type::Function {
                    return_type: prior_return,
                    params: prior_params,
                } = &self.symbols[prior].ty
                {
                    if !params_equal(params, prior_params) {
                        self.report(TypeError::PrototypeParameterMismatch {
                            name: decl.name.clone(),
                            expected: params_to_string(prior_params),
                            found: params_to_string(params),
                        });
                    }

                    if **return_type != **prior_return {
                        self.report(TypeError::PrototypeReturnMismatch {
                            name: decl.name.clone(),
                            expected: (**prior_return).clone(),
                            found: (**return_type).clone(),
                        });
                    }
                }
            }

            self.current_return_type = (**return_type).clone();
        }

        if let Some(code) = &decl.code {
            for statement in code {
                self.check_stmt(statement);
            }
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.check_decl(decl),
            Stmt::Expr(expr) => {
                self.check_expr(expr);
            }
            Stmt::If {
                condition,
                body,
                else_body,
            } => {
                self.check_condition(condition, "if");
                self.check_stmt(body);
                if let Some(else_body) = else_body {
                    self.check_stmt(else_body);
                }
            }
            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                if let Some(init) = init {
                    self.check_expr(init);
                }
                if let Some(condition) = condition {
                    self.check_condition(condition, "for");
                }
                if let Some(next) = next {
                    self.check_expr(next);
                }
                self.check_stmt(body);
            }
            Stmt::Print(expressions) => {
                for expression in expressions {
                    self.check_expr(expression);
                }
            }
            Stmt::Return(value) => {
                let found = match value {
                    Some(value) => self.check_expr(value),
                    None => Type::Void,
                };

                if found != self.current_return_type {
                    self.report(TypeError::ReturnMismatch {
                        expected: self.current_return_type.clone(),
                        found,
                    });
                }
            }
            Stmt::Block(statements) => {
                for statement in statements {
                    self.check_stmt(statement);
                }
            }
        }
    }

    fn check_condition(&mut self, condition: &Expr, construct: &'static str) {
        let found = self.check_expr(condition);
        if found != Type::Boolean {
            self.report(TypeError::NonBooleanCondition { construct, found });
        }
    }

    /// Compute the type of an expression, reporting every rule violation on
    /// the way. Always returns a usable type; failed rules recover with the
    /// type noted in their rule so checking continues.
    pub fn check_expr(&mut self, expr: &Expr) -> Type {
        match expr {
            Expr::IntegerLiteral(_) => Type::Integer,
            Expr::StringLiteral(_) => Type::String,
            Expr::CharLiteral(_) => Type::Character,
            Expr::BooleanLiteral(_) => Type::Boolean,

            Expr::Name { symbol, .. } => {
                let id = symbol.expect("name expression resolved before type checking");
                self.symbols[id].ty.clone()
            }

            Expr::Group(inner) => self.check_expr(inner),

            Expr::Call { callee, arguments } => self.check_call(callee, arguments),

            Expr::Unary { op, operand } => self.check_unary(*op, operand),

            Expr::Binary { op, left, right } => self.check_binary(*op, left, right),

            Expr::Assignment { target, value } => {
                let left = self.check_expr(target);
                let right = self.check_expr(value);

                if left != right {
                    self.report(TypeError::AssignmentMismatch {
                        left,
                        right: right.clone(),
                    });
                }

                right
            }

            Expr::Subscript { array, index } => {
                let array_type = self.check_expr(array);
                let index_type = self.check_expr(index);

                match array_type {
                    Type::Array { subtype, .. } => {
                        if index_type != Type::Integer {
                            self.report(TypeError::IndexNotInteger { found: index_type });
                        }
                        *subtype
                    }
                    other => {
                        self.report(TypeError::SubscriptOfNonArray {
                            found: other.clone(),
                        });
                        // Recovery: pretend the subscript produced whatever
                        // was subscripted.
                        other
                    }
                }
            }

            Expr::ArrayLiteral(elements) => self.check_initializer(elements),
        }
    }

    fn check_call(&mut self, callee: &Expr, arguments: &[Expr]) -> Type {
        let callee_type = self.check_expr(callee);
        let argument_types: Vec<Type> = arguments
            .iter()
            .map(|argument| self.check_expr(argument))
            .collect();

        match &callee_type {
            Type::Function {
                return_type,
                params,
            } => {
                if !signature_matches(params, &argument_types) {
                    self.report(TypeError::CallSignatureMismatch {
                        name: callee.to_string(),
                        expected: params_to_string(params),
                        found: argument_types
                            .iter()
                            .map(|t| t.to_string())
                            .collect::<Vec<_>>()
                            .join(", "),
                    });
                }

                (**return_type).clone()
            }
            _ => {
                self.report(TypeError::NotAFunction {
                    name: callee.to_string(),
                    found: callee_type.clone(),
                });
                // Recovery: the callee's own type stands in for the result.
                callee_type
            }
        }
    }

    fn check_unary(&mut self, op: UnaryOp, operand: &Expr) -> Type {
        let found = self.check_expr(operand);

        match op {
            UnaryOp::Increment | UnaryOp::Decrement => {
                if matches!(found, Type::Integer | Type::Character) {
                    found
                } else {
                    self.report(TypeError::InvalidIncDec { found });
                    // Recover as integer so the rest of the tree checks.
                    Type::Integer
                }
            }
            UnaryOp::Negate => {
                if found != Type::Integer {
                    self.report(TypeError::InvalidNegate { found });
                }
                Type::Integer
            }
            UnaryOp::Not => {
                // The operand is integer-valued here; `!` produces a boolean.
                if found != Type::Integer {
                    self.report(TypeError::InvalidNot { found });
                }
                Type::Boolean
            }
        }
    }

    fn check_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Type {
        let left_type = self.check_expr(left);
        let right_type = self.check_expr(right);

        if op.is_arithmetic() {
            if left_type != Type::Integer || right_type != Type::Integer {
                self.report(TypeError::InvalidArithmetic {
                    op,
                    left: left_type,
                    right: right_type,
                });
            }
            Type::Integer
        } else if op.is_comparison() {
            // Two independent checks: each operand must be of a comparable
            // kind, and the two must agree with each other.
            if !left_type.is_comparable() || !right_type.is_comparable() {
                self.report(TypeError::IncomparableTypes {
                    op,
                    left: left_type.clone(),
                    right: right_type.clone(),
                });
            }
            if left_type != right_type {
                self.report(TypeError::ComparisonMismatch {
                    op,
                    left: left_type,
                    right: right_type,
                });
            }
            Type::Boolean
        } else {
            if left_type != Type::Boolean || right_type != Type::Boolean {
                self.report(TypeError::InvalidLogical {
                    op,
                    left: left_type,
                    right: right_type,
                });
            }
            Type::Boolean
        }
    }

    fn check_initializer(&mut self, elements: &[Expr]) -> Type {
        // An array literal cannot be empty; there is nothing to infer the
        // subtype from.
        if elements.is_empty() {
            self.report(TypeError::EmptyInitializer);
            return Type::array(Type::Void, 0);
        }

        let element_types: Vec<Type> = elements
            .iter()
            .map(|element| self.check_expr(element))
            .collect();

        let first = element_types[0].clone();
        for element_type in &element_types[1..] {
            if *element_type != first {
                self.report(TypeError::ConflictingInitializerTypes {
                    first: first.clone(),
                    conflicting: element_type.clone(),
                });
                break;
            }
        }

        Type::array(first, element_types.len())
    }
}

/// Parameter/argument agreement for a call: both empty counts as equal,
/// otherwise the lists must match pairwise.
fn signature_matches(params: &[Param], arguments: &[Type]) -> bool {
    params.len() == arguments.len()
        && params
            .iter()
            .zip(arguments.iter())
            .all(|(param, argument)| param.ty == *argument)
}

/// Walk matching array nesting levels of a declared type and an initializer
/// type; report the first level where a sized declaration receives more
/// elements than it reserves. Unsized levels fit anything.
fn array_overflow(declared: &Type, value: &Type) -> Option<(usize, usize)> {
    let mut declared = declared;
    let mut value = value;

    loop {
        match (declared, value) {
            (
                Type::Array {
                    subtype: declared_sub,
                    size: declared_size,
                },
                Type::Array {
                    subtype: value_sub,
                    size: value_size,
                },
            ) => {
                if *declared_size != 0 && *value_size > *declared_size {
                    return Some((*declared_size, *value_size));
                }
                declared = declared_sub;
                value = value_sub;
            }
            _ => return None,
        }
    }
}

/// Check a whole program, returning every diagnostic found. An empty vec
/// means the program type-checks.
pub fn type_check(program: &[Decl], symbols: &SymbolTable) -> Vec<TypeError> {
    let mut checker = TypeChecker::new(symbols);
    checker.check_program(program);
    checker.errors
}

/// Re-synthesize the type of an expression in an already-checked tree.
/// Used by the code generator, which needs types (for `print` dispatch and
/// array sizing) but must not re-run diagnostics.
pub fn expr_type(expr: &Expr, symbols: &SymbolTable) -> Type {
    match expr {
        Expr::IntegerLiteral(_) => Type::Integer,
        Expr::StringLiteral(_) => Type::String,
        Expr::CharLiteral(_) => Type::Character,
        Expr::BooleanLiteral(_) => Type::Boolean,
        Expr::Name { symbol, .. } => {
            let id = symbol.expect("name expression resolved before code generation");
            symbols[id].ty.clone()
        }
        Expr::Group(inner) => expr_type(inner, symbols),
        Expr::Call { callee, .. } => match expr_type(callee, symbols) {
            Type::Function { return_type, .. } => *return_type,
            other => other,
        },
        Expr::Subscript { array, .. } => match expr_type(array, symbols) {
            Type::Array { subtype, .. } => *subtype,
            other => other,
        },
        Expr::ArrayLiteral(elements) => {
            let subtype = elements
                .first()
                .map(|element| expr_type(element, symbols))
                .unwrap_or(Type::Void);
            Type::array(subtype, elements.len())
        }
        Expr::Unary { op, operand } => match op {
            UnaryOp::Increment | UnaryOp::Decrement => expr_type(operand, symbols),
            UnaryOp::Negate => Type::Integer,
            UnaryOp::Not => Type::Boolean,
        },
        Expr::Binary { op, .. } => {
            if op.is_arithmetic() {
                Type::Integer
            } else {
                Type::Boolean
            }
        }
        Expr::Assignment { value, .. } => expr_type(value, symbols),
    }
}
