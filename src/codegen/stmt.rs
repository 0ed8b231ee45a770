//! Statement lowering.
//!
//! Control flow is label-based: conditions evaluate into a register, a
//! `cmpq $0` decides, and conditional jumps route around the untaken arm.
//! Every statement leaves the scratch pool exactly as it found it.

use crate::ast::decls::Decl;
use crate::ast::expressions::Expr;
use crate::ast::statements::Stmt;
use crate::ast::types::Type;
use crate::errors::errors::CodegenError;
use crate::resolver::symbols::Storage;
use crate::type_checker::type_checker::expr_type;

use super::codegen::{CodeGenerator, ARGUMENT_REGISTERS, CALLER_SAVED};

impl<'a> CodeGenerator<'a> {
    pub(super) fn stmt_codegen(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Decl(decl) => self.local_decl_codegen(decl),

            Stmt::Expr(expr) => {
                let reg = self.expr_codegen(expr)?;
                self.scratch.free(reg);
                Ok(())
            }

            Stmt::If {
                condition,
                body,
                else_body,
            } => {
                let done = self.labels.create();
                let false_target = match else_body {
                    Some(_) => self.labels.create(),
                    None => done,
                };

                let reg = self.expr_codegen(condition)?;
                self.emit(format!("cmpq $0, {}", reg));
                self.scratch.free(reg);
                self.emit(format!("je {}", false_target));

                self.stmt_codegen(body)?;

                if let Some(else_body) = else_body {
                    self.emit(format!("jmp {}", done));
                    self.emit_label(false_target.to_string());
                    self.stmt_codegen(else_body)?;
                }

                self.emit_label(done.to_string());
                Ok(())
            }

            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                if let Some(init) = init {
                    let reg = self.expr_codegen(init)?;
                    self.scratch.free(reg);
                }

                let top = self.labels.create();
                let done = self.labels.create();

                self.emit_label(top.to_string());

                if let Some(condition) = condition {
                    let reg = self.expr_codegen(condition)?;
                    self.emit(format!("cmpq $0, {}", reg));
                    self.scratch.free(reg);
                    self.emit(format!("je {}", done));
                }

                self.stmt_codegen(body)?;

                if let Some(next) = next {
                    let reg = self.expr_codegen(next)?;
                    self.scratch.free(reg);
                }

                self.emit(format!("jmp {}", top));
                self.emit_label(done.to_string());
                Ok(())
            }

            Stmt::Print(expressions) => {
                for expression in expressions {
                    self.print_codegen(expression)?;
                }
                Ok(())
            }

            Stmt::Return(value) => {
                if let Some(value) = value {
                    let reg = self.expr_codegen(value)?;
                    self.emit(format!("movq {}, %rax", reg));
                    self.scratch.free(reg);
                }

                let epilogue = self.epilogue.clone();
                self.emit(format!("jmp {}", epilogue));
                Ok(())
            }

            Stmt::Block(statements) => {
                for statement in statements {
                    self.stmt_codegen(statement)?;
                }
                Ok(())
            }
        }
    }

    fn local_decl_codegen(&mut self, decl: &Decl) -> Result<(), CodegenError> {
        let id = decl
            .symbol
            .expect("declaration resolved before code generation");

        match &decl.value {
            None => Ok(()),

            // Element-by-element stores into the array's consecutive frame
            // slots.
            Some(Expr::ArrayLiteral(elements)) => {
                let storage = self.symbol_storage(id);
                let base = match self.symbols[id].storage.as_ref().unwrap() {
                    Storage::FrameOffset(offset) => *offset,
                    Storage::Label(_) => {
                        // Local declarations never carry label storage.
                        return Err(CodegenError::UnsupportedConstruct {
                            construct: "array initializer",
                            detail: format!("'{}' is not frame-allocated", decl.name),
                        });
                    }
                };
                log::trace!("initializing array '{}' at {}", decl.name, storage);

                for (index, element) in elements.iter().enumerate() {
                    if matches!(element, Expr::ArrayLiteral(_)) {
                        return Err(CodegenError::UnsupportedConstruct {
                            construct: "array initializer",
                            detail: "nested array literals in locals".to_string(),
                        });
                    }

                    let reg = self.expr_codegen(element)?;
                    self.emit(format!("movq {}, {}(%rbp)", reg, base + 8 * index as i32));
                    self.scratch.free(reg);
                }

                Ok(())
            }

            Some(expr) => {
                let reg = self.expr_codegen(expr)?;
                let storage = self.symbol_storage(id);
                self.emit(format!("movq {}, {}", reg, storage));
                self.scratch.free(reg);
                Ok(())
            }
        }
    }

    /// Dispatch one `print` operand to the runtime routine for its type.
    fn print_codegen(&mut self, expression: &Expr) -> Result<(), CodegenError> {
        let ty = expr_type(expression, self.symbols);
        let routine = match ty {
            Type::Integer => "print_integer",
            Type::Boolean => "print_boolean",
            Type::Character => "print_character",
            Type::String => "print_string",
            other => {
                return Err(CodegenError::UnsupportedConstruct {
                    construct: "print operand",
                    detail: other.to_string(),
                })
            }
        };

        let reg = self.expr_codegen(expression)?;

        for saved in CALLER_SAVED {
            self.emit(format!("pushq {}", saved));
        }
        self.emit(format!("movq {}, {}", reg, ARGUMENT_REGISTERS[0]));
        self.emit(format!("call {}", routine));
        for saved in CALLER_SAVED.iter().rev() {
            self.emit(format!("popq {}", saved));
        }

        self.scratch.free(reg);
        Ok(())
    }
}
