//! Expression lowering.
//!
//! Every expression evaluates into exactly one scratch register, returned
//! to the caller. Operand registers are consumed: whichever operand does
//! not carry the result is freed before returning, so an expression tree
//! in flight holds exactly one live register per unfinished node.

use crate::ast::expressions::{BinaryOp, Expr, UnaryOp};
use crate::errors::errors::CodegenError;

use super::codegen::{CodeGenerator, ARGUMENT_REGISTERS, CALLER_SAVED};
use super::scratch::Reg;

impl<'a> CodeGenerator<'a> {
    pub(super) fn expr_codegen(&mut self, expr: &Expr) -> Result<Reg, CodegenError> {
        match expr {
            Expr::IntegerLiteral(value) => self.load_immediate(*value),
            Expr::BooleanLiteral(value) => self.load_immediate(if *value { 1 } else { 0 }),
            Expr::CharLiteral(value) => self.load_immediate(*value as i64),

            Expr::StringLiteral(value) => {
                let label = self.labels.create();
                self.data.push(format!("{}:", label));
                self.data
                    .push(format!("\t.string \"{}\"", super::codegen::escape(value)));

                let reg = self.scratch.alloc()?;
                self.emit(format!("leaq {}(%rip), {}", label, reg));
                Ok(reg)
            }

            Expr::Name { name, symbol } => {
                let id = symbol.expect("name expression resolved before code generation");
                let storage = self.symbol_storage(id);
                let reg = self.scratch.alloc()?;

                // Arrays evaluate to their base address; scalars to their
                // value.
                if self.symbols[id].ty.is_array() {
                    self.emit(format!("leaq {}, {}", storage, reg));
                } else {
                    log::trace!("loading '{}' from {}", name, storage);
                    self.emit(format!("movq {}, {}", storage, reg));
                }

                Ok(reg)
            }

            Expr::Group(inner) => self.expr_codegen(inner),

            Expr::Unary { op, operand } => {
                let reg = self.expr_codegen(operand)?;
                match op {
                    UnaryOp::Negate => self.emit(format!("negq {}", reg)),
                    UnaryOp::Not => self.emit(format!("xorq $1, {}", reg)),
                    UnaryOp::Increment => self.emit(format!("incq {}", reg)),
                    UnaryOp::Decrement => self.emit(format!("decq {}", reg)),
                }
                Ok(reg)
            }

            Expr::Binary { op, left, right } => self.binary_codegen(*op, left, right),

            Expr::Assignment { target, value } => {
                let value_reg = self.expr_codegen(value)?;

                match target.as_ref() {
                    Expr::Name { symbol, .. } => {
                        let id = symbol.expect("name expression resolved before code generation");
                        let storage = self.symbol_storage(id);
                        self.emit(format!("movq {}, {}", value_reg, storage));
                    }
                    Expr::Subscript { array, index } => {
                        let address = self.subscript_address(array, index)?;
                        self.emit(format!("movq {}, ({})", value_reg, address));
                        self.scratch.free(address);
                    }
                    other => {
                        return Err(CodegenError::UnsupportedConstruct {
                            construct: "assignment target",
                            detail: other.to_string(),
                        })
                    }
                }

                Ok(value_reg)
            }

            Expr::Subscript { array, index } => {
                let address = self.subscript_address(array, index)?;
                self.emit(format!("movq ({}), {}", address, address));
                Ok(address)
            }

            Expr::Call { callee, arguments } => self.call_codegen(callee, arguments),

            Expr::ArrayLiteral(_) => Err(CodegenError::UnsupportedConstruct {
                construct: "array literal",
                detail: "array literals lower only as declaration initializers".to_string(),
            }),
        }
    }

    fn load_immediate(&mut self, value: i64) -> Result<Reg, CodegenError> {
        let reg = self.scratch.alloc()?;
        self.emit(format!("movq ${}, {}", value, reg));
        Ok(reg)
    }

    fn binary_codegen(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<Reg, CodegenError> {
        let left_reg = self.expr_codegen(left)?;
        let right_reg = self.expr_codegen(right)?;

        match op {
            BinaryOp::Add => {
                self.emit(format!("addq {}, {}", right_reg, left_reg));
                self.scratch.free(right_reg);
                Ok(left_reg)
            }
            BinaryOp::Sub => {
                self.emit(format!("subq {}, {}", right_reg, left_reg));
                self.scratch.free(right_reg);
                Ok(left_reg)
            }
            BinaryOp::Mul => {
                self.emit(format!("imulq {}, {}", right_reg, left_reg));
                self.scratch.free(right_reg);
                Ok(left_reg)
            }

            // The hardware divide works through fixed registers: remainder
            // register cleared, dividend in %rax, quotient back in %rax and
            // remainder in %rdx.
            BinaryOp::Div | BinaryOp::Mod => {
                self.emit("movq $0, %rdx");
                self.emit(format!("movq {}, %rax", left_reg));
                self.emit(format!("idivq {}", right_reg));

                self.scratch.free(left_reg);
                self.scratch.free(right_reg);

                let result = self.scratch.alloc()?;
                let source = if op == BinaryOp::Div { "%rax" } else { "%rdx" };
                self.emit(format!("movq {}, {}", source, result));
                Ok(result)
            }

            // No hardware exponent; an inline multiply loop keeps the
            // lowering inside the scratch discipline.
            BinaryOp::Pow => {
                let result = self.scratch.alloc()?;
                let top = self.labels.create();
                let done = self.labels.create();

                self.emit(format!("movq $1, {}", result));
                self.emit_label(top.to_string());
                self.emit(format!("cmpq $0, {}", right_reg));
                self.emit(format!("jle {}", done));
                self.emit(format!("imulq {}, {}", left_reg, result));
                self.emit(format!("decq {}", right_reg));
                self.emit(format!("jmp {}", top));
                self.emit_label(done.to_string());

                self.scratch.free(left_reg);
                self.scratch.free(right_reg);
                Ok(result)
            }

            BinaryOp::Lt
            | BinaryOp::Lte
            | BinaryOp::Gt
            | BinaryOp::Gte
            | BinaryOp::Eq
            | BinaryOp::Neq => {
                let set = match op {
                    BinaryOp::Lt => "setl",
                    BinaryOp::Lte => "setle",
                    BinaryOp::Gt => "setg",
                    BinaryOp::Gte => "setge",
                    BinaryOp::Eq => "sete",
                    _ => "setne",
                };

                self.emit(format!("cmpq {}, {}", right_reg, left_reg));
                self.emit(format!("{} {}", set, left_reg.byte_name()));
                self.emit(format!("movzbq {}, {}", left_reg.byte_name(), left_reg));
                self.scratch.free(right_reg);
                Ok(left_reg)
            }

            BinaryOp::And | BinaryOp::Or => {
                let instruction = if op == BinaryOp::And { "andq" } else { "orq" };
                self.emit(format!("{} {}, {}", instruction, right_reg, left_reg));
                self.emit(format!("setne {}", left_reg.byte_name()));
                self.emit(format!("movzbq {}, {}", left_reg.byte_name(), left_reg));
                self.scratch.free(right_reg);
                Ok(left_reg)
            }
        }
    }

    /// Compute the address of `array[index]` into a register: the index
    /// scaled by the element size, added to the base address.
    fn subscript_address(&mut self, array: &Expr, index: &Expr) -> Result<Reg, CodegenError> {
        let base = self.expr_codegen(array)?;
        let offset = self.expr_codegen(index)?;

        self.emit(format!("imulq $8, {}", offset));
        self.emit(format!("addq {}, {}", base, offset));
        self.scratch.free(base);

        Ok(offset)
    }

    fn call_codegen(&mut self, callee: &Expr, arguments: &[Expr]) -> Result<Reg, CodegenError> {
        let target = match callee {
            Expr::Name { name, .. } => name.clone(),
            other => {
                return Err(CodegenError::UnsupportedConstruct {
                    construct: "call target",
                    detail: other.to_string(),
                })
            }
        };

        if arguments.len() > ARGUMENT_REGISTERS.len() {
            return Err(CodegenError::TooManyArguments {
                name: target,
                count: arguments.len(),
                limit: ARGUMENT_REGISTERS.len(),
            });
        }

        // Save the caller-saved set. An argument expression may itself
        // contain a call, and this is what keeps the partially marshalled
        // argument registers of the outer call alive across it.
        for reg in CALLER_SAVED {
            self.emit(format!("pushq {}", reg));
        }

        for (ordinal, argument) in arguments.iter().enumerate() {
            let reg = self.expr_codegen(argument)?;
            self.emit(format!("movq {}, {}", reg, ARGUMENT_REGISTERS[ordinal]));
            self.scratch.free(reg);
        }

        self.emit(format!("call {}", target));

        // Restore in exactly the reverse order of the pushes.
        for reg in CALLER_SAVED.iter().rev() {
            self.emit(format!("popq {}", reg));
        }

        let result = self.scratch.alloc()?;
        self.emit(format!("movq %rax, {}", result));
        Ok(result)
    }
}
