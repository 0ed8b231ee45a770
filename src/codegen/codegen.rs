//! The code-generation driver.
//!
//! Owns the generator state: the scratch pool, the label counter, the
//! stack-offset cursor, and the output buffers. Everything is constructed
//! fresh per `generate` call, so driving the pipeline repeatedly in one
//! process never leaks state between compilations.
//!
//! Storage assignment is lazy: the first time a local or parameter symbol
//! is referenced, the cursor drops by the symbol's storage size and the
//! offset sticks. Visitation order is deterministic, so offsets reproduce
//! across runs. The frame reservation emitted in the prologue sums the
//! storage of the parameters and every declaration in the body, which the
//! lazy assignments then consume from the top.

use crate::ast::decls::Decl;
use crate::ast::expressions::{Expr, UnaryOp};
use crate::ast::statements::Stmt;
use crate::ast::types::Type;
use crate::errors::errors::CodegenError;
use crate::resolver::symbols::{Storage, SymbolId, SymbolKind, SymbolTable};

use super::scratch::{Labels, Scratch};

/// System V argument registers, in ordinal order.
pub(super) const ARGUMENT_REGISTERS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];

/// The caller-saved set preserved around every call. `%rax` is deliberately
/// absent: popping a stale `%rax` over the return value would corrupt the
/// calling convention.
pub(super) const CALLER_SAVED: [&str; 8] =
    ["%rcx", "%rdx", "%rsi", "%rdi", "%r8", "%r9", "%r10", "%r11"];

pub struct CodeGenerator<'a> {
    pub(super) symbols: &'a mut SymbolTable,
    pub(super) scratch: Scratch,
    pub(super) labels: Labels,
    pub(super) stack_position: i32,
    pub(super) text: String,
    pub(super) data: Vec<String>,
    /// The epilogue label of the function currently being generated.
    pub(super) epilogue: String,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(symbols: &'a mut SymbolTable) -> Self {
        CodeGenerator {
            symbols,
            scratch: Scratch::new(),
            labels: Labels::new(),
            stack_position: 0,
            text: String::new(),
            data: vec![],
            epilogue: String::new(),
        }
    }

    /// Emit one instruction line.
    pub(super) fn emit(&mut self, instruction: impl AsRef<str>) {
        self.text.push_str("\t");
        self.text.push_str(instruction.as_ref());
        self.text.push('\n');
    }

    /// Emit a label line.
    pub(super) fn emit_label(&mut self, label: impl AsRef<str>) {
        self.text.push_str(label.as_ref());
        self.text.push_str(":\n");
    }

    /// Emit an assembler directive line.
    pub(super) fn emit_directive(&mut self, directive: impl AsRef<str>) {
        self.text.push_str(directive.as_ref());
        self.text.push('\n');
    }

    /// The operand addressing a symbol's storage, assigning frame offsets
    /// on first touch.
    pub(super) fn symbol_storage(&mut self, id: SymbolId) -> String {
        if self.symbols[id].storage.is_none() {
            let storage = match self.symbols[id].kind {
                SymbolKind::Global => Storage::Label(self.symbols[id].name.clone()),
                SymbolKind::Local | SymbolKind::Parameter => {
                    let size = storage_size(&self.symbols[id].ty);
                    self.stack_position -= size;
                    Storage::FrameOffset(self.stack_position)
                }
            };
            self.symbols[id].storage = Some(storage);
        }

        match self.symbols[id].storage.as_ref().unwrap() {
            Storage::Label(label) => format!("{}(%rip)", label),
            Storage::FrameOffset(offset) => format!("{}(%rbp)", offset),
        }
    }

    fn gen_function(&mut self, decl: &Decl) -> Result<(), CodegenError> {
        // Expression lowering frees everything it allocates; a leftover bit
        // here means a bug upstream, and a fresh mask keeps it from
        // poisoning this function.
        if !self.scratch.is_empty() {
            log::warn!(
                "scratch registers still in use entering '{}'; resetting the pool",
                decl.name
            );
            self.scratch = Scratch::new();
        }
        self.stack_position = 0;
        self.epilogue = format!(".{}_epilogue", decl.name);

        self.emit_directive(".text");
        self.emit_directive(format!(".global {}", decl.name));
        self.emit_label(&decl.name);
        self.emit("pushq %rbp");
        self.emit("movq %rsp, %rbp");

        let frame = frame_reservation(decl);
        if frame > 0 {
            self.emit(format!("subq ${}, %rsp", frame));
        }

        // Store each parameter from its argument register into the frame.
        // Their offsets are assigned here, in declaration order.
        if let Type::Function { params, .. } = &decl.ty {
            if params.len() > ARGUMENT_REGISTERS.len() {
                return Err(CodegenError::TooManyArguments {
                    name: decl.name.clone(),
                    count: params.len(),
                    limit: ARGUMENT_REGISTERS.len(),
                });
            }

            for (ordinal, param) in params.iter().enumerate() {
                let id = param
                    .symbol
                    .expect("parameter resolved before code generation");
                let storage = self.symbol_storage(id);
                self.emit(format!("movq {}, {}", ARGUMENT_REGISTERS[ordinal], storage));
            }
        }

        if let Some(code) = &decl.code {
            for statement in code {
                self.stmt_codegen(statement)?;
            }
        }

        let epilogue = self.epilogue.clone();
        self.emit_label(epilogue);
        self.emit("movq %rbp, %rsp");
        self.emit("popq %rbp");
        self.emit("ret");

        Ok(())
    }

    fn gen_global_data(&mut self, decl: &Decl) -> Result<(), CodegenError> {
        self.data.push(format!("{}:", decl.name));

        match &decl.value {
            None => match &decl.ty {
                Type::Array { .. } => {
                    self.data.push(format!("\t.zero {}", storage_size(&decl.ty)));
                }
                _ => self.data.push("\t.quad 0".to_string()),
            },
            Some(Expr::StringLiteral(value)) => {
                self.data.push(format!("\t.string \"{}\"", escape(value)));
            }
            Some(Expr::ArrayLiteral(elements)) => {
                let mut words = vec![];
                flatten_constants(&decl.name, elements, &mut words)?;
                for word in &words {
                    self.data.push(format!("\t.quad {}", word));
                }

                let declared = storage_size(&decl.ty) / 8;
                if declared > words.len() as i32 {
                    let padding = declared - words.len() as i32;
                    self.data.push(format!("\t.zero {}", padding * 8));
                }
            }
            Some(expr) => match constant_value(expr) {
                Some(value) => self.data.push(format!("\t.quad {}", value)),
                None => {
                    return Err(CodegenError::NonConstantGlobal {
                        name: decl.name.clone(),
                    })
                }
            },
        }

        Ok(())
    }

    fn gen_program(&mut self, program: &[Decl]) -> Result<(), CodegenError> {
        for decl in program {
            if decl.code.is_some() {
                self.gen_function(decl)?;
            } else if !decl.ty.is_function() {
                self.gen_global_data(decl)?;
            }
            // Function prototypes without bodies emit nothing; the label
            // resolves at link time.
        }

        Ok(())
    }

    fn output(self) -> String {
        let mut output = self.text;

        if !self.data.is_empty() {
            output.push_str(".data\n");
            for line in &self.data {
                output.push_str(line);
                output.push('\n');
            }
        }

        output
    }
}

/// Bytes of frame storage a value of this type occupies. Arrays reserve a
/// slot per element; everything else is one 8-byte word.
pub(super) fn storage_size(ty: &Type) -> i32 {
    match ty {
        Type::Array { subtype, size } => (std::cmp::max(*size, 1) as i32) * storage_size(subtype),
        _ => 8,
    }
}

/// Total frame bytes a function needs: its parameters plus every
/// declaration anywhere in its body.
fn frame_reservation(decl: &Decl) -> i32 {
    let mut total = 0;

    if let Type::Function { params, .. } = &decl.ty {
        total += params.iter().map(|p| storage_size(&p.ty)).sum::<i32>();
    }

    if let Some(code) = &decl.code {
        total += code.iter().map(stmt_storage).sum::<i32>();
    }

    total
}

fn stmt_storage(stmt: &Stmt) -> i32 {
    match stmt {
        Stmt::Decl(decl) => storage_size(&decl.ty),
        Stmt::If {
            body, else_body, ..
        } => {
            stmt_storage(body)
                + else_body
                    .as_ref()
                    .map(|else_body| stmt_storage(else_body))
                    .unwrap_or(0)
        }
        Stmt::For { body, .. } => stmt_storage(body),
        Stmt::Block(statements) => statements.iter().map(stmt_storage).sum(),
        _ => 0,
    }
}

/// Fold an expression down to a link-time constant, if it is one.
pub(super) fn constant_value(expr: &Expr) -> Option<i64> {
    match expr {
        Expr::IntegerLiteral(value) => Some(*value),
        Expr::BooleanLiteral(value) => Some(if *value { 1 } else { 0 }),
        Expr::CharLiteral(value) => Some(*value as i64),
        Expr::Group(inner) => constant_value(inner),
        Expr::Unary {
            op: UnaryOp::Negate,
            operand,
        } => constant_value(operand).map(|value| -value),
        _ => None,
    }
}

fn flatten_constants(
    name: &str,
    elements: &[Expr],
    words: &mut Vec<i64>,
) -> Result<(), CodegenError> {
    for element in elements {
        match element {
            Expr::ArrayLiteral(nested) => flatten_constants(name, nested, words)?,
            other => match constant_value(other) {
                Some(value) => words.push(value),
                None => {
                    return Err(CodegenError::NonConstantGlobal {
                        name: name.to_string(),
                    })
                }
            },
        }
    }

    Ok(())
}

/// Escape a string for a `.string` directive.
pub(super) fn escape(value: &str) -> String {
    let mut escaped = String::new();

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Lower a whole program to assembly text. The symbol table is mutated:
/// every referenced symbol ends up with its storage descriptor assigned.
pub fn generate(program: &[Decl], symbols: &mut SymbolTable) -> Result<String, CodegenError> {
    let mut generator = CodeGenerator::new(symbols);
    generator.gen_program(program)?;
    Ok(generator.output())
}
