//! Crate root: wires together the B-minor compilation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `lexer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns the root declaration list.
//! - `resolver` binds every name to a symbol under lexical scoping rules.
//! - `type_checker` computes and validates a type for every construct.
//! - `codegen` lowers the checked tree into x86-64 AT&T assembly.
//! - `errors` centralises the diagnostics shared by the other modules.
//!
//! Resolution must fully complete before type checking, which must fully
//! complete before code generation; `compile` runs the stages in that order
//! and stops at the first stage that fails.

#![allow(clippy::module_inception)]

use std::fmt::Display;
use std::rc::Rc;

pub mod ast;
pub mod codegen;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;
pub mod type_checker;

use crate::ast::decls::Decl;
use crate::errors::errors::CompileError;
use crate::lexer::tokens::Token;
use crate::resolver::symbols::SymbolTable;

/// A byte offset into a named source file.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.1, self.0)
    }
}

/// Half-open byte range covered by a token.
#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Tokenize a source string without running any later stage.
pub fn scan(source: &str, file: Option<String>) -> Result<Vec<Token>, CompileError> {
    Ok(lexer::lexer::tokenize(source, file)?)
}

/// Tokenize and parse a source string into the root declaration list.
pub fn parse_source(source: &str, file: Option<String>) -> Result<Vec<Decl>, CompileError> {
    let tokens = lexer::lexer::tokenize(source, file)?;
    Ok(parser::parser::parse(tokens)?)
}

/// Parse and resolve a source string, returning the annotated tree and the
/// symbol table its name expressions now point into.
pub fn resolve_source(
    source: &str,
    file: Option<String>,
) -> Result<(Vec<Decl>, SymbolTable), CompileError> {
    let mut program = parse_source(source, file)?;
    let symbols = resolver::resolver::resolve(&mut program)?;
    Ok((program, symbols))
}

/// Run every stage up to and including type checking.
pub fn check_source(
    source: &str,
    file: Option<String>,
) -> Result<(Vec<Decl>, SymbolTable), CompileError> {
    let (program, symbols) = resolve_source(source, file)?;
    let diagnostics = type_checker::type_checker::type_check(&program, &symbols);
    if diagnostics.is_empty() {
        Ok((program, symbols))
    } else {
        Err(CompileError::TypeCheck(diagnostics))
    }
}

/// Compile a source string into x86-64 AT&T assembly.
pub fn compile(source: &str, file: Option<String>) -> Result<String, CompileError> {
    let (program, mut symbols) = check_source(source, file)?;
    Ok(codegen::codegen::generate(&program, &mut symbols)?)
}
