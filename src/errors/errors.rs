use std::fmt::Display;

use thiserror::Error;

use crate::ast::expressions::BinaryOp;
use crate::ast::types::Type;
use crate::Position;

/// A lexical or syntactic diagnostic anchored at a source position.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    kind: SyntaxErrorKind,
    position: Position,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, position: Position) -> Self {
        SyntaxError { kind, position }
    }

    pub fn kind(&self) -> &SyntaxErrorKind {
        &self.kind
    }

    pub fn position(&self) -> &Position {
        &self.position
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (at {})", self.kind, self.position)
    }
}

impl std::error::Error for SyntaxError {}

#[derive(Error, Debug, Clone)]
pub enum SyntaxErrorKind {
    #[error("unrecognised character: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing integer literal: {token:?}")]
    NumberParseError { token: String },
    #[error("unterminated block comment")]
    UnterminatedComment,
}

/// Fatal resolution failure. Type checking assumes every name expression
/// already carries a symbol, so an unresolved name halts the pipeline.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("symbol '{name}' referenced, but not yet declared")]
    UndeclaredSymbol { name: String },
}

/// An accumulated type-checking diagnostic. The checker reports these and
/// keeps going so one run surfaces every independent error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("declaration of '{name}' does not match its initializer: declared '{declared}', initializer evaluated to '{found}'")]
    DeclarationMismatch {
        name: String,
        declared: Type,
        found: Type,
    },
    #[error("array initializer for '{name}' holds {found} elements, but the declaration reserves {declared}")]
    InitializerTooLarge {
        name: String,
        declared: usize,
        found: usize,
    },
    #[error("declaration of '{name}' does not match its prototype's parameter list: expected '({expected})', found '({found})'")]
    PrototypeParameterMismatch {
        name: String,
        expected: String,
        found: String,
    },
    #[error("declaration of '{name}' does not match its prototype's return type: expected '{expected}', found '{found}'")]
    PrototypeReturnMismatch {
        name: String,
        expected: Type,
        found: Type,
    },
    #[error("attempted to call '{name}', which is of non-function type '{found}'")]
    NotAFunction { name: String, found: Type },
    #[error("called '{name}' with incompatible arguments: expected '({expected})', received '({found})'")]
    CallSignatureMismatch {
        name: String,
        expected: String,
        found: String,
    },
    #[error("attempted to increment or decrement a value of type '{found}'")]
    InvalidIncDec { found: Type },
    #[error("attempted to negate a value of type '{found}'")]
    InvalidNegate { found: Type },
    #[error("attempted to logically invert a value of type '{found}'")]
    InvalidNot { found: Type },
    #[error("attempted '{op}' arithmetic on types '{left}' and '{right}'")]
    InvalidArithmetic {
        op: BinaryOp,
        left: Type,
        right: Type,
    },
    #[error("attempted '{op}' comparison on uncomparable types '{left}' and '{right}'")]
    IncomparableTypes {
        op: BinaryOp,
        left: Type,
        right: Type,
    },
    #[error("attempted '{op}' comparison between differing types '{left}' and '{right}'")]
    ComparisonMismatch {
        op: BinaryOp,
        left: Type,
        right: Type,
    },
    #[error("attempted '{op}' on non-boolean types '{left}' and '{right}'")]
    InvalidLogical {
        op: BinaryOp,
        left: Type,
        right: Type,
    },
    #[error("assignment target of type '{left}' is not in agreement with value of type '{right}'")]
    AssignmentMismatch { left: Type, right: Type },
    #[error("array index is of non-integer type '{found}'")]
    IndexNotInteger { found: Type },
    #[error("attempted to index a value of non-array type '{found}'")]
    SubscriptOfNonArray { found: Type },
    #[error("array literal has no elements")]
    EmptyInitializer,
    #[error("array literal has conflicting element types: '{first}' beside '{conflicting}'")]
    ConflictingInitializerTypes { first: Type, conflicting: Type },
    #[error("{construct} condition must be boolean, but evaluated to type '{found}'")]
    NonBooleanCondition {
        construct: &'static str,
        found: Type,
    },
    #[error("return expression should be of type '{expected}', but evaluated to type '{found}'")]
    ReturnMismatch { expected: Type, found: Type },
}

impl TypeError {
    /// Stable name for the error category, independent of the types and
    /// names baked into the message.
    pub fn category(&self) -> &'static str {
        match self {
            TypeError::DeclarationMismatch { .. } => "DeclarationMismatch",
            TypeError::InitializerTooLarge { .. } => "InitializerTooLarge",
            TypeError::PrototypeParameterMismatch { .. } => "PrototypeParameterMismatch",
            TypeError::PrototypeReturnMismatch { .. } => "PrototypeReturnMismatch",
            TypeError::NotAFunction { .. } => "NotAFunction",
            TypeError::CallSignatureMismatch { .. } => "CallSignatureMismatch",
            TypeError::InvalidIncDec { .. } => "InvalidIncDec",
            TypeError::InvalidNegate { .. } => "InvalidNegate",
            TypeError::InvalidNot { .. } => "InvalidNot",
            TypeError::InvalidArithmetic { .. } => "InvalidArithmetic",
            TypeError::IncomparableTypes { .. } => "IncomparableTypes",
            TypeError::ComparisonMismatch { .. } => "ComparisonMismatch",
            TypeError::InvalidLogical { .. } => "InvalidLogical",
            TypeError::AssignmentMismatch { .. } => "AssignmentMismatch",
            TypeError::IndexNotInteger { .. } => "IndexNotInteger",
            TypeError::SubscriptOfNonArray { .. } => "SubscriptOfNonArray",
            TypeError::EmptyInitializer => "EmptyInitializer",
            TypeError::ConflictingInitializerTypes { .. } => "ConflictingInitializerTypes",
            TypeError::NonBooleanCondition { .. } => "NonBooleanCondition",
            TypeError::ReturnMismatch { .. } => "ReturnMismatch",
        }
    }
}

/// Fatal code-generation failure. The generator performs no spilling and no
/// recovery; these conditions stop the pipeline.
#[derive(Error, Debug, Clone)]
pub enum CodegenError {
    #[error("register allocation requested but all scratch registers are in use")]
    RegisterPoolExhausted,
    #[error("'{name}' uses {count} arguments, but the calling convention carries at most {limit}")]
    TooManyArguments {
        name: String,
        count: usize,
        limit: usize,
    },
    #[error("global initializer for '{name}' is not a constant expression")]
    NonConstantGlobal { name: String },
    #[error("{construct} has no lowering: {detail}")]
    UnsupportedConstruct {
        construct: &'static str,
        detail: String,
    },
}

/// The pipeline-level error surfaced by `compile` and the staged entry
/// points: whichever stage failed first, with its own diagnostics.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("type checking failed with {} error(s)", .0.len())]
    TypeCheck(Vec<TypeError>),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}
