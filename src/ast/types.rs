//! Type system definitions for the AST.
//!
//! This module defines the B-minor type system:
//!
//! - Atomic types (void, boolean, char, integer, string)
//! - Array types carrying a subtype and an optional fixed size
//! - Function types carrying a return type and an ordered parameter list
//!
//! Types are plain owned values. Every consumer that retains a type clones
//! it, so a computed type is never aliased into another node. Equality
//! follows the language rules rather than structural identity: array sizes
//! and parameter names/symbols are not part of equality.

use std::fmt::Display;

use crate::resolver::symbols::SymbolId;

/// One entry of a function type's parameter list.
///
/// The symbol slot is empty until the resolver binds the parameter inside
/// its function's scope. Parameter lists compare by type sequence only, so
/// `Param` itself carries no equality.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub symbol: Option<SymbolId>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Param {
            name: name.into(),
            ty,
            symbol: None,
        }
    }
}

/// A B-minor type.
#[derive(Debug, Clone)]
pub enum Type {
    Void,
    Boolean,
    Character,
    Integer,
    String,
    /// `size` of 0 means unsized: `array [] integer`.
    Array { subtype: Box<Type>, size: usize },
    Function { return_type: Box<Type>, params: Vec<Param> },
}

impl Type {
    pub fn array(subtype: Type, size: usize) -> Self {
        Type::Array {
            subtype: Box::new(subtype),
            size,
        }
    }

    pub fn function(return_type: Type, params: Vec<Param>) -> Self {
        Type::Function {
            return_type: Box::new(return_type),
            params,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    /// Whether values of this type may appear in an ordering or equality
    /// comparison.
    pub fn is_comparable(&self) -> bool {
        matches!(self, Type::Boolean | Type::Character | Type::Integer)
    }
}

/// Equality per the language rules: atomic types compare by kind, arrays by
/// subtype (size is checked separately for fit), functions by return type
/// and parameter type sequence.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Void, Type::Void)
            | (Type::Boolean, Type::Boolean)
            | (Type::Character, Type::Character)
            | (Type::Integer, Type::Integer)
            | (Type::String, Type::String) => true,
            (Type::Array { subtype: a, .. }, Type::Array { subtype: b, .. }) => a == b,
            (
                Type::Function {
                    return_type: ra,
                    params: pa,
                },
                Type::Function {
                    return_type: rb,
                    params: pb,
                },
            ) => ra == rb && params_equal(pa, pb),
            _ => false,
        }
    }
}

/// Parameter-list agreement: names and symbols never matter, only the type
/// sequence.
pub fn params_equal(a: &[Param], b: &[Param]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.ty == y.ty)
}

/// Render a parameter list as it appears in a declaration: `a: integer, b:
/// boolean`.
pub fn params_to_string(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Boolean => write!(f, "boolean"),
            Type::Character => write!(f, "char"),
            Type::Integer => write!(f, "integer"),
            Type::String => write!(f, "string"),
            Type::Array { subtype, size } => {
                if *size == 0 {
                    write!(f, "array [] {}", subtype)
                } else {
                    write!(f, "array [{}] {}", size, subtype)
                }
            }
            Type::Function {
                return_type,
                params,
            } => {
                write!(f, "function {} ({})", return_type, params_to_string(params))
            }
        }
    }
}
