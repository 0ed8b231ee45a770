/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - decls: Declaration nodes, the roots of every B-minor program
/// - expressions: Definitions for various expression types
/// - statements: Definitions for various statement types
/// - types: Definitions for type representations in the AST
pub mod decls;
pub mod expressions;
pub mod statements;
pub mod types;
