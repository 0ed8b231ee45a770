//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct, the token-cursor helpers
//! shared by the other parsing files, and declaration parsing, the
//! entry-level grammar production of a B-minor program.

use crate::ast::decls::Decl;
use crate::errors::errors::{SyntaxError, SyntaxErrorKind};
use crate::lexer::tokens::{Token, TokenKind};
use crate::Position;

use super::expr::parse_expr;
use super::stmt::parse_stmt;
use super::types::parse_type;

/// The main parser structure: a token stream and a cursor into it.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the kind of the token `n` places ahead of the cursor.
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    /// Advances to the next token and returns the consumed one.
    pub fn advance(&mut self) -> &Token {
        self.pos += 1;
        &self.tokens[(self.pos - 1).min(self.tokens.len() - 1)]
    }

    /// The source position of the current token.
    pub fn position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Expects a token of the specified kind, consuming and returning it.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.current_token_kind() != expected_kind {
            return Err(self.unexpected());
        }
        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind, with extra context for the
    /// message when the expectation fails.
    pub fn expect_detailed(
        &mut self,
        expected_kind: TokenKind,
        message: &str,
    ) -> Result<Token, SyntaxError> {
        if self.current_token_kind() != expected_kind {
            let token = self.current_token();
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnexpectedTokenDetailed {
                    token: token.value.clone(),
                    message: message.to_string(),
                },
                token.span.start.clone(),
            ));
        }
        Ok(self.advance().clone())
    }

    /// A default unexpected-token error at the cursor.
    pub fn unexpected(&self) -> SyntaxError {
        let token = self.current_token();
        SyntaxError::new(
            SyntaxErrorKind::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.pos < self.tokens.len() && self.current_token_kind() != TokenKind::EOF
    }
}

/// Parse a declaration:
///
/// ```text
/// name : type ;
/// name : type = expr ;
/// name : function type ( params ) ;          -- prototype
/// name : function type ( params ) = { ... }  -- definition
/// ```
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, SyntaxError> {
    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect_detailed(TokenKind::Colon, "declarations need a ':' after the name")?;
    let ty = parse_type(parser)?;

    let mut decl = Decl::new(name, ty);

    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();

        // `= {` after a function type opens the body; after anything else
        // it is an array-literal initializer.
        if decl.ty.is_function() && parser.current_token_kind() == TokenKind::OpenCurly {
            parser.advance();
            let mut code = vec![];
            while parser.current_token_kind() != TokenKind::CloseCurly {
                if !parser.has_tokens() {
                    return Err(parser.unexpected());
                }
                code.push(parse_stmt(parser)?);
            }
            parser.expect(TokenKind::CloseCurly)?;
            decl.code = Some(code);
            return Ok(decl);
        }

        decl.value = Some(parse_expr(parser)?);
    }

    parser.expect_detailed(TokenKind::Semicolon, "did you miss a semicolon?")?;
    Ok(decl)
}

/// Parses a stream of tokens into the root declaration list.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Decl>, SyntaxError> {
    let mut parser = Parser::new(tokens);
    let mut program = vec![];

    while parser.has_tokens() {
        program.push(parse_decl(&mut parser)?);
    }

    Ok(program)
}
