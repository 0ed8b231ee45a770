//! Type parsing implementation.
//!
//! Grammar:
//!
//! ```text
//! type      := void | boolean | char | integer | string
//!            | array [ size? ] type
//!            | function type ( params )
//! params    := (name : type) {, name : type}*
//! ```

use crate::ast::types::{Param, Type};
use crate::errors::errors::{SyntaxError, SyntaxErrorKind};
use crate::lexer::tokens::TokenKind;

use super::parser::Parser;

pub fn parse_type(parser: &mut Parser) -> Result<Type, SyntaxError> {
    match parser.current_token_kind() {
        TokenKind::Void => {
            parser.advance();
            Ok(Type::Void)
        }
        TokenKind::Boolean => {
            parser.advance();
            Ok(Type::Boolean)
        }
        TokenKind::Char => {
            parser.advance();
            Ok(Type::Character)
        }
        TokenKind::Integer => {
            parser.advance();
            Ok(Type::Integer)
        }
        TokenKind::String => {
            parser.advance();
            Ok(Type::String)
        }
        TokenKind::Array => {
            parser.advance();
            parser.expect(TokenKind::OpenBracket)?;

            // The size is optional: `array [] integer` is unsized.
            let size = if parser.current_token_kind() == TokenKind::Number {
                let token = parser.advance().clone();
                token.value.parse::<usize>().map_err(|_| {
                    SyntaxError::new(
                        SyntaxErrorKind::NumberParseError {
                            token: token.value.clone(),
                        },
                        token.span.start.clone(),
                    )
                })?
            } else {
                0
            };

            parser.expect(TokenKind::CloseBracket)?;
            let subtype = parse_type(parser)?;
            Ok(Type::array(subtype, size))
        }
        TokenKind::Function => {
            parser.advance();
            let return_type = parse_type(parser)?;
            parser.expect_detailed(
                TokenKind::OpenParen,
                "function types list their parameters in parentheses",
            )?;
            let params = parse_params(parser)?;
            parser.expect(TokenKind::CloseParen)?;
            Ok(Type::function(return_type, params))
        }
        _ => Err(parser.unexpected()),
    }
}

fn parse_params(parser: &mut Parser) -> Result<Vec<Param>, SyntaxError> {
    let mut params = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        if !params.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }

        let name = parser.expect(TokenKind::Identifier)?.value;
        parser.expect(TokenKind::Colon)?;
        let ty = parse_type(parser)?;
        params.push(Param::new(name, ty));
    }

    Ok(params)
}
