//! Statement parsing implementation.
//!
//! Statements appear inside function bodies and blocks:
//!
//! ```text
//! stmt := decl
//!       | if ( expr ) stmt [else stmt]
//!       | for ( expr? ; expr? ; expr? ) stmt
//!       | print [expr {, expr}*] ;
//!       | return expr? ;
//!       | { stmt* }
//!       | expr ;
//! ```
//!
//! A declaration statement is recognised by the `name :` lookahead, which
//! is what distinguishes `x: integer;` from the expression statement `x;`.

use crate::ast::statements::Stmt;
use crate::errors::errors::SyntaxError;
use crate::lexer::tokens::TokenKind;

use super::expr::parse_expr;
use super::parser::{parse_decl, Parser};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, SyntaxError> {
    match parser.current_token_kind() {
        TokenKind::If => parse_if(parser),
        TokenKind::For => parse_for(parser),
        TokenKind::Print => parse_print(parser),
        TokenKind::Return => parse_return(parser),
        TokenKind::OpenCurly => parse_block(parser),
        TokenKind::Identifier if parser.peek_kind(1) == TokenKind::Colon => {
            Ok(Stmt::Decl(Box::new(parse_decl(parser)?)))
        }
        _ => {
            let expr = parse_expr(parser)?;
            parser.expect_detailed(TokenKind::Semicolon, "did you miss a semicolon?")?;
            Ok(Stmt::Expr(expr))
        }
    }
}

fn parse_if(parser: &mut Parser) -> Result<Stmt, SyntaxError> {
    parser.expect(TokenKind::If)?;
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = Box::new(parse_stmt(parser)?);

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If {
        condition,
        body,
        else_body,
    })
}

fn parse_for(parser: &mut Parser) -> Result<Stmt, SyntaxError> {
    parser.expect(TokenKind::For)?;
    parser.expect(TokenKind::OpenParen)?;

    let init = parse_optional_header_expr(parser, TokenKind::Semicolon)?;
    parser.expect(TokenKind::Semicolon)?;
    let condition = parse_optional_header_expr(parser, TokenKind::Semicolon)?;
    parser.expect(TokenKind::Semicolon)?;
    let next = parse_optional_header_expr(parser, TokenKind::CloseParen)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = Box::new(parse_stmt(parser)?);

    Ok(Stmt::For {
        init,
        condition,
        next,
        body,
    })
}

/// One of the three `for`-header slots, which may be empty.
fn parse_optional_header_expr(
    parser: &mut Parser,
    terminator: TokenKind,
) -> Result<Option<crate::ast::expressions::Expr>, SyntaxError> {
    if parser.current_token_kind() == terminator {
        Ok(None)
    } else {
        Ok(Some(parse_expr(parser)?))
    }
}

fn parse_print(parser: &mut Parser) -> Result<Stmt, SyntaxError> {
    parser.expect(TokenKind::Print)?;
    let mut expressions = vec![];

    if parser.current_token_kind() != TokenKind::Semicolon {
        expressions.push(parse_expr(parser)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            expressions.push(parse_expr(parser)?);
        }
    }

    parser.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Print(expressions))
}

fn parse_return(parser: &mut Parser) -> Result<Stmt, SyntaxError> {
    parser.expect(TokenKind::Return)?;

    let value = if parser.current_token_kind() == TokenKind::Semicolon {
        None
    } else {
        Some(parse_expr(parser)?)
    };

    parser.expect(TokenKind::Semicolon)?;
    Ok(Stmt::Return(value))
}

fn parse_block(parser: &mut Parser) -> Result<Stmt, SyntaxError> {
    parser.expect(TokenKind::OpenCurly)?;
    let mut statements = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected());
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(Stmt::Block(statements))
}
