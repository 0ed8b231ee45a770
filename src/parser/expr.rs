//! Expression parsing implementation.
//!
//! Precedence climbing, loosest first:
//!
//! ```text
//! assignment   =            (right associative)
//! logical-or   ||
//! logical-and  &&
//! comparison   < <= > >= == !=
//! additive     + -
//! multiplicative * / %
//! exponent     ^            (right associative)
//! unary        - !
//! postfix      ++ -- [expr] (args)
//! primary      literal, name, (expr), {expr, ...}
//! ```

use crate::ast::expressions::{BinaryOp, Expr, UnaryOp};
use crate::errors::errors::{SyntaxError, SyntaxErrorKind};
use crate::lexer::tokens::TokenKind;

use super::parser::Parser;

pub fn parse_expr(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    parse_assignment(parser)
}

fn parse_assignment(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    let target = parse_or(parser)?;

    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        let value = parse_assignment(parser)?;
        return Ok(Expr::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        });
    }

    Ok(target)
}

fn parse_or(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    let mut left = parse_and(parser)?;

    while parser.current_token_kind() == TokenKind::Or {
        parser.advance();
        let right = parse_and(parser)?;
        left = Expr::binary(BinaryOp::Or, left, right);
    }

    Ok(left)
}

fn parse_and(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    let mut left = parse_comparison(parser)?;

    while parser.current_token_kind() == TokenKind::And {
        parser.advance();
        let right = parse_comparison(parser)?;
        left = Expr::binary(BinaryOp::And, left, right);
    }

    Ok(left)
}

fn parse_comparison(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    let mut left = parse_additive(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Less => BinaryOp::Lt,
            TokenKind::LessEquals => BinaryOp::Lte,
            TokenKind::Greater => BinaryOp::Gt,
            TokenKind::GreaterEquals => BinaryOp::Gte,
            TokenKind::Equals => BinaryOp::Eq,
            TokenKind::NotEquals => BinaryOp::Neq,
            _ => break,
        };
        parser.advance();
        let right = parse_additive(parser)?;
        left = Expr::binary(op, left, right);
    }

    Ok(left)
}

fn parse_additive(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    let mut left = parse_multiplicative(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Dash => BinaryOp::Sub,
            _ => break,
        };
        parser.advance();
        let right = parse_multiplicative(parser)?;
        left = Expr::binary(op, left, right);
    }

    Ok(left)
}

fn parse_multiplicative(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    let mut left = parse_exponent(parser)?;

    loop {
        let op = match parser.current_token_kind() {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            _ => break,
        };
        parser.advance();
        let right = parse_exponent(parser)?;
        left = Expr::binary(op, left, right);
    }

    Ok(left)
}

fn parse_exponent(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    let left = parse_unary(parser)?;

    if parser.current_token_kind() == TokenKind::Caret {
        parser.advance();
        let right = parse_exponent(parser)?;
        return Ok(Expr::binary(BinaryOp::Pow, left, right));
    }

    Ok(left)
}

fn parse_unary(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    match parser.current_token_kind() {
        TokenKind::Dash => {
            parser.advance();
            Ok(Expr::unary(UnaryOp::Negate, parse_unary(parser)?))
        }
        TokenKind::Not => {
            parser.advance();
            Ok(Expr::unary(UnaryOp::Not, parse_unary(parser)?))
        }
        _ => parse_postfix(parser),
    }
}

fn parse_postfix(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    let mut expr = parse_primary(parser)?;

    loop {
        match parser.current_token_kind() {
            TokenKind::PlusPlus => {
                parser.advance();
                expr = Expr::unary(UnaryOp::Increment, expr);
            }
            TokenKind::MinusMinus => {
                parser.advance();
                expr = Expr::unary(UnaryOp::Decrement, expr);
            }
            TokenKind::OpenBracket => {
                parser.advance();
                let index = parse_expr(parser)?;
                parser.expect(TokenKind::CloseBracket)?;
                expr = Expr::Subscript {
                    array: Box::new(expr),
                    index: Box::new(index),
                };
            }
            TokenKind::OpenParen => {
                parser.advance();
                let arguments = parse_arguments(parser)?;
                parser.expect(TokenKind::CloseParen)?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    arguments,
                };
            }
            _ => break,
        }
    }

    Ok(expr)
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, SyntaxError> {
    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        if !arguments.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        arguments.push(parse_expr(parser)?);
    }

    Ok(arguments)
}

fn parse_primary(parser: &mut Parser) -> Result<Expr, SyntaxError> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance().clone();
            let value = token.value.parse::<i64>().map_err(|_| {
                SyntaxError::new(
                    SyntaxErrorKind::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )
            })?;
            Ok(Expr::IntegerLiteral(value))
        }
        TokenKind::True => {
            parser.advance();
            Ok(Expr::BooleanLiteral(true))
        }
        TokenKind::False => {
            parser.advance();
            Ok(Expr::BooleanLiteral(false))
        }
        TokenKind::CharLiteral => {
            let token = parser.advance().clone();
            Ok(Expr::CharLiteral(token.value.chars().next().unwrap_or('\0')))
        }
        TokenKind::StringLiteral => {
            let token = parser.advance().clone();
            Ok(Expr::StringLiteral(token.value))
        }
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            Ok(Expr::name(token.value))
        }
        TokenKind::OpenParen => {
            parser.advance();
            let inner = parse_expr(parser)?;
            parser.expect(TokenKind::CloseParen)?;
            Ok(Expr::Group(Box::new(inner)))
        }
        TokenKind::OpenCurly => {
            parser.advance();
            let mut elements = vec![];
            while parser.current_token_kind() != TokenKind::CloseCurly {
                if !elements.is_empty() {
                    parser.expect(TokenKind::Comma)?;
                }
                elements.push(parse_expr(parser)?);
            }
            parser.expect(TokenKind::CloseCurly)?;
            Ok(Expr::ArrayLiteral(elements))
        }
        _ => Err(parser.unexpected()),
    }
}
