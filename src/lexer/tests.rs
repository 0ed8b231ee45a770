//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer, character, and string literals with escape sequences
//! - Operators and punctuation
//! - Comments
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

#[test]
fn test_tokenize_keywords() {
    let source = "array boolean char else false for function if integer print return string true void";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Array);
    assert_eq!(tokens[1].kind, TokenKind::Boolean);
    assert_eq!(tokens[2].kind, TokenKind::Char);
    assert_eq!(tokens[3].kind, TokenKind::Else);
    assert_eq!(tokens[4].kind, TokenKind::False);
    assert_eq!(tokens[5].kind, TokenKind::For);
    assert_eq!(tokens[6].kind, TokenKind::Function);
    assert_eq!(tokens[7].kind, TokenKind::If);
    assert_eq!(tokens[8].kind, TokenKind::Integer);
    assert_eq!(tokens[9].kind, TokenKind::Print);
    assert_eq!(tokens[10].kind, TokenKind::Return);
    assert_eq!(tokens[11].kind, TokenKind::String);
    assert_eq!(tokens[12].kind, TokenKind::True);
    assert_eq!(tokens[13].kind, TokenKind::Void);
    assert_eq!(tokens[14].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore CamelCase";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "bar");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "_underscore");
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "CamelCase");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 0 100";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Number);
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].kind, TokenKind::Number);
    assert_eq!(tokens[2].value, "100");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_number_overflow() {
    let source = "99999999999999999999999999";
    let result = tokenize(source, Some("test.bminor".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "multiple words""#;
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].kind, TokenKind::StringLiteral);
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_escapes() {
    let source = r#""hello\nworld" "tab\there" "backslash\\" "quote\"quote""#;
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].value, "hello\nworld");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "backslash\\");
    assert_eq!(tokens[3].value, "quote\"quote");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_char_literals() {
    let source = r"'a' '\n' '\'' '\\'";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].value, "\n");
    assert_eq!(tokens[2].value, "'");
    assert_eq!(tokens[3].value, "\\");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * / % ^ == != < > <= >= = ! && || ++ --";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Plus);
    assert_eq!(tokens[1].kind, TokenKind::Dash);
    assert_eq!(tokens[2].kind, TokenKind::Star);
    assert_eq!(tokens[3].kind, TokenKind::Slash);
    assert_eq!(tokens[4].kind, TokenKind::Percent);
    assert_eq!(tokens[5].kind, TokenKind::Caret);
    assert_eq!(tokens[6].kind, TokenKind::Equals);
    assert_eq!(tokens[7].kind, TokenKind::NotEquals);
    assert_eq!(tokens[8].kind, TokenKind::Less);
    assert_eq!(tokens[9].kind, TokenKind::Greater);
    assert_eq!(tokens[10].kind, TokenKind::LessEquals);
    assert_eq!(tokens[11].kind, TokenKind::GreaterEquals);
    assert_eq!(tokens[12].kind, TokenKind::Assignment);
    assert_eq!(tokens[13].kind, TokenKind::Not);
    assert_eq!(tokens[14].kind, TokenKind::And);
    assert_eq!(tokens[15].kind, TokenKind::Or);
    assert_eq!(tokens[16].kind, TokenKind::PlusPlus);
    assert_eq!(tokens[17].kind, TokenKind::MinusMinus);
    assert_eq!(tokens[18].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_punctuation() {
    let source = "[ ] { } ( ) : ; ,";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::OpenBracket);
    assert_eq!(tokens[1].kind, TokenKind::CloseBracket);
    assert_eq!(tokens[2].kind, TokenKind::OpenCurly);
    assert_eq!(tokens[3].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[4].kind, TokenKind::OpenParen);
    assert_eq!(tokens[5].kind, TokenKind::CloseParen);
    assert_eq!(tokens[6].kind, TokenKind::Colon);
    assert_eq!(tokens[7].kind, TokenKind::Semicolon);
    assert_eq!(tokens[8].kind, TokenKind::Comma);
    assert_eq!(tokens[9].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_line_comments() {
    let source = "x // trailing comment\ny";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].value, "x");
    assert_eq!(tokens[1].value, "y");
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_block_comments() {
    let source = "x /* a\n   multi-line\n   comment */ y";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].value, "x");
    assert_eq!(tokens[1].value, "y");
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_unterminated_block_comment() {
    let source = "x /* never closed";
    let result = tokenize(source, Some("test.bminor".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_tokenize_unrecognised_character() {
    let source = "x: integer = @;";
    let result = tokenize(source, Some("test.bminor".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let source = "integers iffy printer";
    let tokens = tokenize(source, Some("test.bminor".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}
