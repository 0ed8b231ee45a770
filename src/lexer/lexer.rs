use std::rc::Rc;

use regex::Regex;

use crate::errors::errors::{SyntaxError, SyntaxErrorKind};
use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

#[derive(Clone)]
pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

pub struct Lexer {
    patterns: Vec<RegexPattern>,
    tokens: Vec<Token>,
    source: String,
    pub(crate) pos: usize,
    pub(crate) file: Rc<String>,
    error: Option<SyntaxError>,
}

impl Lexer {
    pub fn new(source: &str, file: Option<String>) -> Lexer {
        let file_name = match file {
            Some(file) => Rc::new(file),
            None => Rc::new(String::from("<input>")),
        };

        // Order matters: longer operators and comment forms must be tried
        // before their one-character prefixes.
        Lexer {
            pos: 0,
            tokens: vec![],
            patterns: vec![
                RegexPattern { regex: Regex::new(r"\s+").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new(r"//[^\n]*").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new(r"(?s)/\*.*?\*/").unwrap(), handler: skip_handler },
                RegexPattern { regex: Regex::new(r"/\*").unwrap(), handler: unterminated_comment_handler },
                RegexPattern { regex: Regex::new("[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: word_handler },
                RegexPattern { regex: Regex::new("[0-9]+").unwrap(), handler: number_handler },
                RegexPattern { regex: Regex::new(r#""(\\.|[^"\\])*""#).unwrap(), handler: string_handler },
                RegexPattern { regex: Regex::new(r"'(\\.|[^'\\])'").unwrap(), handler: char_handler },
                RegexPattern { regex: Regex::new(r"\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
                RegexPattern { regex: Regex::new(r"\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
                RegexPattern { regex: Regex::new(r"\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
                RegexPattern { regex: Regex::new(r"\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
                RegexPattern { regex: Regex::new(r"\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
                RegexPattern { regex: Regex::new(r"\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
                RegexPattern { regex: Regex::new("==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
                RegexPattern { regex: Regex::new("!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
                RegexPattern { regex: Regex::new("!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
                RegexPattern { regex: Regex::new("=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
                RegexPattern { regex: Regex::new("<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
                RegexPattern { regex: Regex::new("<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
                RegexPattern { regex: Regex::new(">=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
                RegexPattern { regex: Regex::new(">").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
                RegexPattern { regex: Regex::new(r"\|\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
                RegexPattern { regex: Regex::new("&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
                RegexPattern { regex: Regex::new(";").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
                RegexPattern { regex: Regex::new(":").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
                RegexPattern { regex: Regex::new(",").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
                RegexPattern { regex: Regex::new(r"\+\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusPlus, "++") },
                RegexPattern { regex: Regex::new("--").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusMinus, "--") },
                RegexPattern { regex: Regex::new(r"\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
                RegexPattern { regex: Regex::new("-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
                RegexPattern { regex: Regex::new("/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
                RegexPattern { regex: Regex::new(r"\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
                RegexPattern { regex: Regex::new("%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
                RegexPattern { regex: Regex::new(r"\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Caret, "^") },
            ],
            source: source.to_string(),
            file: file_name,
            error: None,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.source[self.pos..].chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    fn span_from(&self, start: usize) -> Span {
        Span {
            start: Position(start as u32, Rc::clone(&self.file)),
            end: self.position(),
        }
    }

    fn fail(&mut self, kind: SyntaxErrorKind) {
        self.error = Some(SyntaxError::new(kind, self.position()));
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().end();
    lexer.advance_n(matched);
}

fn unterminated_comment_handler(lexer: &mut Lexer, _regex: &Regex) {
    lexer.fail(SyntaxErrorKind::UnterminatedComment);
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.pos;

    // Range-check now so the parser can turn the lexeme into an i64 without
    // a second failure path.
    if matched.parse::<i64>().is_err() {
        lexer.fail(SyntaxErrorKind::NumberParseError { token: matched });
        return;
    }

    lexer.advance_n(matched.len());
    let span = lexer.span_from(start);
    lexer.push(MK_TOKEN!(TokenKind::Number, matched, span));
}

fn word_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap().as_str().to_string();
    let start = lexer.pos;
    lexer.advance_n(matched.len());
    let span = lexer.span_from(start);

    match RESERVED_LOOKUP.get(matched.as_str()) {
        Some(kind) => lexer.push(MK_TOKEN!(*kind, matched, span)),
        None => lexer.push(MK_TOKEN!(TokenKind::Identifier, matched, span)),
    }
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap();
    let raw = &matched.as_str()[1..matched.as_str().len() - 1];
    let value = unescape(raw);
    let start = lexer.pos;

    lexer.advance_n(matched.end());
    let span = lexer.span_from(start);
    lexer.push(MK_TOKEN!(TokenKind::StringLiteral, value, span));
}

fn char_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = regex.find(lexer.remainder()).unwrap();
    let raw = &matched.as_str()[1..matched.as_str().len() - 1];
    let value = unescape(raw);
    let start = lexer.pos;

    lexer.advance_n(matched.end());
    let span = lexer.span_from(start);
    lexer.push(MK_TOKEN!(TokenKind::CharLiteral, value, span));
}

/// Translate the escape sequences B-minor shares with C.
fn unescape(raw: &str) -> String {
    let mut result = String::new();
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('\'') => result.push('\''),
            Some('"') => result.push('"'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}

pub fn tokenize(source: &str, file: Option<String>) -> Result<Vec<Token>, SyntaxError> {
    let mut lex = Lexer::new(source, file);
    let patterns = lex.patterns.clone();

    while !lex.at_eof() {
        let mut matched = false;

        for pattern in patterns.iter() {
            let match_here = pattern.regex.find(lex.remainder());

            if let Some(found) = match_here {
                if found.start() == 0 {
                    (pattern.handler)(&mut lex, &pattern.regex);
                    matched = true;
                    break;
                }
            }
        }

        if let Some(error) = lex.error.take() {
            return Err(error);
        }

        if !matched {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnrecognisedToken {
                    token: lex.at().to_string(),
                },
                Position(lex.pos as u32, Rc::clone(&lex.file)),
            ));
        }
    }

    let eof_span = lex.span_from(lex.pos);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), eof_span));
    Ok(lex.tokens)
}
