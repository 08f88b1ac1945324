use std::fmt::Display;
use std::rc::Rc;

use thiserror::Error;

use crate::lexer::{LexError, Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("line {line}: {error}")]
    Lex { error: LexError, line: usize },
    #[error("line {line}: expected {expected}, got '{got}'")]
    UnexpectedToken {
        expected: Expected,
        got: TokenKind,
        line: usize,
    },
    #[error("line {line}: expected {expected}, got end of input")]
    PrematureEndOfInput { expected: Expected, line: usize },
    #[error("line {line}: no prefix parse function for '{token}'")]
    NoPrefixFunction { token: TokenKind, line: usize },
    #[error("line {line}: integer literal {literal} does not fit in 64 bits")]
    InvalidInteger { literal: Rc<str>, line: usize },
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
}

impl Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "'{}'", kind),
            Expected::Identifier => write!(f, "identifier"),
            Expected::Expression => write!(f, "expression"),
        }
    }
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, got: &Token) -> ParseError {
        Self::unexpected_other(Expected::Token(expected), got)
    }

    /// Classifies a token that did not fit the grammar: illegal tokens become
    /// lexical errors, end of input becomes [`ParseError::PrematureEndOfInput`].
    pub fn unexpected_other(expected: Expected, got: &Token) -> ParseError {
        match &got.kind {
            TokenKind::Illegal(error) => ParseError::Lex {
                error: error.clone(),
                line: got.line,
            },
            TokenKind::Eof => ParseError::PrematureEndOfInput {
                expected,
                line: got.line,
            },
            kind => ParseError::UnexpectedToken {
                expected,
                got: kind.clone(),
                line: got.line,
            },
        }
    }

    pub fn no_prefix_function(token: &Token) -> ParseError {
        match &token.kind {
            TokenKind::Illegal(_) | TokenKind::Eof => {
                Self::unexpected_other(Expected::Expression, token)
            }
            kind => ParseError::NoPrefixFunction {
                token: kind.clone(),
                line: token.line,
            },
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::PrematureEndOfInput { line, .. }
            | ParseError::NoPrefixFunction { line, .. }
            | ParseError::InvalidInteger { line, .. } => *line,
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, ParseError::Lex { .. })
    }
}
