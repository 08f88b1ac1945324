pub mod error;
pub mod expressions;
pub mod statements;

use crate::lexer::{Token, TokenKind, Tokenizer};
use crate::trace::{TraceEvent, TraceSink};
pub use error::{Expected, ParseError};
use statements::parse_statement;

pub struct Parser<'a> {
    iter: std::iter::Peekable<Tokenizer<'a>>,
    tracer: Option<&'a mut dyn TraceSink>,
    eof: Token,
    /// Braces opened by the statement currently being parsed. Left as is
    /// when an error unwinds so recovery knows how deep it is.
    open_braces: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokenizer: Tokenizer<'a>) -> Self {
        let iter = tokenizer.peekable();
        Self {
            iter,
            tracer: None,
            eof: Token {
                kind: TokenKind::Eof,
                line: 1,
                start: 0,
                end: 0,
            },
            open_braces: 0,
        }
    }

    pub fn with_tracer(tokenizer: Tokenizer<'a>, tracer: &'a mut dyn TraceSink) -> Self {
        Self {
            tracer: Some(tracer),
            ..Self::new(tokenizer)
        }
    }

    fn trace(&mut self, event: TraceEvent<'_>) {
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.record(event);
        }
    }

    pub(crate) fn peek(&mut self) -> &Token {
        match self.iter.peek() {
            Some(token) => token,
            None => &self.eof,
        }
    }

    pub(crate) fn peek_is(&mut self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    /// Consumes the next token. End of input is never consumed, so it keeps
    /// being returned once reached.
    pub(crate) fn next_token(&mut self) -> Token {
        match self.iter.next_if(|token| token.kind != TokenKind::Eof) {
            Some(token) => {
                self.trace(TraceEvent::TokenProduced(&token));
                token
            }
            None => self.peek().clone(),
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<std::rc::Rc<str>, ParseError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.next_token();
            return Ok(name);
        }
        Err(ParseError::unexpected_other(
            Expected::Identifier,
            self.peek(),
        ))
    }

    /// Consumes the next token if it has the given kind. A mismatching token
    /// is left in place for error recovery.
    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        if self.peek_is(&token_kind) {
            self.next_token();
            Ok(())
        } else {
            Err(ParseError::unexpected_token(token_kind, self.peek()))
        }
    }

    pub(crate) fn open_brace(&mut self) {
        self.open_braces += 1;
    }

    pub(crate) fn close_brace(&mut self) {
        self.open_braces = self.open_braces.saturating_sub(1);
    }

    /// Skips to the `;` that ends the statement in which an error occurred,
    /// stepping over the rest of any block the error was nested in.
    fn synchronize(&mut self) {
        let mut depth = std::mem::take(&mut self.open_braces);
        loop {
            let token = self.next_token();
            match token.kind {
                TokenKind::Eof => return,
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth = depth.saturating_sub(1),
                TokenKind::SemiColon if depth == 0 => return,
                _ => {}
            }
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Result<crate::ast::Program, Vec<ParseError>> {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while !self.peek_is(&TokenKind::Eof) {
            self.open_braces = 0;
            match parse_statement(self) {
                Ok(statement) => {
                    self.trace(TraceEvent::StatementParsed(&statement));
                    statements.push(statement);
                }
                Err(err) => {
                    errors.push(err);
                    self.synchronize();
                    continue;
                }
            }
            // Statements are separated by `;`, the last one may omit it.
            match self.peek().kind {
                TokenKind::SemiColon => {
                    self.next_token();
                }
                TokenKind::Eof => {}
                _ => {
                    errors.push(ParseError::unexpected_token(
                        TokenKind::SemiColon,
                        self.peek(),
                    ));
                    self.synchronize();
                }
            }
        }
        let eof = self.peek().clone();
        self.trace(TraceEvent::TokenProduced(&eof));

        tracing::debug!(
            statements = statements.len(),
            errors = errors.len(),
            "parsed program"
        );
        if errors.is_empty() {
            Ok(crate::ast::Program { statements })
        } else {
            Err(errors)
        }
    }
}
