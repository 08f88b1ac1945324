use std::fmt::Display;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Illegal(LexError),
    Ident(Rc<str>),
    Int(Rc<str>),
    String(Rc<str>),

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,

    Comma,
    Colon,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,

    Eof,
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("illegal character '{0}'")]
    IllegalCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based line of the first character of the token.
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "fn" => Some(TokenKind::Function),
        "let" => Some(TokenKind::Let),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            line: 1,
            finished: false,
        }
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn skip_whitespace(&mut self) {
        while let Some((_, ch)) = self.iter.next_if(|(_, ch)| ch.is_whitespace()) {
            if ch == '\n' {
                self.line += 1;
            }
        }
    }

    fn token(&mut self, kind: TokenKind, start: usize, line: usize) -> Token {
        Token {
            kind,
            line,
            start,
            end: self.next_idx(),
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_letter(*ch) || ch.is_ascii_digit())
            .is_some()
        {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        let kind = keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into()));
        self.token(kind, start, self.line)
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        let end = self.next_idx();
        let literal = &self.input[start..end];
        self.token(TokenKind::Int(literal.into()), start, self.line)
    }

    fn read_string(&mut self, start: usize) -> Token {
        let line = self.line;
        loop {
            match self.iter.next() {
                Some((_, '"')) => break,
                Some((_, '\n')) => self.line += 1,
                Some(_) => {}
                None => {
                    return self.token(
                        TokenKind::Illegal(LexError::UnterminatedString),
                        start,
                        line,
                    )
                }
            }
        }

        let end = self.next_idx();
        // Content between the quotes, no escape processing.
        let string = &self.input[start + 1..end - 1];
        self.token(TokenKind::String(string.into()), start, line)
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        self.skip_whitespace();
        let line = self.line;

        let Some((idx, ch)) = self.iter.next() else {
            self.finished = true;
            let end = self.input.len();
            return Some(Token {
                kind: TokenKind::Eof,
                line,
                start: end,
                end,
            });
        };

        let kind = match ch {
            '=' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    TokenKind::Equal
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    TokenKind::NotEqual
                } else {
                    TokenKind::Bang
                }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '<' => TokenKind::LessThan,
            '>' => TokenKind::GreaterThan,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::SemiColon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '"' => return Some(self.read_string(idx)),
            c if Tokenizer::is_letter(c) => return Some(self.read_identifier(idx)),
            c if c.is_ascii_digit() => return Some(self.read_number(idx)),
            c => TokenKind::Illegal(LexError::IllegalCharacter(c)),
        };
        Some(self.token(kind, idx, line))
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TokenKind::*;
        let text = match self {
            Illegal(LexError::IllegalCharacter(ch)) => return write!(f, "{}", ch),
            Illegal(LexError::UnterminatedString) => "\"",
            Ident(name) => &**name,
            Int(literal) => &**literal,
            String(value) => return write!(f, "\"{}\"", value),
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            LessThan => "<",
            Comma => ",",
            Colon => ":",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Function => "fn",
            Let => "let",
            True => "true",
            False => "false",
            If => "if",
            Else => "else",
            Return => "return",
            Eof => "end of input",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|token| token.kind).collect()
    }

    #[test]
    fn test_punctuation() {
        let input = "=+(){},;";
        let output = Tokenizer::new(input).collect::<Vec<_>>();

        assert_eq!(
            output,
            vec![
                Token {
                    kind: TokenKind::Assign,
                    line: 1,
                    start: 0,
                    end: 1
                },
                Token {
                    kind: TokenKind::Plus,
                    line: 1,
                    start: 1,
                    end: 2
                },
                Token {
                    kind: TokenKind::LParen,
                    line: 1,
                    start: 2,
                    end: 3
                },
                Token {
                    kind: TokenKind::RParen,
                    line: 1,
                    start: 3,
                    end: 4
                },
                Token {
                    kind: TokenKind::LBrace,
                    line: 1,
                    start: 4,
                    end: 5
                },
                Token {
                    kind: TokenKind::RBrace,
                    line: 1,
                    start: 5,
                    end: 6
                },
                Token {
                    kind: TokenKind::Comma,
                    line: 1,
                    start: 6,
                    end: 7
                },
                Token {
                    kind: TokenKind::SemiColon,
                    line: 1,
                    start: 7,
                    end: 8
                },
                Token {
                    kind: TokenKind::Eof,
                    line: 1,
                    start: 8,
                    end: 8
                },
            ]
        );
    }

    #[test]
    fn test_program() {
        let input = "let five = 5;
    let ten = 10;
    let add = fn(x, y) {
    x + y;
    };
    let result = add(five, ten);
    ";
        let expected_output = vec![
            TokenKind::Let,
            TokenKind::Ident("five".into()),
            TokenKind::Assign,
            TokenKind::Int("5".into()),
            TokenKind::SemiColon,
            TokenKind::Let,
            TokenKind::Ident("ten".into()),
            TokenKind::Assign,
            TokenKind::Int("10".into()),
            TokenKind::SemiColon,
            TokenKind::Let,
            TokenKind::Ident("add".into()),
            TokenKind::Assign,
            TokenKind::Function,
            TokenKind::LParen,
            TokenKind::Ident("x".into()),
            TokenKind::Comma,
            TokenKind::Ident("y".into()),
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Ident("x".into()),
            TokenKind::Plus,
            TokenKind::Ident("y".into()),
            TokenKind::SemiColon,
            TokenKind::RBrace,
            TokenKind::SemiColon,
            TokenKind::Let,
            TokenKind::Ident("result".into()),
            TokenKind::Assign,
            TokenKind::Ident("add".into()),
            TokenKind::LParen,
            TokenKind::Ident("five".into()),
            TokenKind::Comma,
            TokenKind::Ident("ten".into()),
            TokenKind::RParen,
            TokenKind::SemiColon,
            TokenKind::Eof,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_operators() {
        let input = "
    !-/*5;
    5 < 10 > 5;
    10 == 10;
    10 != 9;
    ";

        let expected_output = vec![
            TokenKind::Bang,
            TokenKind::Minus,
            TokenKind::Slash,
            TokenKind::Asterisk,
            TokenKind::Int("5".into()),
            TokenKind::SemiColon,
            TokenKind::Int("5".into()),
            TokenKind::LessThan,
            TokenKind::Int("10".into()),
            TokenKind::GreaterThan,
            TokenKind::Int("5".into()),
            TokenKind::SemiColon,
            TokenKind::Int("10".into()),
            TokenKind::Equal,
            TokenKind::Int("10".into()),
            TokenKind::SemiColon,
            TokenKind::Int("10".into()),
            TokenKind::NotEqual,
            TokenKind::Int("9".into()),
            TokenKind::SemiColon,
            TokenKind::Eof,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let input = "if (5 < 10) { return true; } else { return false; } _tmp1 fnx";

        let expected_output = vec![
            TokenKind::If,
            TokenKind::LParen,
            TokenKind::Int("5".into()),
            TokenKind::LessThan,
            TokenKind::Int("10".into()),
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::SemiColon,
            TokenKind::RBrace,
            TokenKind::Else,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::False,
            TokenKind::SemiColon,
            TokenKind::RBrace,
            TokenKind::Ident("_tmp1".into()),
            TokenKind::Ident("fnx".into()),
            TokenKind::Eof,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_strings_and_brackets() {
        let input = r#""foo bar" "" [1, 2] {1: "a"}"#;
        let expected_output = vec![
            TokenKind::String("foo bar".into()),
            TokenKind::String("".into()),
            TokenKind::LBracket,
            TokenKind::Int("1".into()),
            TokenKind::Comma,
            TokenKind::Int("2".into()),
            TokenKind::RBracket,
            TokenKind::LBrace,
            TokenKind::Int("1".into()),
            TokenKind::Colon,
            TokenKind::String("a".into()),
            TokenKind::RBrace,
            TokenKind::Eof,
        ];

        assert_eq!(kinds(input), expected_output)
    }

    #[test]
    fn test_no_escape_processing() {
        assert_eq!(
            kinds(r#""a\n""#),
            vec![TokenKind::String(r"a\n".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_illegal_tokens() {
        assert_eq!(
            kinds("1 @ 2"),
            vec![
                TokenKind::Int("1".into()),
                TokenKind::Illegal(LexError::IllegalCharacter('@')),
                TokenKind::Int("2".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("\"never closed"),
            vec![
                TokenKind::Illegal(LexError::UnterminatedString),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_line_numbers() {
        let lines = Tokenizer::new("let a = 1;\n\nlet b =\n  \"x\ny\" ;")
            .map(|token| (token.kind, token.line))
            .collect::<Vec<_>>();

        assert_eq!(lines[0], (TokenKind::Let, 1));
        assert_eq!(lines[5], (TokenKind::Let, 3));
        assert_eq!(lines[8], (TokenKind::String("x\ny".into()), 4));
        assert_eq!(lines[9], (TokenKind::SemiColon, 5));
        assert_eq!(lines[10], (TokenKind::Eof, 5));
    }

    #[test]
    fn test_eof_is_produced_once() {
        let mut tokenizer = Tokenizer::new("   ");
        assert_eq!(tokenizer.next().map(|t| t.kind), Some(TokenKind::Eof));
        assert_eq!(tokenizer.next(), None);
    }
}
