use std::fmt::Display;

use ember_lang_core::parser::ParseError;
use thiserror::Error;

use crate::object::EvaluationError;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DiagnosticKind {
    Lex,
    Parse,
    Eval,
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiagnosticKind::Lex => "lex",
            DiagnosticKind::Parse => "parse",
            DiagnosticKind::Eval => "eval",
        };
        write!(f, "{}", name)
    }
}

/// A failure reported to the user, from any phase. Evaluation errors carry no
/// line since the tree does not keep source positions.
#[derive(Debug, PartialEq, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: Option<usize>,
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        let kind = if error.is_lexical() {
            DiagnosticKind::Lex
        } else {
            DiagnosticKind::Parse
        };
        Diagnostic {
            kind,
            line: Some(error.line()),
            message: error.to_string(),
        }
    }
}

impl From<EvaluationError> for Diagnostic {
    fn from(error: EvaluationError) -> Self {
        Diagnostic {
            kind: DiagnosticKind::Eval,
            message: error.to_string(),
            line: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, DiagnosticKind};
    use crate::object::EvaluationError;
    use ember_lang_core::lexer::LexError;
    use ember_lang_core::parser::ParseError;

    #[test]
    fn test_classification() {
        let lexical = Diagnostic::from(ParseError::Lex {
            error: LexError::UnterminatedString,
            line: 3,
        });
        assert_eq!(lexical.kind, DiagnosticKind::Lex);
        assert_eq!(lexical.line, Some(3));

        let evaluation = Diagnostic::from(EvaluationError::DivisionByZero);
        assert_eq!(evaluation.kind, DiagnosticKind::Eval);
        assert_eq!(evaluation.line, None);
        assert_eq!(evaluation.to_string(), "eval error: division by zero");
    }
}
