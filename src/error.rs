// ABOUTME: Error taxonomy for the lex/parse/eval phases of the pipeline

use crate::token::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unterminated string")]
    UnterminatedString { span: Span },

    #[error("expected only one . for a number")]
    MultipleDecimalPoints { span: Span },

    #[error("expected digits after '.' for a number")]
    TrailingDecimalPoint { span: Span },

    #[error("expected '&' after '&'")]
    LoneAmpersand { span: Span },

    #[error("expected '|' after '|'")]
    LonePipe { span: Span },

    #[error("identifier exceeds the 51-character limit")]
    IdentifierTooLong { span: Span },

    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::MultipleDecimalPoints { span }
            | LexError::TrailingDecimalPoint { span }
            | LexError::LoneAmpersand { span }
            | LexError::LonePipe { span }
            | LexError::IdentifierTooLong { span }
            | LexError::UnexpectedChar { span, .. } => *span,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("invalid assignment target")]
    InvalidAssignmentTarget { span: Span },

    #[error("more than 255 {kind} are not supported")]
    TooMany { kind: &'static str, span: Span },

    #[error("'{keyword}' is a reserved keyword and is not supported")]
    ReservedKeyword { keyword: &'static str, span: Span },

    #[error("{0}")]
    Lex(#[from] LexError),
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::InvalidAssignmentTarget { span } => *span,
            ParseError::TooMany { span, .. } => *span,
            ParseError::ReservedKeyword { span, .. } => *span,
            ParseError::Lex(e) => e.span(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    #[error("'{name}' is already declared in this scope")]
    AlreadyDeclared { name: String, span: Span },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: String,
        span: Span,
    },

    #[error("wrong number of arguments: expected {expected}, got {actual}")]
    ArityMismatch {
        expected: usize,
        actual: usize,
        span: Span,
    },

    #[error("value is not callable")]
    NotCallable { span: Span },

    #[error("division by zero")]
    DivisionByZero { span: Span },

    #[error("return outside of a function")]
    TopLevelReturn { span: Span },

    #[error("'{name}' must be non-negative")]
    NegativeArgument { name: &'static str, span: Span },
}

impl RuntimeError {
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::UndefinedVariable { span, .. }
            | RuntimeError::AlreadyDeclared { span, .. }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::ArityMismatch { span, .. }
            | RuntimeError::NotCallable { span }
            | RuntimeError::DivisionByZero { span }
            | RuntimeError::TopLevelReturn { span }
            | RuntimeError::NegativeArgument { span, .. } => *span,
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum InterpreterError {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

impl InterpreterError {
    pub fn span(&self) -> Span {
        match self {
            InterpreterError::Lex(e) => e.span(),
            InterpreterError::Parse(e) => e.span(),
            InterpreterError::Runtime(e) => e.span(),
        }
    }
}

impl std::fmt::Display for InterpreterErrorDiagnostic<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.span(), self.0)
    }
}

/// Wraps an `InterpreterError` to render `line:col: message` for the CLI,
/// instead of `InterpreterError`'s own bare-message `Display`.
pub struct InterpreterErrorDiagnostic<'a>(pub &'a InterpreterError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_displays_bare_message() {
        let span = Span::new(1, 1, 1, 2);
        let err = LexError::UnterminatedString { span };
        assert_eq!(err.to_string(), "unterminated string");
        assert_eq!(err.span(), span);
    }

    #[test]
    fn interpreter_error_diagnostic_includes_position() {
        let span = Span::new(3, 4, 3, 5);
        let err = InterpreterError::Runtime(RuntimeError::DivisionByZero { span });
        let diagnostic = InterpreterErrorDiagnostic(&err).to_string();
        assert_eq!(diagnostic, "3:4: division by zero");
    }

    #[test]
    fn parse_error_wraps_lex_error() {
        let span = Span::new(2, 1, 2, 1);
        let lex_err = LexError::IdentifierTooLong { span };
        let parse_err: ParseError = lex_err.clone().into();
        assert_eq!(parse_err.span(), span);
        assert_eq!(parse_err.to_string(), lex_err.to_string());
    }
}
