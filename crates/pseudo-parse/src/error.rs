use pseudo_ast::span::Span;
use thiserror::Error;

/// Only raised under `UnknownCharPolicy::Reject`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unrecognized character {ch:?} at {span}")]
    UnknownChar { ch: char, span: Span },

    #[error("unterminated string literal starting at {span}")]
    UnterminatedString { span: Span },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("expected {expected}, found {found} at {span}")]
    Expected {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unexpected {found} at {span}, expected a statement")]
    UnexpectedToken { found: String, span: Span },

    #[error("missing `End {construct}` for `{construct}` opened at {span}")]
    Unterminated { construct: &'static str, span: Span },

    #[error("malformed array size {found} at {span}")]
    BadArraySize { found: String, span: Span },

    #[error("nesting depth exceeds {limit} at {span}")]
    NestingTooDeep { limit: usize, span: Span },
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Expected { span, .. }
            | SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::Unterminated { span, .. }
            | SyntaxError::BadArraySize { span, .. }
            | SyntaxError::NestingTooDeep { span, .. } => *span,
        }
    }
}

/// Failure of the lex-then-parse front end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

impl Error {
    pub fn span(&self) -> Span {
        match self {
            Error::Lex(LexError::UnknownChar { span, .. })
            | Error::Lex(LexError::UnterminatedString { span }) => *span,
            Error::Syntax(e) => e.span(),
        }
    }
}
