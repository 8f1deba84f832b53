//! Parser error types

use bytelog_ast::Span;
use bytelog_lexer::TokenKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("expected a statement (REL, FACT, RULE, SOLVE, or QUERY)")]
    ExpectedStatement { span: Span },

    #[error("invalid character in input")]
    InvalidCharacter { span: Span },

    #[error("integer literal out of range")]
    IntegerOutOfRange { span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::ExpectedStatement { span } => *span,
            ParseError::InvalidCharacter { span } => *span,
            ParseError::IntegerOutOfRange { span } => *span,
        }
    }

    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.describe().to_string(),
            span,
        }
    }

    /// Render the single-line diagnostic form `at line L, column C: <message>`.
    pub fn describe_at(&self, source: &str) -> String {
        let (line, col) = self.span().line_col(source);
        format!("at line {}, column {}: {}", line, col, self)
    }
}
