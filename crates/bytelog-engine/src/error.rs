//! Engine error types

use bytelog_ast::Span;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rule for '{target}' must begin with SCAN")]
    RuleMustStartWithScan { target: String, span: Span },

    #[error("rule for '{target}' references unbound variable ${var}")]
    UnboundVariable {
        target: String,
        var: u32,
        span: Span,
    },

    #[error("rule for '{target}' exceeds the register file ({limit} registers)")]
    TooManyVariables {
        target: String,
        limit: usize,
        span: Span,
    },
}

impl EngineError {
    pub fn span(&self) -> Span {
        match self {
            EngineError::RuleMustStartWithScan { span, .. } => *span,
            EngineError::UnboundVariable { span, .. } => *span,
            EngineError::TooManyVariables { span, .. } => *span,
        }
    }

    /// Render the single-line diagnostic form `at line L, column C: <message>`.
    pub fn describe_at(&self, source: &str) -> String {
        let (line, col) = self.span().line_col(source);
        format!("at line {}, column {}: {}", line, col, self)
    }
}
