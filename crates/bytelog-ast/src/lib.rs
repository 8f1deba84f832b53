//! ByteLog AST - Core types for the abstract syntax tree
//!
//! This crate defines all AST node types, spans for source locations,
//! and the canonical text printer.

mod printer;
mod span;
mod stmt;

pub use printer::*;
pub use span::*;
pub use stmt::*;

use serde::{Deserialize, Serialize};

/// A complete ByteLog program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Program {
    /// Iterate the statements of a given kind in source order
    pub fn facts(&self) -> impl Iterator<Item = &FactStmt> {
        self.statements.iter().filter_map(|s| match &s.kind {
            StatementKind::Fact(f) => Some(f),
            _ => None,
        })
    }

    pub fn rules(&self) -> impl Iterator<Item = (&RuleStmt, Span)> {
        self.statements.iter().filter_map(|s| match &s.kind {
            StatementKind::Rule(r) => Some((r, s.span)),
            _ => None,
        })
    }

    pub fn queries(&self) -> impl Iterator<Item = &QueryStmt> {
        self.statements.iter().filter_map(|s| match &s.kind {
            StatementKind::Query(q) => Some(q),
            _ => None,
        })
    }
}
