//! Token definitions for ByteLog

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]  // Skip whitespace
#[logos(skip r";[^\n]*")]       // Skip Lisp-style line comments
#[logos(skip r"//[^\n]*")]      // Skip C++-style line comments
pub enum TokenKind {
    // === Keywords (case-insensitive) ===
    #[token("REL", ignore(ascii_case))]
    Rel,
    #[token("FACT", ignore(ascii_case))]
    Fact,
    #[token("RULE", ignore(ascii_case))]
    Rule,
    #[token("SCAN", ignore(ascii_case))]
    Scan,
    #[token("JOIN", ignore(ascii_case))]
    Join,
    #[token("EMIT", ignore(ascii_case))]
    Emit,
    #[token("MATCH", ignore(ascii_case))]
    Match,
    #[token("SOLVE", ignore(ascii_case))]
    Solve,
    #[token("QUERY", ignore(ascii_case))]
    Query,

    // === Punctuation ===
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("?")]
    Wildcard,

    // === Literals ===
    /// `$` followed by a register index, e.g. `$0`, `$42`
    #[regex(r"\$[0-9]+")]
    Variable,

    #[regex(r"-?[0-9]+")]
    Int,

    // === Identifiers (case-preserving) ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // === Special ===
    Error,
    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Rel
                | TokenKind::Fact
                | TokenKind::Rule
                | TokenKind::Scan
                | TokenKind::Join
                | TokenKind::Emit
                | TokenKind::Match
                | TokenKind::Solve
                | TokenKind::Query
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Rel => "'REL'",
            TokenKind::Fact => "'FACT'",
            TokenKind::Rule => "'RULE'",
            TokenKind::Scan => "'SCAN'",
            TokenKind::Join => "'JOIN'",
            TokenKind::Emit => "'EMIT'",
            TokenKind::Match => "'MATCH'",
            TokenKind::Solve => "'SOLVE'",
            TokenKind::Query => "'QUERY'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::Wildcard => "'?'",
            TokenKind::Variable => "variable",
            TokenKind::Int => "integer",
            TokenKind::Ident => "identifier",
            TokenKind::Error => "invalid character",
            TokenKind::Eof => "end of file",
        }
    }
}
