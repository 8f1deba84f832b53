//! ByteLog Lexer - Tokenization using logos
//!
//! Lexical quirks of the language:
//! - Keywords match case-insensitively; identifiers keep their case
//! - Two line-comment styles: `;` and `//`
//! - `$` must be followed by digits to form a variable

mod token;

pub use token::*;

use bytelog_ast::Span;
use logos::Logos;

/// Tokenize a source string into a vector of tokens
///
/// Errors are non-fatal here: invalid input becomes `TokenKind::Error`
/// tokens and the parser decides what to do with them.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        let kind = match result {
            Ok(kind) => kind,
            Err(_) => TokenKind::Error,
        };
        tokens.push(Token { kind, span });
    }

    // Add EOF token
    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
    });

    tokens
}

/// A token with its span
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("REL FACT RULE SCAN JOIN EMIT MATCH SOLVE QUERY"),
            vec![
                TokenKind::Rel,
                TokenKind::Fact,
                TokenKind::Rule,
                TokenKind::Scan,
                TokenKind::Join,
                TokenKind::Emit,
                TokenKind::Match,
                TokenKind::Solve,
                TokenKind::Query,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            kinds("rel Fact RULE ReL"),
            vec![
                TokenKind::Rel,
                TokenKind::Fact,
                TokenKind::Rule,
                TokenKind::Rel,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            kinds(": , ?"),
            vec![
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::Wildcard,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_variables() {
        let tokens = tokenize("$0 $1 $42 $123");
        let texts: Vec<&str> = tokens[..4].iter().map(|t| t.text("$0 $1 $42 $123")).collect();
        assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Variable));
        assert_eq!(texts, vec!["$0", "$1", "$42", "$123"]);
    }

    #[test]
    fn test_integers() {
        let source = "0 42 -17 123";
        let tokens = tokenize(source);
        assert!(tokens[..4].iter().all(|t| t.kind == TokenKind::Int));
        assert_eq!(tokens[2].text(source), "-17");
    }

    #[test]
    fn test_identifiers_preserve_case() {
        let source = "parent ancestor_of _private rel2 Alice";
        let tokens = tokenize(source);
        assert!(tokens[..5].iter().all(|t| t.kind == TokenKind::Ident));
        assert_eq!(tokens[4].text(source), "Alice");
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        // "relation" starts with "rel" but must lex as one identifier
        assert_eq!(kinds("relation"), vec![TokenKind::Ident, TokenKind::Eof]);
        assert_eq!(kinds("scanner"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn test_semicolon_comments() {
        assert_eq!(
            kinds("REL ; this is a comment\nparent"),
            vec![TokenKind::Rel, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_cpp_style_comments() {
        assert_eq!(
            kinds("REL // this is a comment\nparent"),
            vec![TokenKind::Rel, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn test_whitespace_handling() {
        assert_eq!(
            kinds("  REL\t\ttest\n\n:\r  42  "),
            vec![
                TokenKind::Rel,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Int,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_bare_dollar_is_error() {
        assert_eq!(kinds("$"), vec![TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn test_invalid_character() {
        let tokens = tokenize("REL @invalid");
        assert_eq!(tokens[0].kind, TokenKind::Rel);
        assert_eq!(tokens[1].kind, TokenKind::Error);
    }

    #[test]
    fn test_line_column_tracking() {
        let source = "REL\n  parent";
        let tokens = tokenize(source);
        assert_eq!(tokens[0].span.line_col(source), (1, 1));
        assert_eq!(tokens[1].span.line_col(source), (2, 3));
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_only_whitespace() {
        assert_eq!(kinds("   \t\n\r  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_only_comments() {
        assert_eq!(
            kinds("; just a comment\n// another comment"),
            vec![TokenKind::Eof]
        );
    }

    #[test]
    fn test_complete_program() {
        let source = "\
REL parent
REL ancestor

; Facts about family
FACT parent 0 1
FACT parent 1 2

RULE ancestor: SCAN parent, EMIT ancestor $0 $1
RULE ancestor: SCAN parent, JOIN ancestor $1, EMIT ancestor $0 $2

SOLVE
QUERY ancestor 0 ?
";
        let tokens = tokenize(source);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Error));
        assert!(tokens.len() > 30);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }
}
