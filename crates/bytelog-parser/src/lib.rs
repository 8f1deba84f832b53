//! ByteLog Parser - Recursive descent parser
//!
//! Parses ByteLog source code into an AST. The grammar is line-oriented
//! but whitespace-insensitive: statements are delimited by their leading
//! keyword, not by newlines. Parsing fails fast on the first error.

mod error;
mod parser;

pub use error::*;
pub use parser::*;

use bytelog_ast::Program;
use bytelog_lexer::tokenize;

/// Parse a source string into a Program AST
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source);
    let mut parser = Parser::new(source, tokens);
    parser.parse_program()
}
