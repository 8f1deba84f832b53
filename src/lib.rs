//! ByteLog - A bottom-up Datalog-style deductive system
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use bytelog_ast as ast;
pub use bytelog_engine as engine;
pub use bytelog_lexer as lexer;
pub use bytelog_parser as parser;
pub use bytelog_wat as wat;
