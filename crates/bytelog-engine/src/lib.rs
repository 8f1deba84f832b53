//! ByteLog Engine - Bottom-up evaluation and queries
//!
//! Owns the atom table and fact database, loads ground facts from a parsed
//! program, iterates rules to the least fixed point, and resolves queries.

mod atoms;
mod db;
mod engine;
mod error;

pub use atoms::*;
pub use db::*;
pub use engine::*;
pub use error::*;
