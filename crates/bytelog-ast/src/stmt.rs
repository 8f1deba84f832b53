//! Statement nodes for ByteLog programs

use serde::{Deserialize, Serialize};

use crate::Span;

/// A top-level statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    Rel(RelDecl),
    Fact(FactStmt),
    Rule(RuleStmt),
    Solve,
    Query(QueryStmt),
}

/// `REL name` — declares a binary relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelDecl {
    pub name: String,
}

/// `FACT relation a b` — asserts a ground tuple
///
/// Arguments are either integer literals or atoms. Atoms are interned to
/// integer IDs at execution time, so both argument forms land in the same
/// `i32` value space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactStmt {
    pub relation: String,
    pub a: FactArg,
    pub b: FactArg,
}

/// A fact argument: raw integer or symbolic atom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactArg {
    Int(i32),
    Atom(String),
}

/// `RULE target: <body ops>, EMIT target $i $j`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleStmt {
    pub target: String,
    pub body: Vec<BodyOp>,
    pub emit: Emit,
}

/// One scan or join step in a rule body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyOp {
    pub kind: BodyOpKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyOpKind {
    Scan(Scan),
    Join(Join),
}

/// `SCAN relation [MATCH $m]` — iterate a relation, binding one or two
/// registers. With MATCH, the first column is constrained to the current
/// value of `$m` and only the second column binds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub relation: String,
    pub match_var: Option<u32>,
}

/// `JOIN relation $m` — look up facts whose first column equals `$m`,
/// binding the second column into the next free register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub relation: String,
    pub match_var: u32,
}

/// `EMIT relation $i $j` — produce a derived tuple from two bound registers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emit {
    pub relation: String,
    pub var_a: u32,
    pub var_b: u32,
    pub span: Span,
}

/// `QUERY relation qa qb` — probe the database after solving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStmt {
    pub relation: String,
    pub a: QueryArg,
    pub b: QueryArg,
}

/// A query argument: concrete integer, concrete atom, or `?` wildcard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryArg {
    Int(i32),
    Atom(String),
    Wildcard,
}

impl QueryArg {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, QueryArg::Wildcard)
    }
}
