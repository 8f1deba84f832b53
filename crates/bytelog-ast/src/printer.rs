//! Canonical text printer for the ByteLog AST
//!
//! Serializes AST nodes back to `.bl` source text, one statement per line.
//! Parsing the printed form reproduces the original AST.

use crate::{
    BodyOp, BodyOpKind, Emit, FactArg, FactStmt, Join, Program, QueryArg, QueryStmt, RelDecl,
    RuleStmt, Scan, Statement, StatementKind,
};

/// Trait for converting AST nodes to canonical ByteLog text.
pub trait ToBl {
    fn to_bl(&self) -> String;
}

impl ToBl for Program {
    fn to_bl(&self) -> String {
        let mut out = String::new();
        for stmt in &self.statements {
            out.push_str(&stmt.to_bl());
            out.push('\n');
        }
        out
    }
}

impl ToBl for Statement {
    fn to_bl(&self) -> String {
        match &self.kind {
            StatementKind::Rel(r) => r.to_bl(),
            StatementKind::Fact(f) => f.to_bl(),
            StatementKind::Rule(r) => r.to_bl(),
            StatementKind::Solve => "SOLVE".to_string(),
            StatementKind::Query(q) => q.to_bl(),
        }
    }
}

impl ToBl for RelDecl {
    fn to_bl(&self) -> String {
        format!("REL {}", self.name)
    }
}

impl ToBl for FactStmt {
    fn to_bl(&self) -> String {
        format!("FACT {} {} {}", self.relation, self.a.to_bl(), self.b.to_bl())
    }
}

impl ToBl for FactArg {
    fn to_bl(&self) -> String {
        match self {
            FactArg::Int(n) => n.to_string(),
            FactArg::Atom(name) => name.clone(),
        }
    }
}

impl ToBl for RuleStmt {
    fn to_bl(&self) -> String {
        let mut parts: Vec<String> = self.body.iter().map(|op| op.to_bl()).collect();
        parts.push(self.emit.to_bl());
        format!("RULE {}: {}", self.target, parts.join(", "))
    }
}

impl ToBl for BodyOp {
    fn to_bl(&self) -> String {
        match &self.kind {
            BodyOpKind::Scan(s) => s.to_bl(),
            BodyOpKind::Join(j) => j.to_bl(),
        }
    }
}

impl ToBl for Scan {
    fn to_bl(&self) -> String {
        match self.match_var {
            Some(var) => format!("SCAN {} MATCH ${}", self.relation, var),
            None => format!("SCAN {}", self.relation),
        }
    }
}

impl ToBl for Join {
    fn to_bl(&self) -> String {
        format!("JOIN {} ${}", self.relation, self.match_var)
    }
}

impl ToBl for Emit {
    fn to_bl(&self) -> String {
        format!("EMIT {} ${} ${}", self.relation, self.var_a, self.var_b)
    }
}

impl ToBl for QueryStmt {
    fn to_bl(&self) -> String {
        format!("QUERY {} {} {}", self.relation, self.a.to_bl(), self.b.to_bl())
    }
}

impl ToBl for QueryArg {
    fn to_bl(&self) -> String {
        match self {
            QueryArg::Int(n) => n.to_string(),
            QueryArg::Atom(name) => name.clone(),
            QueryArg::Wildcard => "?".to_string(),
        }
    }
}

/// Convert a program to canonical ByteLog text.
pub fn to_bl(program: &Program) -> String {
    program.to_bl()
}
