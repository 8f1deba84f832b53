//! Execution engine: load, solve, query
//!
//! Execution runs three passes over the program. Load interns every
//! relation and atom name and inserts the ground facts. Solve compiles the
//! rules (register allocation is positional, violations surface here with
//! the rule's source position) and iterates them to the least fixed point.
//! Queries then resolve against the populated database.

use bytelog_ast::{
    BodyOpKind, FactArg, Program, QueryArg, QueryStmt, RuleStmt, Span, StatementKind,
};

use crate::{AtomTable, EngineError, FactDb};

/// Width of the per-rule register file
pub const MAX_REGISTERS: usize = 16;

pub struct Engine {
    pub atoms: AtomTable,
    pub facts: FactDb,
    warnings: Vec<String>,
    solved: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            atoms: AtomTable::new(),
            facts: FactDb::new(),
            warnings: Vec::new(),
            solved: false,
        }
    }

    /// Warnings collected while executing (undeclared emit targets)
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Run a parsed program: load facts, then solve at each SOLVE statement.
    /// Queries are not answered here; resolve them with [`Engine::query`].
    pub fn execute(&mut self, program: &Program) -> Result<(), EngineError> {
        self.load(program);

        for stmt in &program.statements {
            if matches!(stmt.kind, StatementKind::Solve) && !self.solved {
                // Later SOLVEs are no-ops: the database is already saturated
                self.solve(program)?;
            }
        }

        Ok(())
    }

    /// Load pass: intern every referenced name and insert ground facts.
    fn load(&mut self, program: &Program) {
        let declared: Vec<&str> = program
            .statements
            .iter()
            .filter_map(|s| match &s.kind {
                StatementKind::Rel(rel) => Some(rel.name.as_str()),
                _ => None,
            })
            .collect();

        for stmt in &program.statements {
            match &stmt.kind {
                StatementKind::Rel(rel) => {
                    self.atoms.intern(&rel.name);
                }
                StatementKind::Fact(fact) => {
                    let rel = self.atoms.intern(&fact.relation);
                    let a = self.resolve_fact_arg(&fact.a);
                    let b = self.resolve_fact_arg(&fact.b);
                    self.facts.add(rel, a, b);
                }
                StatementKind::Rule(rule) => {
                    self.atoms.intern(&rule.target);
                    for op in &rule.body {
                        match &op.kind {
                            BodyOpKind::Scan(s) => {
                                self.atoms.intern(&s.relation);
                            }
                            BodyOpKind::Join(j) => {
                                self.atoms.intern(&j.relation);
                            }
                        }
                    }
                    self.atoms.intern(&rule.emit.relation);
                    if !declared.contains(&rule.emit.relation.as_str()) {
                        self.warnings.push(format!(
                            "relation '{}' used as EMIT target but never declared",
                            rule.emit.relation
                        ));
                    }
                }
                StatementKind::Query(query) => {
                    self.atoms.intern(&query.relation);
                }
                StatementKind::Solve => {}
            }
        }
    }

    fn resolve_fact_arg(&mut self, arg: &FactArg) -> i32 {
        match arg {
            FactArg::Int(n) => *n,
            FactArg::Atom(name) => self.atoms.intern(name),
        }
    }

    /// Solve pass: iterate every rule until a full pass derives nothing new.
    ///
    /// The Herbrand universe is closed over the atom IDs already present
    /// and the database only grows, so the loop terminates. A second SOLVE
    /// finds the database already saturated and derives nothing.
    fn solve(&mut self, program: &Program) -> Result<(), EngineError> {
        let rules: Vec<CompiledRule> = program
            .rules()
            .map(|(rule, span)| self.compile_rule(rule, span))
            .collect::<Result<_, _>>()?;

        loop {
            let mut changed = false;
            for rule in &rules {
                let mut derived = Vec::new();
                rule.eval(&self.facts, &mut derived);
                for (rel, a, b) in derived {
                    if self.facts.add(rel, a, b) {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        self.solved = true;
        Ok(())
    }

    /// Compile a rule: resolve relation names to atom IDs and assign output
    /// registers positionally, rejecting references to unbound registers.
    fn compile_rule(&mut self, rule: &RuleStmt, span: Span) -> Result<CompiledRule, EngineError> {
        let target = self.atoms.intern(&rule.target);
        let mut ops = Vec::with_capacity(rule.body.len());
        let mut next_free: usize = 0;

        for (index, op) in rule.body.iter().enumerate() {
            match &op.kind {
                BodyOpKind::Scan(scan) => {
                    let rel = self.atoms.intern(&scan.relation);
                    match scan.match_var {
                        None => {
                            ops.push(CompiledOp::ScanAll {
                                rel,
                                out_a: next_free,
                                out_b: next_free + 1,
                            });
                            next_free += 2;
                        }
                        Some(var) => {
                            self.check_bound(rule, var, next_free, op.span)?;
                            ops.push(CompiledOp::ScanMatch {
                                rel,
                                var: var as usize,
                                out: next_free,
                            });
                            next_free += 1;
                        }
                    }
                }
                BodyOpKind::Join(join) => {
                    if index == 0 {
                        return Err(EngineError::RuleMustStartWithScan {
                            target: rule.target.clone(),
                            span,
                        });
                    }
                    let rel = self.atoms.intern(&join.relation);
                    self.check_bound(rule, join.match_var, next_free, op.span)?;
                    ops.push(CompiledOp::Join {
                        rel,
                        var: join.match_var as usize,
                        out: next_free,
                    });
                    next_free += 1;
                }
            }
            if next_free > MAX_REGISTERS {
                return Err(EngineError::TooManyVariables {
                    target: rule.target.clone(),
                    limit: MAX_REGISTERS,
                    span,
                });
            }
        }

        self.check_bound(rule, rule.emit.var_a, next_free, rule.emit.span)?;
        self.check_bound(rule, rule.emit.var_b, next_free, rule.emit.span)?;

        Ok(CompiledRule {
            target,
            ops,
            emit_a: rule.emit.var_a as usize,
            emit_b: rule.emit.var_b as usize,
            width: next_free,
        })
    }

    fn check_bound(
        &self,
        rule: &RuleStmt,
        var: u32,
        next_free: usize,
        span: Span,
    ) -> Result<(), EngineError> {
        if (var as usize) < next_free {
            Ok(())
        } else {
            Err(EngineError::UnboundVariable {
                target: rule.target.clone(),
                var,
                span,
            })
        }
    }

    /// Resolve a query against the database.
    ///
    /// Atoms in arguments are interned on entry; an atom never seen before
    /// gains an ID and matches nothing. Unknown relations yield empty
    /// results, never errors.
    pub fn query(&mut self, query: &QueryStmt) -> QueryResult {
        let rel = self.atoms.intern(&query.relation);
        let a = self.resolve_query_arg(&query.a);
        let b = self.resolve_query_arg(&query.b);

        match (a, b) {
            (Some(a), Some(b)) => QueryResult::Check(self.facts.contains(rel, a, b)),
            (Some(a), None) => QueryResult::Values(self.facts.iter_by_first(rel, a).collect()),
            (None, Some(b)) => QueryResult::Values(self.facts.iter_by_second(rel, b).collect()),
            (None, None) => QueryResult::Pairs(self.facts.iter_relation(rel).collect()),
        }
    }

    fn resolve_query_arg(&mut self, arg: &QueryArg) -> Option<i32> {
        match arg {
            QueryArg::Int(n) => Some(*n),
            QueryArg::Atom(name) => Some(self.atoms.intern(name)),
            QueryArg::Wildcard => None,
        }
    }
}

/// The materialized answer to a query, ordered by fact insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// Both arguments concrete: membership
    Check(bool),
    /// One wildcard: the projection on the free column
    Values(Vec<i32>),
    /// Both wildcards: the entire relation
    Pairs(Vec<(i32, i32)>),
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        match self {
            QueryResult::Check(found) => !found,
            QueryResult::Values(values) => values.is_empty(),
            QueryResult::Pairs(pairs) => pairs.is_empty(),
        }
    }
}

/// A rule with relations resolved and registers assigned
struct CompiledRule {
    target: i32,
    ops: Vec<CompiledOp>,
    emit_a: usize,
    emit_b: usize,
    width: usize,
}

enum CompiledOp {
    ScanAll { rel: i32, out_a: usize, out_b: usize },
    ScanMatch { rel: i32, var: usize, out: usize },
    Join { rel: i32, var: usize, out: usize },
}

impl CompiledRule {
    /// Nested-loop evaluation: each body op adds one level of nesting,
    /// and every complete binding emits one candidate tuple.
    fn eval(&self, db: &FactDb, out: &mut Vec<(i32, i32, i32)>) {
        let mut regs = vec![0i32; self.width];
        self.eval_from(0, db, &mut regs, out);
    }

    fn eval_from(&self, depth: usize, db: &FactDb, regs: &mut [i32], out: &mut Vec<(i32, i32, i32)>) {
        let Some(op) = self.ops.get(depth) else {
            out.push((self.target, regs[self.emit_a], regs[self.emit_b]));
            return;
        };

        match *op {
            CompiledOp::ScanAll { rel, out_a, out_b } => {
                for (a, b) in db.iter_relation(rel) {
                    regs[out_a] = a;
                    regs[out_b] = b;
                    self.eval_from(depth + 1, db, regs, out);
                }
            }
            CompiledOp::ScanMatch { rel, var, out: slot }
            | CompiledOp::Join { rel, var, out: slot } => {
                for b in db.iter_by_first(rel, regs[var]) {
                    regs[slot] = b;
                    self.eval_from(depth + 1, db, regs, out);
                }
            }
        }
    }
}
