//! WAT module emission
//!
//! One streaming pass over the program into a caller-supplied sink. The
//! generator carries its own atom table: relation names and atom arguments
//! are interned in source order and emitted as integer constants, so a
//! relation or atom always lowers to the same ID everywhere in the module.

use std::io::Write;

use bytelog_ast::{FactArg, Program, QueryArg, StatementKind};
use bytelog_engine::AtomTable;

use crate::WatError;

/// Bytes per fact slot: three little-endian i32s
const FACT_SIZE: usize = 12;
/// Open-addressed bucket count used by `$hash_fact`
const HASH_BUCKETS: usize = 1000;
/// WebAssembly page size
const PAGE_SIZE: usize = 65536;
/// Derived facts headroom multiplier applied to the asserted fact count
const DERIVED_FACTOR: usize = 3;

pub struct WatGenerator<'w, W: Write> {
    out: &'w mut W,
    atoms: AtomTable,
    memory_pages: usize,
}

impl<'w, W: Write> WatGenerator<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self {
            out,
            atoms: AtomTable::new(),
            memory_pages: 1,
        }
    }

    /// Emit a complete module for the program.
    pub fn generate(&mut self, program: &Program) -> Result<(), WatError> {
        self.intern_names(program);
        self.calculate_memory(program);

        writeln!(self.out, "(module")?;
        self.comment("generated ByteLog WebAssembly module")?;
        writeln!(self.out, "  (memory {})", self.memory_pages)?;
        self.emit_fact_functions()?;
        self.emit_rule_functions(program)?;
        self.emit_query_functions(program)?;
        self.emit_main_function(program)?;
        self.emit_exports()?;
        writeln!(self.out, ")")?;

        Ok(())
    }

    /// Intern every relation and atom argument in statement order, so the
    /// same name lowers to the same constant in every emitted call.
    fn intern_names(&mut self, program: &Program) {
        for stmt in &program.statements {
            match &stmt.kind {
                StatementKind::Rel(rel) => {
                    self.atoms.intern(&rel.name);
                }
                StatementKind::Fact(fact) => {
                    self.atoms.intern(&fact.relation);
                    if let FactArg::Atom(name) = &fact.a {
                        self.atoms.intern(name);
                    }
                    if let FactArg::Atom(name) = &fact.b {
                        self.atoms.intern(name);
                    }
                }
                StatementKind::Rule(rule) => {
                    self.atoms.intern(&rule.target);
                    self.atoms.intern(&rule.emit.relation);
                }
                StatementKind::Query(query) => {
                    self.atoms.intern(&query.relation);
                    if let QueryArg::Atom(name) = &query.a {
                        self.atoms.intern(name);
                    }
                    if let QueryArg::Atom(name) = &query.b {
                        self.atoms.intern(name);
                    }
                }
                StatementKind::Solve => {}
            }
        }
    }

    /// Memory sizing: fact slots (with headroom for derivations) plus the
    /// byte length of every atom name asserted in a FACT, rounded up to
    /// whole pages plus one.
    fn calculate_memory(&mut self, program: &Program) {
        let mut fact_count = 0usize;
        let mut atom_bytes = 0usize;

        for fact in program.facts() {
            fact_count += 1;
            if let FactArg::Atom(name) = &fact.a {
                atom_bytes += name.len() + 1;
            }
            if let FactArg::Atom(name) = &fact.b {
                atom_bytes += name.len() + 1;
            }
        }

        let needed = fact_count * DERIVED_FACTOR * FACT_SIZE + atom_bytes;
        self.memory_pages = needed.div_ceil(PAGE_SIZE) + 1;
    }

    fn comment(&mut self, text: &str) -> Result<(), WatError> {
        writeln!(self.out, "  ;; {}", text)?;
        Ok(())
    }

    fn emit_fact_functions(&mut self) -> Result<(), WatError> {
        self.comment("fact database functions")?;

        writeln!(
            self.out,
            "  (func $hash_fact (param $rel i32) (param $a i32) (param $b i32) (result i32)
    ;; ((rel * 31 + a) * 31 + b) mod {buckets}
    local.get $rel
    i32.const 31
    i32.mul
    local.get $a
    i32.add
    i32.const 31
    i32.mul
    local.get $b
    i32.add
    i32.const {buckets}
    i32.rem_u
  )
",
            buckets = HASH_BUCKETS
        )?;

        writeln!(
            self.out,
            "  (func $add_fact (param $rel i32) (param $a i32) (param $b i32)
    (local $offset i32)
    local.get $rel
    local.get $a
    local.get $b
    call $hash_fact
    i32.const {size}
    i32.mul
    local.set $offset
    local.get $offset
    local.get $rel
    i32.store
    local.get $offset
    i32.const 4
    i32.add
    local.get $a
    i32.store
    local.get $offset
    i32.const 8
    i32.add
    local.get $b
    i32.store
  )
",
            size = FACT_SIZE
        )?;

        writeln!(
            self.out,
            "  (func $has_fact (param $rel i32) (param $a i32) (param $b i32) (result i32)
    (local $offset i32)
    local.get $rel
    local.get $a
    local.get $b
    call $hash_fact
    i32.const {size}
    i32.mul
    local.set $offset
    local.get $offset
    i32.load
    local.get $rel
    i32.eq
    local.get $offset
    i32.const 4
    i32.add
    i32.load
    local.get $a
    i32.eq
    i32.and
    local.get $offset
    i32.const 8
    i32.add
    i32.load
    local.get $b
    i32.eq
    i32.and
  )
",
            size = FACT_SIZE
        )?;

        Ok(())
    }

    fn emit_rule_functions(&mut self, program: &Program) -> Result<(), WatError> {
        self.comment("rule functions (fixpoint is computed by the host engine)")?;

        for (id, (rule, _)) in program.rules().enumerate() {
            writeln!(
                self.out,
                "  (func $rule_{}_{}\n    ;; body not lowered ({} ops)\n  )\n",
                rule.target,
                id,
                rule.body.len()
            )?;
        }

        Ok(())
    }

    fn emit_query_functions(&mut self, program: &Program) -> Result<(), WatError> {
        self.comment("query functions")?;

        for (id, query) in program.queries().enumerate() {
            writeln!(self.out, "  (func $query_{} (result i32)", id)?;
            writeln!(
                self.out,
                "    ;; query: {}({}, {})",
                query.relation,
                query_arg_text(&query.a),
                query_arg_text(&query.b)
            )?;

            match (self.query_arg_value(&query.a), self.query_arg_value(&query.b)) {
                (Some(a), Some(b)) => {
                    let rel = self.atoms.intern(&query.relation);
                    writeln!(self.out, "    i32.const {}", rel)?;
                    writeln!(self.out, "    i32.const {}", a)?;
                    writeln!(self.out, "    i32.const {}", b)?;
                    writeln!(self.out, "    call $has_fact")?;
                }
                _ => {
                    // Wildcard queries are not lowered; report "has results"
                    writeln!(self.out, "    i32.const 1")?;
                }
            }

            writeln!(self.out, "  )\n")?;
        }

        Ok(())
    }

    fn emit_main_function(&mut self, program: &Program) -> Result<(), WatError> {
        self.comment("main: load asserted facts")?;
        writeln!(self.out, "  (func $main")?;

        for fact in program.facts() {
            let rel = self.atoms.intern(&fact.relation);
            let a = self.fact_arg_value(&fact.a);
            let b = self.fact_arg_value(&fact.b);

            writeln!(
                self.out,
                "    ;; {}({}, {})",
                fact.relation,
                fact_arg_text(&fact.a),
                fact_arg_text(&fact.b)
            )?;
            writeln!(self.out, "    i32.const {}", rel)?;
            writeln!(self.out, "    i32.const {}", a)?;
            writeln!(self.out, "    i32.const {}", b)?;
            writeln!(self.out, "    call $add_fact\n")?;
        }

        writeln!(self.out, "  )\n")?;
        Ok(())
    }

    fn emit_exports(&mut self) -> Result<(), WatError> {
        self.comment("exports for the host interface")?;
        writeln!(self.out, "  (export \"main\" (func $main))")?;
        writeln!(self.out, "  (export \"memory\" (memory 0))")?;
        writeln!(self.out, "  (export \"add_fact\" (func $add_fact))")?;
        writeln!(self.out, "  (export \"has_fact\" (func $has_fact))")?;
        Ok(())
    }

    fn fact_arg_value(&mut self, arg: &FactArg) -> i32 {
        match arg {
            FactArg::Int(n) => *n,
            FactArg::Atom(name) => self.atoms.intern(name),
        }
    }

    fn query_arg_value(&mut self, arg: &QueryArg) -> Option<i32> {
        match arg {
            QueryArg::Int(n) => Some(*n),
            QueryArg::Atom(name) => Some(self.atoms.intern(name)),
            QueryArg::Wildcard => None,
        }
    }
}

fn fact_arg_text(arg: &FactArg) -> String {
    match arg {
        FactArg::Int(n) => n.to_string(),
        FactArg::Atom(name) => name.clone(),
    }
}

fn query_arg_text(arg: &QueryArg) -> String {
    match arg {
        QueryArg::Int(n) => n.to_string(),
        QueryArg::Atom(name) => name.clone(),
        QueryArg::Wildcard => "?".to_string(),
    }
}
