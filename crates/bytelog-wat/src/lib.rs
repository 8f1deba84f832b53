//! ByteLog WAT - WebAssembly text code generation
//!
//! Lowers a parsed program to a WAT module exposing `main`, `add_fact`,
//! and `has_fact` over linear memory. Output is deterministic: identical
//! ASTs produce byte-identical modules.

mod generator;

pub use generator::*;

use std::io::Write;

use bytelog_ast::Program;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatError {
    #[error("failed to write WAT output: {0}")]
    Write(#[from] std::io::Error),
}

/// Generate a WAT module for `program` into `out`.
pub fn generate<W: Write>(program: &Program, out: &mut W) -> Result<(), WatError> {
    WatGenerator::new(out).generate(program)
}

/// Generate a WAT module for `program` as a string.
pub fn generate_string(program: &Program) -> Result<String, WatError> {
    let mut buf = Vec::new();
    generate(program, &mut buf)?;
    Ok(String::from_utf8(buf).expect("generated WAT is always UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytelog_parser::parse;

    fn wat_for(source: &str) -> String {
        let program = parse(source).expect("parse failed");
        generate_string(&program).expect("generation failed")
    }

    #[test]
    fn test_emits_module_skeleton() {
        let wat = wat_for("REL parent\nFACT parent 0 1");
        assert!(wat.starts_with("(module\n"));
        assert!(wat.trim_end().ends_with(")"));
        // One fact needs a partial page, rounded up, plus one of headroom
        assert!(wat.contains("(memory 2)"));
        assert!(wat.contains("(func $hash_fact"));
        assert!(wat.contains("(func $add_fact"));
        assert!(wat.contains("(func $has_fact"));
        assert!(wat.contains("(export \"main\" (func $main))"));
        assert!(wat.contains("(export \"memory\" (memory 0))"));
        assert!(wat.contains("(export \"add_fact\" (func $add_fact))"));
        assert!(wat.contains("(export \"has_fact\" (func $has_fact))"));
    }

    #[test]
    fn test_facts_lower_to_add_fact_calls() {
        let wat = wat_for("REL parent\nFACT parent 0 1\nFACT parent 1 2");
        assert_eq!(wat.matches("call $add_fact").count(), 2);
        assert!(wat.contains(";; parent(0, 1)"));
        assert!(wat.contains(";; parent(1, 2)"));
    }

    #[test]
    fn test_relation_ids_are_interned_consistently() {
        // "parent" interns to 0; the fact and the query must both use it
        let wat = wat_for("REL parent\nFACT parent 5 6\nQUERY parent 5 6");
        let main_uses = wat.matches("i32.const 0\n    i32.const 5\n    i32.const 6").count();
        assert_eq!(main_uses, 2, "fact load and query must share the relation id:\n{}", wat);
    }

    #[test]
    fn test_atom_arguments_lower_to_interned_ids() {
        // parent=0, alice=1, bob=2 in statement order
        let wat = wat_for("REL parent\nFACT parent alice bob");
        assert!(wat.contains(";; parent(alice, bob)"));
        assert!(wat.contains("i32.const 0\n    i32.const 1\n    i32.const 2\n    call $add_fact"));
    }

    #[test]
    fn test_concrete_query_lowers_to_has_fact() {
        let wat = wat_for("REL r\nFACT r 1 2\nQUERY r 1 2");
        assert!(wat.contains("(func $query_0 (result i32)"));
        assert!(wat.contains("call $has_fact"));
        assert!(wat.contains(";; query: r(1, 2)"));
    }

    #[test]
    fn test_wildcard_query_emits_placeholder() {
        let wat = wat_for("REL r\nFACT r 1 2\nQUERY r 1 ?");
        assert!(wat.contains(";; query: r(1, ?)"));
        assert!(!wat.contains("call $has_fact\n"), "wildcard query must not lower to has_fact");
        assert!(wat.contains("i32.const 1\n  )"));
    }

    #[test]
    fn test_rule_stubs_are_named() {
        let wat = wat_for(
            "REL r\nREL out\nRULE out: SCAN r, EMIT out $0 $1\nRULE out: SCAN r, JOIN out $1, EMIT out $0 $2",
        );
        assert!(wat.contains("(func $rule_out_0"));
        assert!(wat.contains("(func $rule_out_1"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let source = "\
REL parent
REL anc
FACT parent alice bob
FACT parent bob carol
RULE anc: SCAN parent, EMIT anc $0 $1
SOLVE
QUERY anc alice ?";
        assert_eq!(wat_for(source), wat_for(source));
    }

    #[test]
    fn test_memory_grows_with_many_facts() {
        // 2000 facts at 3 * 12 bytes each spill into a second page,
        // and the headroom page makes three
        let mut source = String::from("REL r\n");
        for i in 0..2000 {
            source.push_str(&format!("FACT r {} {}\n", i, i + 1));
        }
        let wat = wat_for(&source);
        assert!(wat.contains("(memory 3)"), "expected a third page");
    }

    #[test]
    fn test_empty_program_is_valid_module() {
        let wat = wat_for("");
        assert!(wat.contains("(module"));
        assert!(wat.contains("(func $main"));
        assert!(wat.contains("(memory 1)"));
    }
}
