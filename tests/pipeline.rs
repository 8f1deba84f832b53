//! End-to-end integration tests for the ByteLog pipeline
//!
//! Each scenario drives the full chain: source text -> parse -> execute ->
//! query, asserting the exact materialized results in insertion order.

use bytelog::engine::{Engine, QueryResult};
use bytelog::parser::parse;

/// Parse and execute, returning the engine and all query statements
fn run(source: &str) -> (Engine, Vec<bytelog::ast::QueryStmt>) {
    let program = parse(source).expect("parse failed");
    let mut engine = Engine::new();
    engine.execute(&program).expect("execution failed");
    let queries = program.queries().cloned().collect();
    (engine, queries)
}

#[test]
fn scenario_facts_only() {
    let (mut engine, queries) = run("REL parent\nFACT parent alice bob\nQUERY parent alice bob");
    assert_eq!(engine.query(&queries[0]), QueryResult::Check(true));
}

#[test]
fn scenario_transitive_closure() {
    let source = "\
REL parent
REL anc
FACT parent 0 1
FACT parent 1 2
FACT parent 2 3
RULE anc: SCAN parent, EMIT anc $0 $1
RULE anc: SCAN parent, JOIN anc $1, EMIT anc $0 $2
SOLVE
QUERY anc 0 ?";
    let (mut engine, queries) = run(source);
    assert_eq!(engine.query(&queries[0]), QueryResult::Values(vec![1, 2, 3]));
}

#[test]
fn scenario_mixed_atoms_and_integers() {
    let (mut engine, queries) = run("REL likes\nFACT likes alice 42\nQUERY likes alice ?");
    assert_eq!(engine.query(&queries[0]), QueryResult::Values(vec![42]));
}

#[test]
fn scenario_wildcard_both() {
    let (mut engine, queries) =
        run("REL edge\nFACT edge 0 1\nFACT edge 1 2\nQUERY edge ? ?");
    assert_eq!(
        engine.query(&queries[0]),
        QueryResult::Pairs(vec![(0, 1), (1, 2)])
    );
}

#[test]
fn scenario_case_sensitivity() {
    let (mut engine, queries) =
        run("REL r\nFACT r Alice alice\nFACT r alice ALICE\nQUERY r Alice ?");
    // Only the lowercase alice is related to Alice
    let alice = engine.atoms.lookup("alice").unwrap();
    let upper = engine.atoms.lookup("ALICE").unwrap();
    let result = engine.query(&queries[0]);
    assert_eq!(result, QueryResult::Values(vec![alice]));
    assert_ne!(result, QueryResult::Values(vec![upper]));
}

#[test]
fn scenario_unknown_relation_in_query() {
    let (mut engine, queries) = run("REL r\nQUERY s 0 0");
    let result = engine.query(&queries[0]);
    assert!(result.is_empty());
}

#[test]
fn fixpoint_is_idempotent_across_solves() {
    let source = "\
REL edge
REL reach
FACT edge 0 1
FACT edge 1 2
RULE reach: SCAN edge, EMIT reach $0 $1
RULE reach: SCAN edge, JOIN reach $1, EMIT reach $0 $2
SOLVE";
    let once = {
        let (engine, _) = run(source);
        engine.facts.len()
    };
    let twice = {
        let (engine, _) = run(&format!("{}\nSOLVE", source));
        engine.facts.len()
    };
    assert_eq!(once, twice);
}

#[test]
fn printer_round_trip_preserves_execution() {
    use bytelog::ast::to_bl;

    let source = "\
REL parent
REL anc
FACT parent alice bob
FACT parent bob carol
RULE anc: SCAN parent, EMIT anc $0 $1
RULE anc: SCAN parent, JOIN anc $1, EMIT anc $0 $2
SOLVE
QUERY anc alice ?";

    let program = parse(source).unwrap();
    let printed = to_bl(&program);
    let (mut engine_a, queries_a) = run(source);
    let (mut engine_b, queries_b) = run(&printed);

    assert_eq!(engine_a.facts.len(), engine_b.facts.len());
    assert_eq!(engine_a.query(&queries_a[0]), engine_b.query(&queries_b[0]));
}

#[test]
fn wat_emission_is_deterministic() {
    let source = "\
REL parent
FACT parent alice bob
RULE anc: SCAN parent, EMIT anc $0 $1
SOLVE
QUERY parent alice bob";
    let program = parse(source).unwrap();
    let first = bytelog::wat::generate_string(&program).unwrap();
    let second = bytelog::wat::generate_string(&program).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_and_comment_only_sources() {
    assert!(parse("").unwrap().statements.is_empty());
    assert!(parse("; only\n// comments").unwrap().statements.is_empty());
}

#[test]
fn example_family_program_runs() {
    let source = include_str!("../example_family.bl");
    let program = parse(source).expect("example_family.bl must parse");
    let mut engine = Engine::new();
    engine.execute(&program).expect("example_family.bl must execute");
    assert!(engine.facts.len() > 0);

    // Every query in the demo file has at least one answer
    for query in program.queries() {
        assert!(
            !engine.query(query).is_empty(),
            "query {:?} returned nothing",
            query
        );
    }
}
