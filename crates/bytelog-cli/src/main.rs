//! ByteLog CLI - Command line interface for the ByteLog compiler

use std::fs;
use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};

use bytelog_ast::{Program, QueryArg, StatementKind, ToBl};
use bytelog_engine::{AtomTable, Engine, QueryResult};

#[derive(Parser)]
#[command(name = "bytelog")]
#[command(about = "ByteLog deductive database compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file, execute it, and print derived facts and query results
    Demo {
        /// Input file
        file: Option<PathBuf>,
    },
    /// Parse a file and output the AST as JSON
    Parse {
        /// Input file
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },
    /// Compile a file to a WebAssembly text module
    WatGen {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { file } => {
            cmd_demo(&file.unwrap_or_else(|| PathBuf::from("example_family.bl")))
        }
        Commands::Parse { file, pretty } => cmd_parse(&file, pretty),
        Commands::WatGen { input, output } => cmd_wat_gen(&input, &output),
    }
}

fn read_source(file: &PathBuf) -> String {
    match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn parse_or_exit(source: &str, file: &PathBuf) -> Program {
    match bytelog_parser::parse(source) {
        Ok(program) => program,
        Err(e) => {
            report_parse_error(source, file, &e);
            std::process::exit(1);
        }
    }
}

fn cmd_demo(file: &PathBuf) {
    println!("ByteLog Compiler Demo");
    println!("Parsing file: {}\n", file.display());

    let source = read_source(file);
    let program = parse_or_exit(&source, file);

    // Statement summary
    let mut rel_count = 0;
    let mut fact_count = 0;
    let mut rule_count = 0;
    let mut solve_count = 0;
    let mut query_count = 0;

    for stmt in &program.statements {
        match &stmt.kind {
            StatementKind::Rel(_) => rel_count += 1,
            StatementKind::Fact(_) => fact_count += 1,
            StatementKind::Rule(_) => rule_count += 1,
            StatementKind::Solve => solve_count += 1,
            StatementKind::Query(_) => query_count += 1,
        }
    }

    println!("Relations declared: {}", rel_count);
    println!("Facts asserted: {}", fact_count);
    println!("Rules defined: {}", rule_count);
    println!("Solve statements: {}", solve_count);
    println!("Queries: {}\n", query_count);

    // Program logic narration
    println!("Program logic:");
    for stmt in &program.statements {
        match &stmt.kind {
            StatementKind::Rel(rel) => {
                println!("  declares relation '{}'", rel.name);
            }
            StatementKind::Fact(fact) => {
                println!("  asserts fact: {}", fact.to_bl());
            }
            StatementKind::Rule(rule) => {
                println!("  defines rule for '{}'", rule.target);
            }
            StatementKind::Solve => {
                println!("  computes fixpoint (derives all facts)");
            }
            StatementKind::Query(query) => match (&query.a, &query.b) {
                (QueryArg::Wildcard, QueryArg::Wildcard) => {
                    println!("  queries: all facts in {}", query.relation);
                }
                (QueryArg::Wildcard, b) => {
                    println!("  queries: all X where {}(X, {})", query.relation, b.to_bl());
                }
                (a, QueryArg::Wildcard) => {
                    println!("  queries: all Y where {}({}, Y)", query.relation, a.to_bl());
                }
                (a, b) => {
                    println!(
                        "  queries: is {}({}, {}) true?",
                        query.relation,
                        a.to_bl(),
                        b.to_bl()
                    );
                }
            },
        }
    }

    // Execute
    let mut engine = Engine::new();
    if let Err(e) = engine.execute(&program) {
        eprintln!("execute: {}", e.describe_at(&source));
        std::process::exit(1);
    }

    for warning in engine.warnings() {
        eprintln!("warning: {}", warning);
    }

    println!("\nDerived facts:");
    print_database(&engine);

    println!("\nQuery results:");
    let queries: Vec<_> = program.queries().cloned().collect();
    for (number, query) in queries.iter().enumerate() {
        println!(
            "Query {}: {}({}, {})",
            number + 1,
            query.relation,
            query.a.to_bl(),
            query.b.to_bl()
        );
        let result = engine.query(query);
        print_query_result(&result, &engine.atoms);
    }

    println!("\nDone.");
}

/// Print every populated relation in atom-table order, facts in
/// insertion order, with atom names where the table knows them.
fn print_database(engine: &Engine) {
    let mut any = false;
    for (id, name) in engine.atoms.iter() {
        if engine.facts.relation_size(id) == 0 {
            continue;
        }
        any = true;
        println!("  {} ({} facts):", name, engine.facts.relation_size(id));
        for (a, b) in engine.facts.iter_relation(id) {
            println!(
                "    {}({}, {})",
                name,
                display_value(a, &engine.atoms),
                display_value(b, &engine.atoms)
            );
        }
    }
    if !any {
        println!("  (none)");
    }
}

fn print_query_result(result: &QueryResult, atoms: &AtomTable) {
    match result {
        QueryResult::Check(true) => println!("  yes"),
        QueryResult::Check(false) => println!("  no"),
        QueryResult::Values(values) => {
            if values.is_empty() {
                println!("  no results found");
            }
            for value in values {
                println!("  {}", display_value(*value, atoms));
            }
        }
        QueryResult::Pairs(pairs) => {
            if pairs.is_empty() {
                println!("  no results found");
            }
            for (a, b) in pairs {
                println!("  ({}, {})", display_value(*a, atoms), display_value(*b, atoms));
            }
        }
    }
}

/// Present an atom name when the value is a known atom ID, else the integer.
fn display_value(value: i32, atoms: &AtomTable) -> String {
    match atoms.name(value) {
        Some(name) => name.to_string(),
        None => value.to_string(),
    }
}

fn cmd_parse(file: &PathBuf, pretty: bool) {
    let source = read_source(file);
    let program = parse_or_exit(&source, file);

    let json = if pretty {
        serde_json::to_string_pretty(&program)
    } else {
        serde_json::to_string(&program)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing AST: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_wat_gen(input: &PathBuf, output: &PathBuf) {
    let source = read_source(input);
    let program = parse_or_exit(&source, input);

    let mut out = match fs::File::create(output) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error creating {}: {}", output.display(), e);
            std::process::exit(1);
        }
    };

    match bytelog_wat::generate(&program, &mut out) {
        Ok(()) => println!("Compiled {} to {}", input.display(), output.display()),
        Err(e) => {
            eprintln!("wat-gen: {}", e);
            std::process::exit(1);
        }
    }
}

fn report_parse_error(source: &str, file: &PathBuf, error: &bytelog_parser::ParseError) {
    let span = error.span();
    let path = file.to_string_lossy().to_string();
    Report::build(ReportKind::Error, path.clone(), span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((path.clone(), span.start..span.end))
                .with_message(error.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((path, Source::from(source)))
        .ok();
}
