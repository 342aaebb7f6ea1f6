//! kvsql - compile SQL predicates into storage pushdown plans

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use kvsql::access::Value;
use kvsql::compiler::{CompiledPredicate, ExpressionCompiler};
use kvsql::config::CompilerConfig;
use kvsql::expression::DateParser;
use std::path::PathBuf;

/// Compile a predicate or SELECT statement and print the resulting plan
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Predicate (`a_date < TO_DATE(?)`) or `SELECT ... FROM ... WHERE ...`
    sql: String,

    /// Positional bind value as TYPE:VALUE (varchar, bigint, double, boolean, date) or `null`
    #[arg(short, long = "bind", value_parser = parse_bind)]
    binds: Vec<Value>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CompilerConfig::from_file(path),
        None => CompilerConfig::load(),
    }
    .context("Failed to load configuration")?;

    // Set up logging
    let log_level = if args.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let compiler = ExpressionCompiler::new(config);
    let is_select = args
        .sql
        .trim_start()
        .get(..6)
        .map_or(false, |head| head.eq_ignore_ascii_case("select"));

    if is_select {
        let compiled = compiler
            .compile_select(&args.sql, &args.binds)
            .context("Failed to compile statement")?;
        println!("table: {}", compiled.statement.table);
        match compiled.filter {
            Some(filter) => print_plan(&filter)?,
            None => println!("predicate: none"),
        }
    } else {
        let compiled = compiler
            .compile_sql(&args.sql, &args.binds)
            .context("Failed to compile predicate")?;
        print_plan(&compiled)?;
    }

    Ok(())
}

fn print_plan(compiled: &CompiledPredicate) -> Result<()> {
    println!("predicate: {}", compiled.predicate);
    match &compiled.pushdown.filter {
        Some(filter) => {
            let wire = filter.to_wire().context("Failed to encode filter")?;
            println!("filter: {}", filter);
            println!("filter wire size: {} bytes", wire.len());
        }
        None => println!("filter: none"),
    }
    match &compiled.pushdown.residual {
        Some(residual) => println!("residual: {}", residual),
        None => println!("residual: none"),
    }
    Ok(())
}

/// Parse a `TYPE:VALUE` bind argument
fn parse_bind(text: &str) -> Result<Value, String> {
    if text.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    let (kind, value) = text
        .split_once(':')
        .ok_or_else(|| format!("expected TYPE:VALUE, got '{}'", text))?;

    match kind.to_ascii_lowercase().as_str() {
        "varchar" | "string" => Ok(Value::String(value.to_string())),
        "bigint" | "int" => value
            .parse()
            .map(Value::Int64)
            .map_err(|e| format!("invalid bigint '{}': {}", value, e)),
        "double" => value
            .parse()
            .map(Value::Double)
            .map_err(|e| format!("invalid double '{}': {}", value, e)),
        "boolean" | "bool" => value
            .parse()
            .map(Value::Boolean)
            .map_err(|e| format!("invalid boolean '{}': {}", value, e)),
        "date" => DateParser::default()
            .parse(value)
            .map(Value::Date)
            .map_err(|e| e.to_string()),
        other => Err(format!("unknown bind type '{}'", other)),
    }
}
