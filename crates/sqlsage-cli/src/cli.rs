//! sqlsage command-line interface
//!
//! `sqlsage analyze` inspects a statement and prints tier, scores, and
//! suggestions; `sqlsage report` renders the full markdown report;
//! `sqlsage benchmark` times a statement against a SQLite database.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use sqlsage_analyzer::{
    AdvisoryResult, BenchmarkResult, PriorExecution, QueryAdvisor, QueryRecord, benchmark,
    render_report,
};
use sqlsage_core::{Connection, QueryDialect};
use sqlsage_driver_sqlite::SqliteConnection;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlsage", version, about = "SQL query advisory engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a statement and print tier, scores, and suggestions
    Analyze(AnalyzeArgs),
    /// Render the full markdown analysis report
    Report(AnalyzeArgs),
    /// Benchmark a statement against a SQLite database
    Benchmark(BenchmarkArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// SQL text; reads stdin when neither this nor --file is given
    sql: Option<String>,

    /// Read the SQL from a file
    #[arg(long, conflicts_with = "sql")]
    file: Option<PathBuf>,

    /// SQL dialect the statement is written in
    #[arg(long, default_value = "generic")]
    dialect: QueryDialect,

    /// Observed prior execution time in milliseconds
    #[arg(long)]
    prior_ms: Option<u64>,

    /// Emit the advisory result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BenchmarkArgs {
    /// SQL text; reads stdin when neither this nor --file is given
    sql: Option<String>,

    /// Read the SQL from a file
    #[arg(long, conflicts_with = "sql")]
    file: Option<PathBuf>,

    /// Path to the SQLite database (or :memory:)
    #[arg(long)]
    database: String,

    /// Number of timed executions
    #[arg(long, default_value_t = 5)]
    iterations: u32,

    /// Emit the benchmark result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(args, false),
        Command::Report(args) => run_analyze(args, true),
        Command::Benchmark(args) => run_benchmark(args).await,
    }
}

fn run_analyze(args: AnalyzeArgs, as_report: bool) -> anyhow::Result<()> {
    let sql = read_sql(args.sql.as_deref(), args.file.as_deref())?;

    let mut record = QueryRecord::new(sql).with_dialect(args.dialect);
    if let Some(ms) = args.prior_ms {
        record = record.with_prior_execution(PriorExecution::new(Duration::from_millis(ms)));
    }

    let result = QueryAdvisor::new()
        .analyze(&record)
        .context("analysis failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if as_report {
        println!("{}", render_report(&result));
    } else {
        print_analysis(&result);
    }
    Ok(())
}

async fn run_benchmark(args: BenchmarkArgs) -> anyhow::Result<()> {
    let sql = read_sql(args.sql.as_deref(), args.file.as_deref())?;

    let conn = SqliteConnection::open(&args.database)
        .with_context(|| format!("failed to open database '{}'", args.database))?;

    let result = benchmark(&conn, &sql, args.iterations)
        .await
        .context("benchmark failed")?;
    conn.close().await.ok();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&benchmark_json(&result))?);
    } else {
        print_benchmark(&result);
    }
    Ok(())
}

/// Resolve the SQL text from the argument, a file, or stdin
fn read_sql(sql: Option<&str>, file: Option<&std::path::Path>) -> anyhow::Result<String> {
    if let Some(sql) = sql {
        return Ok(sql.to_string());
    }
    if let Some(path) = file {
        tracing::debug!(path = %path.display(), "reading SQL from file");
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read SQL from stdin")?;
    if buffer.trim().is_empty() {
        bail!("no SQL supplied: pass it as an argument, via --file, or on stdin");
    }
    Ok(buffer)
}

fn print_analysis(result: &AdvisoryResult) {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        "Complexity".to_string(),
        result
            .complexity
            .map(|t| t.to_string())
            .unwrap_or_else(|| "unclassified".to_string()),
    ]);
    table.add_row(vec![
        "Performance score".to_string(),
        score_cell(result.performance_score),
    ]);
    table.add_row(vec![
        "Readability score".to_string(),
        score_cell(result.readability_score),
    ]);
    table.add_row(vec![
        "Estimated cost".to_string(),
        result
            .estimated_cost
            .map(|c| format!("{:.2}", c))
            .unwrap_or_else(|| "-".to_string()),
    ]);
    println!("{table}");
    println!();
    println!("{}", result.summary);

    if result.suggestions.is_empty() {
        return;
    }

    println!();
    let mut suggestions = Table::new();
    suggestions.set_header(vec!["Impact", "Category", "Recommendation"]);
    for suggestion in result.sorted_suggestions() {
        suggestions.add_row(vec![
            suggestion.impact.to_string(),
            suggestion.category.description().to_string(),
            suggestion.recommendation.clone(),
        ]);
    }
    println!("{suggestions}");
}

fn print_benchmark(result: &BenchmarkResult) {
    if result.is_vacuous() {
        println!("No executions performed (0 iterations requested).");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Statistic", "Value"]);
    table.add_row(vec!["Iterations".to_string(), result.iterations.to_string()]);
    table.add_row(vec!["Mean".to_string(), duration_cell(result.mean())]);
    table.add_row(vec!["Min".to_string(), duration_cell(result.min())]);
    table.add_row(vec!["Max".to_string(), duration_cell(result.max())]);
    table.add_row(vec!["Std dev".to_string(), duration_cell(result.std_dev())]);
    if let Some(rows) = result.row_count {
        table.add_row(vec!["Rows".to_string(), rows.to_string()]);
    }
    println!("{table}");
}

fn benchmark_json(result: &BenchmarkResult) -> serde_json::Value {
    serde_json::json!({
        "started_at": result.started_at,
        "iterations": result.iterations,
        "durations_ms": result
            .durations
            .iter()
            .map(|d| d.as_secs_f64() * 1000.0)
            .collect::<Vec<_>>(),
        "mean_ms": result.mean().map(|d| d.as_secs_f64() * 1000.0),
        "min_ms": result.min().map(|d| d.as_secs_f64() * 1000.0),
        "max_ms": result.max().map(|d| d.as_secs_f64() * 1000.0),
        "std_dev_ms": result.std_dev().map(|d| d.as_secs_f64() * 1000.0),
        "row_count": result.row_count,
    })
}

fn score_cell(score: Option<u8>) -> String {
    score
        .map(|s| format!("{}/100", s))
        .unwrap_or_else(|| "-".to_string())
}

fn duration_cell(duration: Option<Duration>) -> String {
    duration
        .map(|d| format!("{:.3} ms", d.as_secs_f64() * 1000.0))
        .unwrap_or_else(|| "-".to_string())
}
