use std::path::PathBuf;

use clap::Parser;

use drawodds_bench::config::{BenchmarkConfig, ResolvedOutputs};
use drawodds_bench::logging::init_logging;
use drawodds_bench::runner::BenchRunner;

/// Cross-checks exact draw odds against seeded simulation.
#[derive(Debug, Parser)]
#[command(
    name = "drawodds-bench",
    author,
    version,
    about = "Deterministic exact-versus-simulated draw odds harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of simulated samples per query.
    #[arg(long, value_name = "SAMPLES")]
    samples: Option<usize>,

    /// Override the RNG seed for sample batches.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration and catalog (no queries are run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(samples) = cli.samples {
        config.sampling.samples = samples;
    }

    if let Some(seed) = cli.seed {
        config.sampling.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let query_count = config.queries.len();
    let run_id = config.run_id.clone();
    let samples = config.sampling.samples;

    println!(
        "Loaded configuration '{run_id}' with {query_count} quer{} ({samples} samples)",
        if query_count == 1 { "y" } else { "ies" }
    );

    if cli.validate_only {
        let runner = BenchRunner::new(config, outputs)?;
        println!(
            "Catalog OK: {} cards, deck {}",
            runner.calculator().deck().len(),
            runner.calculator().deck().id()
        );
        println!("Validation-only mode: query execution skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let mut runner = BenchRunner::new(config, outputs)?;
    let summary = runner.run()?;

    println!(
        "Run complete for '{run_id}': {} passed, {} failed → {} rows at {}",
        summary.passed,
        summary.failed(),
        summary.queries_run,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Structured log: {}", guard.log_path.display());
    }

    if summary.failed() > 0 {
        anyhow::bail!(
            "{} of {} queries exceeded tolerance",
            summary.failed(),
            summary.queries_run
        );
    }

    Ok(())
}
