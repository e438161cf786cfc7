use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use drawodds_core::math::variance;
use drawodds_core::model::catalog::{Catalog, CatalogError};
use drawodds_core::model::category::Category;
use drawodds_core::{Calculator, QueryError};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, QueryConfig, QueryKind, ResolvedOutputs};
use crate::report::write_summary;

/// Runs every configured query through both the exact and simulated paths.
pub struct BenchRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    calculator: Calculator,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub queries_run: usize,
    pub passed: usize,
    pub rows: Vec<QueryRow>,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.queries_run - self.passed
    }
}

/// One JSONL row per query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRow {
    pub run_id: String,
    pub query: String,
    pub kind: &'static str,
    pub draws: usize,
    pub samples: usize,
    pub deck_size: usize,
    /// Expected hits for draw queries, joint probability for joint queries.
    pub exact: f64,
    pub simulated: f64,
    /// Relative error for draw queries, absolute error for joint queries.
    pub error: f64,
    pub z_score: Option<f64>,
    pub p_value: Option<f64>,
    pub overlapping_tags: bool,
    pub passed: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exact_pmf: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub simulated_frequencies: Vec<u64>,
}

impl BenchRunner {
    /// Load the catalog and build a calculator from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let catalog = Catalog::from_path(config.catalog_path())?;
        let calculator = Calculator::new(catalog, config.sampling.calculator_options());
        event!(
            Level::INFO,
            run_id = %config.run_id,
            cards = calculator.deck().len(),
            deck = %calculator.deck().id(),
            "catalog loaded"
        );
        Ok(Self {
            config,
            outputs,
            calculator,
        })
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Execute the queries, streaming JSONL rows to disk.
    pub fn run(&mut self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let queries = self.config.queries.clone();
        let mut rows = Vec::with_capacity(queries.len());

        for query in &queries {
            let row = match query.kind {
                QueryKind::Draw => self.evaluate_draw(query)?,
                QueryKind::Joint => self.evaluate_joint(query)?,
            };
            event!(
                Level::INFO,
                query = %row.query,
                exact = row.exact,
                simulated = row.simulated,
                error = row.error,
                passed = row.passed,
                "query evaluated"
            );
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows.push(row);
        }
        writer.flush()?;

        write_summary(
            &self.outputs.summary_md,
            &self.config.run_id,
            self.config.tolerance,
            &rows,
        )?;

        Ok(RunSummary {
            queries_run: rows.len(),
            passed: rows.iter().filter(|row| row.passed).count(),
            rows,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn evaluate_draw(&mut self, query: &QueryConfig) -> Result<QueryRow, RunnerError> {
        let category = query.category.ok_or_else(|| RunnerError::MissingCategory {
            query: query.name.clone(),
        })?;
        let samples = self.config.sampling.samples;
        let exact = self
            .calculator
            .exact_draw(category, query.draws)
            .map_err(|source| RunnerError::query(query, source))?;
        let simulated = self
            .calculator
            .simulate_draw(category, query.draws, samples)
            .map_err(|source| RunnerError::query(query, source))?;

        let deck = self.calculator.deck();
        let population = deck.len() as i64;
        let drawn = (query.draws as i64).min(population);
        let spread = variance(population, deck.count(category) as i64, drawn).sqrt();
        let standard_error = spread / (samples as f64).sqrt();

        let diff = simulated.average() - exact.expected_value;
        let error = if exact.expected_value == 0.0 {
            simulated.average().abs()
        } else {
            diff.abs() / exact.expected_value
        };
        let (z_score, p_value) = z_test(diff, standard_error);

        Ok(QueryRow {
            run_id: self.config.run_id.clone(),
            query: query.name.clone(),
            kind: "draw",
            draws: query.draws,
            samples,
            deck_size: deck.len(),
            exact: exact.expected_value,
            simulated: simulated.average(),
            error,
            z_score,
            p_value,
            overlapping_tags: false,
            passed: error <= self.config.tolerance,
            exact_pmf: exact.outcomes.iter().map(|point| point.probability).collect(),
            simulated_frequencies: simulated.frequencies.clone(),
        })
    }

    fn evaluate_joint(&mut self, query: &QueryConfig) -> Result<QueryRow, RunnerError> {
        let samples = self.config.sampling.samples;
        let requirements = query.requirement_pairs();
        let exact = self
            .calculator
            .exact_at_least(&requirements, query.draws)
            .map_err(|source| RunnerError::query(query, source))?;
        let simulated = self
            .calculator
            .simulate_at_least(&requirements, query.draws, samples)
            .map_err(|source| RunnerError::query(query, source))?;

        let categories: Vec<Category> =
            requirements.iter().map(|(category, _)| *category).collect();
        let deck = self.calculator.deck();
        let overlapping_tags = !deck.is_partitioned_by(&categories);

        let diff = simulated - exact;
        let standard_error = (exact * (1.0 - exact) / samples as f64).sqrt();
        let (z_score, p_value) = z_test(diff, standard_error);
        let error = diff.abs();

        Ok(QueryRow {
            run_id: self.config.run_id.clone(),
            query: query.name.clone(),
            kind: "joint",
            draws: query.draws,
            samples,
            deck_size: deck.len(),
            exact,
            simulated,
            error,
            z_score,
            p_value,
            overlapping_tags,
            passed: error <= self.config.tolerance,
            exact_pmf: Vec::new(),
            simulated_frequencies: Vec::new(),
        })
    }
}

/// Two-sided normal test of `diff` against its standard error.
fn z_test(diff: f64, standard_error: f64) -> (Option<f64>, Option<f64>) {
    if !(standard_error > 0.0) {
        return (None, None);
    }
    let z = diff / standard_error;
    let p = Normal::new(0.0, 1.0)
        .ok()
        .map(|normal| (2.0 * (1.0 - normal.cdf(z.abs()))).clamp(0.0, 1.0));
    (Some(z), p)
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(parent) = path {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("query '{query}' failed: {source}")]
    Query {
        query: String,
        #[source]
        source: QueryError,
    },
    #[error("query '{query}' has no category")]
    MissingCategory { query: String },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize query row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

impl RunnerError {
    fn query(query: &QueryConfig, source: QueryError) -> Self {
        RunnerError::Query {
            query: query.name.clone(),
            source,
        }
    }
}
