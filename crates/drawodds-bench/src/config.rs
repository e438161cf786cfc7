use drawodds_core::CalculatorOptions;
use drawodds_core::model::category::Category;
use drawodds_core::sampling::GrowthPolicy;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_SAMPLES: usize = 2_000;
const DEFAULT_CACHE_CAPACITY: usize = 50;
const DEFAULT_TOLERANCE: f64 = 0.05;
const MAX_JOINT_REQUIREMENTS: usize = 3;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root harness configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub catalog: String,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    pub queries: Vec<QueryConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        if self.catalog.trim().is_empty() {
            return Err(invalid("catalog", "catalog path must not be empty"));
        }
        self.sampling.validate()?;
        if !(self.tolerance > 0.0 && self.tolerance <= 1.0) {
            return Err(invalid("tolerance", "tolerance must lie in (0, 1]"));
        }
        validate_queries(&self.queries)?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        PathBuf::from(&self.catalog)
    }
}

/// Sampling and caching parameters handed to the calculator.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SamplingConfig {
    pub seed: Option<u64>,
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default)]
    pub growth: GrowthPolicy,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            samples: DEFAULT_SAMPLES,
            growth: GrowthPolicy::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SamplingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.samples == 0 {
            return Err(invalid(
                "sampling.samples",
                "number of samples must be greater than zero",
            ));
        }
        if self.cache_capacity == 0 {
            return Err(invalid(
                "sampling.cache_capacity",
                "cache capacity must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn calculator_options(&self) -> CalculatorOptions {
        CalculatorOptions {
            cache_capacity: self.cache_capacity,
            seed: self.seed,
            growth: self.growth,
        }
    }
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Draw,
    Joint,
}

/// One exact-versus-simulated comparison.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryConfig {
    pub name: String,
    pub kind: QueryKind,
    pub draws: usize,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub requirements: Vec<RequirementConfig>,
}

impl QueryConfig {
    pub fn requirement_pairs(&self) -> Vec<(Category, usize)> {
        self.requirements
            .iter()
            .map(|req| (req.category, req.at_least))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct RequirementConfig {
    pub category: Category,
    pub at_least: usize,
}

fn validate_queries(queries: &[QueryConfig]) -> Result<(), ValidationError> {
    if queries.is_empty() {
        return Err(invalid("queries", "at least one query must be specified"));
    }

    let mut seen = HashSet::new();
    for query in queries {
        if query.name.trim().is_empty() {
            return Err(invalid("queries.name", "query name must not be empty"));
        }
        if !seen.insert(query.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "queries".to_string(),
                message: format!("query name '{}' defined more than once", query.name),
            });
        }
        if query.draws == 0 {
            return Err(ValidationError::InvalidField {
                field: format!("queries[{}].draws", query.name),
                message: "draws must be greater than zero".to_string(),
            });
        }
        match query.kind {
            QueryKind::Draw if query.category.is_none() => {
                return Err(ValidationError::InvalidField {
                    field: format!("queries[{}].category", query.name),
                    message: "draw queries need a category".to_string(),
                });
            }
            QueryKind::Joint
                if query.requirements.is_empty()
                    || query.requirements.len() > MAX_JOINT_REQUIREMENTS =>
            {
                return Err(ValidationError::InvalidField {
                    field: format!("queries[{}].requirements", query.name),
                    message: format!(
                        "joint queries take between 1 and {MAX_JOINT_REQUIREMENTS} requirements"
                    ),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(label, "path must not be empty"));
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(invalid(label, "resolved path is invalid"));
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(invalid("run_id", "run_id must not be empty"));
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(invalid(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }

    Ok(())
}

fn invalid(field: &str, message: &str) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
