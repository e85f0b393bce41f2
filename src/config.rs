//! Discovery run configuration with validation.
//!
//! Three construction paths: environment variables (`TGDMINE_*`), CLI
//! arguments (through [`CliConfig`]) and YAML files.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::heuristics::heuristic_for_name;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to read configuration file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn validate_algorithm(name: &str) -> Result<(), ValidationError> {
    match name.to_ascii_lowercase().as_str() {
        "dfs" | "bfs" | "astar" | "a-star" | "a_star" => Ok(()),
        _ => Err(ValidationError::new("unknown_algorithm")),
    }
}

fn validate_heuristic(name: &str) -> Result<(), ValidationError> {
    heuristic_for_name(name)
        .map(|_| ())
        .map_err(|_| ValidationError::new("unknown_heuristic"))
}

/// Discovery run configuration with validation.
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Traversal algorithm: dfs, bfs or astar
    #[validate(custom(function = "validate_algorithm"))]
    pub algorithm: String,

    /// Heuristic guiding A*: naive, table_size, join_selectivity or hybrid
    #[validate(custom(function = "validate_heuristic"))]
    pub heuristic: String,

    /// Maximum distinct table occurrences per rule
    #[validate(range(min = 1, max = 16, message = "max_table must be between 1 and 16"))]
    pub max_table: usize,

    /// Maximum JIAs per rule
    #[validate(range(min = 1, max = 32, message = "max_vars must be between 1 and 32"))]
    pub max_vars: usize,

    /// How many times the same table may occur in one rule (self-joins)
    #[validate(range(
        min = 1,
        max = 8,
        message = "max_nb_occurrence must be between 1 and 8"
    ))]
    pub max_nb_occurrence: usize,

    /// Minimum value-domain overlap for a joinable attribute pair
    #[validate(range(
        min = 0.0,
        max = 1.0,
        message = "min_domain_overlap must be between 0.0 and 1.0"
    ))]
    pub min_domain_overlap: f64,

    /// Rules below this confidence are not emitted (0.0 disables)
    #[validate(range(
        min = 0.0,
        max = 1.0,
        message = "min_confidence must be between 0.0 and 1.0"
    ))]
    pub min_confidence: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            algorithm: "dfs".to_string(),
            heuristic: "hybrid".to_string(),
            max_table: 3,
            max_vars: 3,
            max_nb_occurrence: 1,
            min_domain_overlap: 0.1,
            min_confidence: 0.0,
        }
    }
}

impl DiscoveryConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            algorithm: env::var("TGDMINE_ALGORITHM").unwrap_or(defaults.algorithm),
            heuristic: env::var("TGDMINE_HEURISTIC").unwrap_or(defaults.heuristic),
            max_table: parse_env_var("TGDMINE_MAX_TABLE", "3")?,
            max_vars: parse_env_var("TGDMINE_MAX_VARS", "3")?,
            max_nb_occurrence: parse_env_var("TGDMINE_MAX_NB_OCCURRENCE", "1")?,
            min_domain_overlap: parse_env_var("TGDMINE_MIN_DOMAIN_OVERLAP", "0.1")?,
            min_confidence: parse_env_var("TGDMINE_MIN_CONFIDENCE", "0.0")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            algorithm: cli.algorithm,
            heuristic: cli.heuristic,
            max_table: cli.max_table,
            max_vars: cli.max_vars,
            max_nb_occurrence: cli.max_nb_occurrence,
            min_domain_overlap: cli.min_domain_overlap,
            min_confidence: cli.min_confidence,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with validation
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML string with validation
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}

/// CLI-sourced configuration values, converted from the clap parser in the
/// binary.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub algorithm: String,
    pub heuristic: String,
    pub max_table: usize,
    pub max_vars: usize,
    pub max_nb_occurrence: usize,
    pub min_domain_overlap: f64,
    pub min_confidence: f64,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
