use anyhow::Context;
use clap::Parser;
use futures_util::StreamExt;
use log::{error, info};

use tgdmine::config::{self, DiscoveryConfig};
use tgdmine::database::ClickHouseInspector;
use tgdmine::discovery::{DiscoveryEngine, DiscoveryOptions};

/// tgdmine - TGD discovery over ClickHouse via constraint-graph search
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Load run configuration from a YAML file (CLI flags are ignored)
    #[arg(long)]
    config: Option<String>,

    /// Traversal algorithm (dfs, bfs, astar)
    #[arg(long, default_value = "dfs")]
    algorithm: String,

    /// Heuristic guiding A* (naive, table_size, join_selectivity, hybrid)
    #[arg(long, default_value = "hybrid")]
    heuristic: String,

    /// Maximum distinct table occurrences per rule
    #[arg(long, default_value_t = 3)]
    max_table: usize,

    /// Maximum joinable attribute pairs per rule
    #[arg(long, default_value_t = 3)]
    max_vars: usize,

    /// How many times the same table may occur in one rule
    #[arg(long, default_value_t = 1)]
    max_occurrences: usize,

    /// Minimum value-domain overlap for a joinable attribute pair
    #[arg(long, default_value_t = 0.1)]
    min_domain_overlap: f64,

    /// Skip rules below this confidence
    #[arg(long, default_value_t = 0.0)]
    min_confidence: f64,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            algorithm: cli.algorithm,
            heuristic: cli.heuristic,
            max_table: cli.max_table,
            max_vars: cli.max_vars,
            max_nb_occurrence: cli.max_occurrences,
            min_domain_overlap: cli.min_domain_overlap,
            min_confidence: cli.min_confidence,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    // Defaults to INFO level, overridable with RUST_LOG
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match cli.config.clone() {
        Some(path) => DiscoveryConfig::from_yaml_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => DiscoveryConfig::from_cli(cli.into()).context("invalid CLI configuration")?,
    };

    let inspector =
        ClickHouseInspector::from_env().context("building ClickHouse connection from env")?;

    let options = DiscoveryOptions {
        max_nb_occurrence: config.max_nb_occurrence,
        min_domain_overlap: config.min_domain_overlap,
        min_confidence: config.min_confidence,
    };
    let engine = DiscoveryEngine::initialize(inspector, &options)
        .await
        .context("building constraint graph")?;

    let mut rules = Box::pin(engine.discover_rules(
        &config.algorithm,
        config.max_table,
        config.max_vars,
        Some(&config.heuristic),
    )?);

    let mut emitted = 0usize;
    while let Some(item) = rules.next().await {
        match item {
            Ok(rule) => {
                // One JSON object per line; persistence is downstream's job.
                println!("{}", serde_json::to_string(&rule)?);
                emitted += 1;
            }
            Err(err) => {
                error!("discovery aborted: {}", err);
                return Err(err.into());
            }
        }
    }

    info!("discovery finished: {} rules emitted", emitted);
    Ok(())
}
