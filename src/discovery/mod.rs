//! Discovery run orchestration
//!
//! A [`DiscoveryEngine`] is built once per run: it introspects the schema,
//! certifies compatible attribute pairs, lifts them into the constraint
//! graph and caches per-table row counts. [`DiscoveryEngine::discover_rules`]
//! then exposes the traversal as a lazy stream of [`TgdRule`]s — each call
//! starts a fresh, non-restartable traversal, and a consumer cancels simply
//! by dropping the stream. The engine holds no shared mutable state, no
//! locks and no internal timeouts; `max_table`/`max_vars` are the only
//! built-in safety valves.

use futures_util::stream::{self, Stream};
use log::info;

use crate::constraint_graph::{AttributeMapper, ConstraintGraph, GraphBuilder};
use crate::database::{DatabaseInspector, TableStatistics};
use crate::heuristics::{self, heuristic_for_name};
use crate::rules::{RuleMaterializer, TgdRule};
use crate::traversal::{strategy_for_name, CandidateRule, SearchContext, SearchLimits};

pub mod errors;

pub use errors::DiscoveryError;

/// Knobs fixed at engine construction time.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// How many occurrences of the same table may appear in one rule.
    pub max_nb_occurrence: usize,
    /// Minimum value-domain overlap for an attribute pair to be joinable.
    pub min_domain_overlap: f64,
    /// Rules below this confidence are skipped (0.0 disables the filter).
    pub min_confidence: f64,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_nb_occurrence: 1,
            min_domain_overlap: 0.1,
            min_confidence: 0.0,
        }
    }
}

pub struct DiscoveryEngine<I: DatabaseInspector> {
    inspector: I,
    graph: ConstraintGraph,
    mapper: AttributeMapper,
    statistics: TableStatistics,
    min_confidence: f64,
}

impl<I: DatabaseInspector> DiscoveryEngine<I> {
    /// Build the constraint graph and the statistics cache. One call per
    /// discovery run; any database failure aborts initialization.
    pub async fn initialize(
        inspector: I,
        options: &DiscoveryOptions,
    ) -> Result<Self, DiscoveryError> {
        let builder = GraphBuilder::new(options.max_nb_occurrence, options.min_domain_overlap);
        let (graph, mapper) = builder.build(&inspector).await?;

        let tables: Vec<String> = (0..mapper.table_count())
            .map(|i| mapper.table_name(i).to_string())
            .collect();
        let statistics = TableStatistics::collect(&inspector, &tables).await?;

        info!(
            "discovery engine ready: {} tables, {} graph nodes",
            tables.len(),
            graph.len()
        );
        Ok(Self {
            inspector,
            graph,
            mapper,
            statistics,
            min_confidence: options.min_confidence,
        })
    }

    pub fn graph(&self) -> &ConstraintGraph {
        &self.graph
    }

    pub fn mapper(&self) -> &AttributeMapper {
        &self.mapper
    }

    pub fn statistics(&self) -> &TableStatistics {
        &self.statistics
    }

    /// Lazy candidate traversal without metrics. Strategy and heuristic
    /// names are resolved up front so a bad name fails before any search
    /// work happens.
    pub fn candidates(
        &self,
        algorithm: &str,
        max_table: usize,
        max_vars: usize,
        heuristic: Option<&str>,
    ) -> Result<impl Iterator<Item = CandidateRule> + '_, DiscoveryError> {
        let heuristic_fn = match heuristic {
            Some(name) => heuristic_for_name(name)?,
            None => heuristics::hybrid,
        };
        let strategy = strategy_for_name(algorithm, heuristic_fn)?;
        let ctx = SearchContext {
            graph: &self.graph,
            limits: SearchLimits {
                max_table,
                max_vars,
            },
            mapper: &self.mapper,
            statistics: &self.statistics,
        };
        Ok(strategy.search(ctx))
    }

    /// The discovery entry point: a lazy, finite stream of scored rules.
    ///
    /// Candidates whose body is never satisfied, or whose confidence falls
    /// below the configured threshold, are skipped silently; database
    /// errors surface as stream items and the caller decides whether to
    /// keep pulling.
    pub fn discover_rules(
        &self,
        algorithm: &str,
        max_table: usize,
        max_vars: usize,
        heuristic: Option<&str>,
    ) -> Result<impl Stream<Item = Result<TgdRule, DiscoveryError>> + '_, DiscoveryError> {
        let candidates = self.candidates(algorithm, max_table, max_vars, heuristic)?;
        let materializer = RuleMaterializer::new(
            &self.graph,
            &self.mapper,
            &self.statistics,
            &self.inspector,
            self.min_confidence,
        );

        Ok(stream::unfold(
            (candidates, materializer),
            |(mut candidates, materializer)| async move {
                loop {
                    let candidate = candidates.next()?;
                    match materializer.materialize(&candidate).await {
                        Ok(Some(rule)) => return Some((Ok(rule), (candidates, materializer))),
                        Ok(None) => continue,
                        Err(err) => {
                            return Some((Err(err.into()), (candidates, materializer)))
                        }
                    }
                }
            },
        ))
    }
}
