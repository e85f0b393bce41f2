//! Traversal engine
//!
//! Three interchangeable strategies walk the constraint graph and emit
//! candidate rules lazily: depth-first (default), breadth-first and
//! best-first (A*). All of them share the initial-node phase (every graph
//! node is tried as a rule start) and the validity predicate in
//! [`validity`]; they differ only in the order the open set is consumed.
//! Each strategy is a finite, non-restartable producer — it terminates when
//! its stack/queue/priority queue empties, and a consumer can simply stop
//! pulling to cancel.

use crate::constraint_graph::{AttributeMapper, ConstraintGraph};
use crate::database::TableStatistics;
use crate::heuristics::HeuristicFn;

mod astar;
mod bfs;
mod candidate;
mod dfs;
pub mod errors;
pub mod validity;

pub use astar::{AStarStrategy, PrioritizedRule, STEP_COST};
pub use bfs::BfsStrategy;
pub use candidate::CandidateRule;
pub use dfs::DfsStrategy;
pub use errors::TraversalError;

/// Built-in safety valves; there is no internal timeout beyond these.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Maximum distinct table occurrences per rule.
    pub max_table: usize,
    /// Maximum JIAs per rule.
    pub max_vars: usize,
}

/// Everything a strategy needs for one run. All references point into
/// state owned by the discovery engine; the graph is read-only during
/// traversal.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub graph: &'a ConstraintGraph,
    pub limits: SearchLimits,
    pub mapper: &'a AttributeMapper,
    pub statistics: &'a TableStatistics,
}

/// A pluggable traversal strategy. Alternate implementations are passed
/// in through this trait rather than swapped at module level.
pub trait TraversalStrategy {
    fn search<'a>(&self, ctx: SearchContext<'a>) -> Box<dyn Iterator<Item = CandidateRule> + 'a>;
}

/// Resolve a strategy by name (case-insensitive). `a-star` and `a_star`
/// are accepted as aliases for `astar`; anything else is an explicit
/// error, never a silent fallback.
pub fn strategy_for_name(
    name: &str,
    heuristic: HeuristicFn,
) -> Result<Box<dyn TraversalStrategy>, TraversalError> {
    match name.to_ascii_lowercase().as_str() {
        "dfs" => Ok(Box::new(DfsStrategy)),
        "bfs" => Ok(Box::new(BfsStrategy)),
        "astar" | "a-star" | "a_star" => Ok(Box::new(AStarStrategy::new(heuristic))),
        other => Err(TraversalError::UnknownAlgorithm(other.to_string())),
    }
}
