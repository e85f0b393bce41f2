//! Heuristic scoring for best-first traversal.
//!
//! Four interchangeable, pure scoring functions consumed only by the A*
//! strategy. Lower is more promising. Table sizes come from the per-run
//! [`TableStatistics`] cache; a table missing from the cache is charged a
//! fixed penalty so unknown tables are never unfairly favored.

use thiserror::Error;

use crate::constraint_graph::{AttributeMapper, ConstraintGraph};
use crate::database::TableStatistics;
use crate::traversal::CandidateRule;

/// Scoring function signature shared by all heuristics.
pub type HeuristicFn =
    fn(&CandidateRule, &ConstraintGraph, &AttributeMapper, &TableStatistics) -> f64;

/// Join selectivity applied per additional joined table occurrence.
pub const JOIN_SELECTIVITY_FACTOR: f64 = 0.1;

/// Scale constant for squashing unbounded scores into `[0, 1)`.
const NORMALIZATION_SCALE: f64 = 1_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum HeuristicError {
    #[error("Unknown heuristic `{0}` (expected naive, table_size, join_selectivity or hybrid)")]
    UnknownHeuristic(String),
}

/// Resolve a heuristic by name (case-insensitive); unknown names error
/// instead of silently defaulting.
pub fn heuristic_for_name(name: &str) -> Result<HeuristicFn, HeuristicError> {
    match name.to_ascii_lowercase().as_str() {
        "naive" => Ok(naive),
        "table_size" | "table-size" => Ok(table_size),
        "join_selectivity" | "join-selectivity" => Ok(join_selectivity),
        "hybrid" => Ok(hybrid),
        other => Err(HeuristicError::UnknownHeuristic(other.to_string())),
    }
}

/// Number of distinct table occurrences: prefers simpler rules.
pub fn naive(
    candidate: &CandidateRule,
    graph: &ConstraintGraph,
    _mapper: &AttributeMapper,
    _statistics: &TableStatistics,
) -> f64 {
    candidate.table_occurrences(graph).len() as f64
}

/// Mean row count of the tables involved: prefers candidates touching
/// smaller tables, which are cheaper to validate downstream.
pub fn table_size(
    candidate: &CandidateRule,
    graph: &ConstraintGraph,
    mapper: &AttributeMapper,
    statistics: &TableStatistics,
) -> f64 {
    let occurrences = candidate.table_occurrences(graph);
    if occurrences.is_empty() {
        return 0.0;
    }
    let total: f64 = occurrences
        .iter()
        .map(|occ| statistics.row_count_or_penalty(mapper.table_name(occ.table_index)))
        .sum();
    total / occurrences.len() as f64
}

/// Estimated post-join intermediate cardinality: the product of the
/// involved table sizes discounted by a conservative selectivity factor
/// per additional joined occurrence. Penalizes combinatorially explosive
/// joins.
pub fn join_selectivity(
    candidate: &CandidateRule,
    graph: &ConstraintGraph,
    mapper: &AttributeMapper,
    statistics: &TableStatistics,
) -> f64 {
    let occurrences = candidate.table_occurrences(graph);
    if occurrences.is_empty() {
        return 0.0;
    }
    let mut cardinality = 1.0;
    for occ in &occurrences {
        cardinality *= statistics.row_count_or_penalty(mapper.table_name(occ.table_index));
    }
    cardinality * JOIN_SELECTIVITY_FACTOR.powi(occurrences.len() as i32 - 1)
}

/// Recommended default: weighted blend of rule complexity, normalized
/// per-table cost and normalized log join blow-up.
pub fn hybrid(
    candidate: &CandidateRule,
    graph: &ConstraintGraph,
    mapper: &AttributeMapper,
    statistics: &TableStatistics,
) -> f64 {
    let complexity = naive(candidate, graph, mapper, statistics);
    let size = table_size(candidate, graph, mapper, statistics);
    let selectivity = join_selectivity(candidate, graph, mapper, statistics);
    0.3 * complexity + 0.4 * normalized(size) + 0.3 * normalized(selectivity.max(1.0).ln())
}

/// Monotone squash of `[0, inf)` into `[0, 1)`.
fn normalized(value: f64) -> f64 {
    value / (value + NORMALIZATION_SCALE)
}
