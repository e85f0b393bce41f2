//! Candidate extension validity, shared by every traversal strategy.

use std::collections::{HashMap, HashSet};

use crate::constraint_graph::ConstraintGraph;

use super::candidate::CandidateRule;
use super::SearchLimits;

/// Decide whether `next` may extend `candidate`. The five checks
/// short-circuit in order:
///
/// 1. acyclic — `next` must not already be on the path;
/// 2. size bound — the extended rule must stay within `max_vars`;
/// 3. connectivity — a non-empty candidate only accepts nodes sharing a
///    table occurrence with some node already on the path;
/// 4. table bound — distinct table occurrences must stay within
///    `max_table`;
/// 5. occurrence contiguity — per table, the occurrence indices in use
///    must form the run `0..n`; any gap or offset numbering is a redundant
///    relabeling of a candidate already reachable elsewhere.
pub fn admits_extension(
    graph: &ConstraintGraph,
    candidate: &CandidateRule,
    next: usize,
    visited: &HashSet<usize>,
    limits: &SearchLimits,
) -> bool {
    if visited.contains(&next) {
        return false;
    }
    if candidate.len() + 1 > limits.max_vars {
        return false;
    }

    if !candidate.is_empty()
        && !candidate
            .node_ids()
            .iter()
            .any(|&id| graph.neighbors(id).contains(&next))
    {
        return false;
    }

    let next_node = graph.node(next);

    let mut occurrences = candidate.table_occurrences(graph);
    occurrences.extend(next_node.occurrences());
    if occurrences.len() > limits.max_table {
        return false;
    }

    let mut per_table: HashMap<usize, HashSet<usize>> = HashMap::new();
    for occ in &occurrences {
        per_table
            .entry(occ.table_index)
            .or_default()
            .insert(occ.occurrence_index);
    }
    per_table
        .values()
        .all(|indices| (0..indices.len()).all(|j| indices.contains(&j)))
}
