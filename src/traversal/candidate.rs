//! Candidate rules: ordered JIA paths accumulated during traversal.

use std::collections::HashSet;

use crate::constraint_graph::{ConstraintGraph, JoinableIndexedAttributes, TableOccurrence};

/// An ordered sequence of constraint-graph node ids forming one candidate
/// rule. DFS mutates a single instance via push/pop; BFS and A* clone
/// snapshots per open path, so no candidate is ever shared between live
/// branches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CandidateRule {
    path: Vec<usize>,
}

impl CandidateRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(node: usize) -> Self {
        Self { path: vec![node] }
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn node_ids(&self) -> &[usize] {
        &self.path
    }

    pub fn contains(&self, node: usize) -> bool {
        self.path.contains(&node)
    }

    pub fn push(&mut self, node: usize) {
        self.path.push(node);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.path.pop()
    }

    /// Resolve the path to JIAs in traversal order.
    pub fn jias<'g>(
        &'g self,
        graph: &'g ConstraintGraph,
    ) -> impl Iterator<Item = &'g JoinableIndexedAttributes> + 'g {
        self.path.iter().map(move |&id| graph.node(id))
    }

    /// Distinct table occurrences touched by the candidate.
    pub fn table_occurrences(&self, graph: &ConstraintGraph) -> HashSet<TableOccurrence> {
        let mut occurrences = HashSet::new();
        for jia in self.jias(graph) {
            occurrences.extend(jia.occurrences());
        }
        occurrences
    }
}
