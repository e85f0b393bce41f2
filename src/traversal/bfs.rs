//! Breadth-first traversal over candidate snapshots.

use std::collections::{HashSet, VecDeque};

use super::candidate::CandidateRule;
use super::validity::admits_extension;
use super::{SearchContext, TraversalStrategy};

/// Expands one level at a time, so rules with fewer JIAs surface before
/// longer ones. Every open path is retained as its own
/// `(candidate, visited)` snapshot, which costs more memory than DFS's
/// single backtracked path.
pub struct BfsStrategy;

pub struct BfsIter<'a> {
    ctx: SearchContext<'a>,
    queue: VecDeque<(CandidateRule, HashSet<usize>)>,
}

impl<'a> BfsIter<'a> {
    fn new(ctx: SearchContext<'a>) -> Self {
        let mut queue = VecDeque::new();
        let empty = CandidateRule::new();
        let no_visits = HashSet::new();
        for root in ctx.graph.node_ids() {
            if admits_extension(ctx.graph, &empty, root, &no_visits, &ctx.limits) {
                queue.push_back((CandidateRule::single(root), [root].into_iter().collect()));
            }
        }
        Self { ctx, queue }
    }
}

impl Iterator for BfsIter<'_> {
    type Item = CandidateRule;

    fn next(&mut self) -> Option<Self::Item> {
        let (candidate, visited) = self.queue.pop_front()?;
        for node in self.ctx.graph.node_ids() {
            if admits_extension(self.ctx.graph, &candidate, node, &visited, &self.ctx.limits) {
                let mut extended = candidate.clone();
                extended.push(node);
                let mut extended_visited = visited.clone();
                extended_visited.insert(node);
                self.queue.push_back((extended, extended_visited));
            }
        }
        Some(candidate)
    }
}

impl TraversalStrategy for BfsStrategy {
    fn search<'a>(
        &self,
        ctx: SearchContext<'a>,
    ) -> Box<dyn Iterator<Item = CandidateRule> + 'a> {
        Box::new(BfsIter::new(ctx))
    }
}
