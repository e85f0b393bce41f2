//! Best-first traversal guided by a heuristic.

use std::collections::{BinaryHeap, HashSet};

use crate::heuristics::HeuristicFn;

use super::candidate::CandidateRule;
use super::validity::admits_extension;
use super::{SearchContext, TraversalStrategy};

/// Fixed cost charged per JIA on the path.
pub const STEP_COST: f64 = 1.0;

/// A* keeps a priority queue of open candidates ordered by
/// `cost + heuristic` and always expands the most promising one. Which
/// heuristic to use is supplied by the caller, not hard-coded.
pub struct AStarStrategy {
    heuristic: HeuristicFn,
}

impl AStarStrategy {
    pub fn new(heuristic: HeuristicFn) -> Self {
        Self { heuristic }
    }
}

/// An open candidate with its accumulated cost and heuristic estimate.
#[derive(Debug, Clone)]
pub struct PrioritizedRule {
    pub cost: f64,
    pub heuristic: f64,
    pub rule: CandidateRule,
}

impl PrioritizedRule {
    pub fn priority(&self) -> f64 {
        self.cost + self.heuristic
    }
}

impl PartialEq for PrioritizedRule {
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority()
    }
}

impl Eq for PrioritizedRule {}

impl PartialOrd for PrioritizedRule {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrioritizedRule {
    // BinaryHeap pops its maximum; the comparison is reversed so the
    // lowest cost + heuristic is popped first.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.priority().total_cmp(&self.priority())
    }
}

pub struct AStarIter<'a> {
    ctx: SearchContext<'a>,
    heuristic: HeuristicFn,
    open: BinaryHeap<PrioritizedRule>,
}

impl<'a> AStarIter<'a> {
    fn new(ctx: SearchContext<'a>, heuristic: HeuristicFn) -> Self {
        let mut open = BinaryHeap::new();
        let empty = CandidateRule::new();
        let no_visits = HashSet::new();
        for root in ctx.graph.node_ids() {
            if admits_extension(ctx.graph, &empty, root, &no_visits, &ctx.limits) {
                let rule = CandidateRule::single(root);
                let estimate = heuristic(&rule, ctx.graph, ctx.mapper, ctx.statistics);
                open.push(PrioritizedRule {
                    cost: STEP_COST,
                    heuristic: estimate,
                    rule,
                });
            }
        }
        Self {
            ctx,
            heuristic,
            open,
        }
    }
}

impl Iterator for AStarIter<'_> {
    type Item = CandidateRule;

    fn next(&mut self) -> Option<Self::Item> {
        let best = self.open.pop()?;
        let visited: HashSet<usize> = best.rule.node_ids().iter().copied().collect();
        for node in self.ctx.graph.node_ids() {
            if admits_extension(self.ctx.graph, &best.rule, node, &visited, &self.ctx.limits) {
                let mut extended = best.rule.clone();
                extended.push(node);
                let estimate =
                    (self.heuristic)(&extended, self.ctx.graph, self.ctx.mapper, self.ctx.statistics);
                self.open.push(PrioritizedRule {
                    cost: extended.len() as f64 * STEP_COST,
                    heuristic: estimate,
                    rule: extended,
                });
            }
        }
        Some(best.rule)
    }
}

impl TraversalStrategy for AStarStrategy {
    fn search<'a>(
        &self,
        ctx: SearchContext<'a>,
    ) -> Box<dyn Iterator<Item = CandidateRule> + 'a> {
        Box::new(AStarIter::new(ctx, self.heuristic))
    }
}
