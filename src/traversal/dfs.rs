//! Depth-first traversal with explicit backtracking.

use std::collections::HashSet;

use super::candidate::CandidateRule;
use super::validity::admits_extension;
use super::{SearchContext, TraversalStrategy};

/// The default strategy: one mutable candidate, one visited set, an
/// explicit frame stack instead of recursion. On entering a node the
/// candidate is yielded immediately — every valid connected candidate is a
/// rule, not only maximal ones — and on exhausting a node's extensions the
/// path is popped so sibling branches see a clean state. Memory stays
/// proportional to the current path depth.
pub struct DfsStrategy;

struct Frame {
    node: usize,
    /// Next graph node id to try as an extension of this frame.
    next: usize,
}

pub struct DfsIter<'a> {
    ctx: SearchContext<'a>,
    candidate: CandidateRule,
    visited: HashSet<usize>,
    frames: Vec<Frame>,
    next_root: usize,
}

impl<'a> DfsIter<'a> {
    fn new(ctx: SearchContext<'a>) -> Self {
        Self {
            ctx,
            candidate: CandidateRule::new(),
            visited: HashSet::new(),
            frames: Vec::new(),
            next_root: 0,
        }
    }

    fn enter(&mut self, node: usize) -> CandidateRule {
        self.frames.push(Frame { node, next: 0 });
        self.candidate.push(node);
        self.visited.insert(node);
        self.candidate.clone()
    }

    fn leave(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.visited.remove(&frame.node);
            self.candidate.pop();
        }
    }
}

impl Iterator for DfsIter<'_> {
    type Item = CandidateRule;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.frames.is_empty() {
                // Initial-node phase: every graph node is a potential start.
                while self.next_root < self.ctx.graph.len() {
                    let root = self.next_root;
                    self.next_root += 1;
                    if admits_extension(
                        self.ctx.graph,
                        &self.candidate,
                        root,
                        &self.visited,
                        &self.ctx.limits,
                    ) {
                        return Some(self.enter(root));
                    }
                }
                return None;
            }

            let top = self.frames.last_mut().expect("frame stack is non-empty");
            if top.next < self.ctx.graph.len() {
                let node = top.next;
                top.next += 1;
                if admits_extension(
                    self.ctx.graph,
                    &self.candidate,
                    node,
                    &self.visited,
                    &self.ctx.limits,
                ) {
                    return Some(self.enter(node));
                }
            } else {
                self.leave();
            }
        }
    }
}

impl TraversalStrategy for DfsStrategy {
    fn search<'a>(
        &self,
        ctx: SearchContext<'a>,
    ) -> Box<dyn Iterator<Item = CandidateRule> + 'a> {
        Box::new(DfsIter::new(ctx))
    }
}
