use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TraversalError {
    #[error("Unknown traversal algorithm `{0}` (expected dfs, bfs or astar)")]
    UnknownAlgorithm(String),
}
