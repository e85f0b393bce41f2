use thiserror::Error;

use crate::constraint_graph::GraphBuildError;
use crate::database::DatabaseError;
use crate::heuristics::HeuristicError;
use crate::rules::MetricsError;
use crate::traversal::TraversalError;

/// Top-level error for a discovery run.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Graph(#[from] GraphBuildError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Traversal(#[from] TraversalError),

    #[error(transparent)]
    Heuristic(#[from] HeuristicError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),
}
