use thiserror::Error;

use crate::database::DatabaseError;

/// Errors during constraint-graph construction.
///
/// A database failure mid-construction aborts the build: a partially built
/// graph would silently produce an incomplete rule set.
#[derive(Debug, Error)]
pub enum GraphBuildError {
    #[error("Database error while building constraint graph: {0}")]
    Database(#[from] DatabaseError),
}
