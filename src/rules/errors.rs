use thiserror::Error;

use crate::database::DatabaseError;

/// Errors while computing rule metrics. A body that is never satisfied is
/// not an error — the rule is simply skipped.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Database error while computing rule metrics: {0}")]
    Database(#[from] DatabaseError),
}
