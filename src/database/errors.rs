use thiserror::Error;

/// Errors raised by the database collaborator.
///
/// Graph construction treats every variant as fatal: a compatibility check
/// that cannot be completed aborts the run rather than leaving a partially
/// built constraint graph behind.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Missing environment variable `{var}` for ClickHouse connection")]
    MissingEnv { var: String },
}

impl From<clickhouse::error::Error> for DatabaseError {
    fn from(err: clickhouse::error::Error) -> Self {
        DatabaseError::Query {
            message: err.to_string(),
        }
    }
}
