//! Database collaborator boundary
//!
//! The discovery core never talks to a concrete engine: everything it needs
//! from the database — schema introspection, per-table row counts and the
//! counting queries behind compatibility checks and rule metrics — goes
//! through the [`DatabaseInspector`] trait. The shipped implementation is
//! [`ClickHouseInspector`]; tests substitute mocks or in-memory fixtures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod clickhouse_inspector;
pub mod errors;
mod statistics;

pub use clickhouse_inspector::ClickHouseInspector;
pub use errors::DatabaseError;
pub use statistics::{TableStatistics, UNKNOWN_TABLE_PENALTY};

/// Column metadata as reported by schema introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    /// Engine type string, e.g. `UInt64` or `Nullable(String)`.
    pub data_type: String,
}

/// One table occurrence participating in a counting query.
///
/// The alias keeps repeated occurrences of the same table distinguishable
/// (`bupa_0`, `bupa_1`, ...) in the rendered SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub table: String,
    pub alias: String,
}

/// Equality constraint between two aliased columns of a counting query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub left_alias: String,
    pub left_column: String,
    pub right_alias: String,
    pub right_column: String,
}

/// Existentially quantified table occurrence attached to a count query.
///
/// In `conditions`, the left side names an outer alias and the right side
/// names `table.alias`. A row of the outer join combination is counted iff
/// at least one row of `table` satisfies every condition, so counts stay
/// bounded by the outer combination count even when matches are plural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemiJoin {
    pub table: TableRef,
    pub conditions: Vec<JoinCondition>,
}

/// A structured `count(*)` request over joined table occurrences.
///
/// Rule metrics are computed from two of these per candidate (the body
/// alone, then the body semi-joined with the head); keeping the request
/// structured rather than raw SQL lets test fixtures evaluate it without
/// an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCountSpec {
    pub tables: Vec<TableRef>,
    pub conditions: Vec<JoinCondition>,
    pub semi_join: Option<SemiJoin>,
}

/// Everything the discovery core needs from the underlying database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabaseInspector: Send + Sync {
    /// Names of the tables in the target schema.
    async fn table_names(&self) -> Result<Vec<String>, DatabaseError>;

    /// Column metadata for one table, in declaration order.
    async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError>;

    /// Total row count of a table.
    async fn row_count(&self, table: &str) -> Result<u64, DatabaseError>;

    /// Number of distinct values in a column.
    async fn count_distinct(&self, table: &str, column: &str) -> Result<u64, DatabaseError>;

    /// Number of distinct values appearing in both columns.
    async fn shared_values(
        &self,
        left_table: &str,
        left_column: &str,
        right_table: &str,
        right_column: &str,
    ) -> Result<u64, DatabaseError>;

    /// Evaluate a structured join-count query.
    async fn join_count(&self, spec: &JoinCountSpec) -> Result<u64, DatabaseError>;
}
