//! Per-run table statistics context.
//!
//! Row counts are collected once per discovery run and passed explicitly
//! into the heuristics and the rule materializer. Nothing here refreshes or
//! invalidates: a discovery run operates on a static snapshot.

use std::collections::HashMap;

use log::debug;

use super::{DatabaseError, DatabaseInspector};

/// Row-count charge for a table missing from the cache. Unknown tables must
/// not look free to the heuristics, so the charge is deliberately large.
pub const UNKNOWN_TABLE_PENALTY: f64 = 10_000.0;

#[derive(Debug, Clone, Default)]
pub struct TableStatistics {
    row_counts: HashMap<String, u64>,
}

impl TableStatistics {
    /// Collect row counts for the given tables in one pass.
    pub async fn collect(
        inspector: &dyn DatabaseInspector,
        tables: &[String],
    ) -> Result<Self, DatabaseError> {
        let mut row_counts = HashMap::with_capacity(tables.len());
        for table in tables {
            let count = inspector.row_count(table).await?;
            debug!("table {} has {} rows", table, count);
            row_counts.insert(table.clone(), count);
        }
        Ok(Self { row_counts })
    }

    /// Build a statistics context from known counts (test fixtures).
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        Self {
            row_counts: counts.into_iter().collect(),
        }
    }

    pub fn row_count(&self, table: &str) -> Option<u64> {
        self.row_counts.get(table).copied()
    }

    /// Row count as a float, charging [`UNKNOWN_TABLE_PENALTY`] for tables
    /// absent from the cache.
    pub fn row_count_or_penalty(&self, table: &str) -> f64 {
        self.row_counts
            .get(table)
            .map(|&c| c as f64)
            .unwrap_or(UNKNOWN_TABLE_PENALTY)
    }
}
