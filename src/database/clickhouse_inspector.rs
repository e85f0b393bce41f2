//! ClickHouse implementation of the [`DatabaseInspector`] trait.
//!
//! Introspection goes through `system.tables` / `system.columns`; all
//! counting queries use `count()` / `uniqExact` aggregates so only a single
//! row ever crosses the wire.

use std::env;

use async_trait::async_trait;
use clickhouse::Client;
use log::debug;
use serde::Deserialize;

use super::errors::DatabaseError;
use super::{ColumnInfo, DatabaseInspector, JoinCountSpec};

#[derive(Debug, Deserialize, clickhouse::Row)]
struct CountRow {
    cnt: u64,
}

pub struct ClickHouseInspector {
    client: Client,
    database: String,
}

fn read_env_var(key: &str) -> Result<String, DatabaseError> {
    env::var(key).map_err(|_| DatabaseError::MissingEnv {
        var: key.to_string(),
    })
}

impl ClickHouseInspector {
    pub fn new(client: Client, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    /// Build an inspector from the standard ClickHouse environment variables
    /// (`CLICKHOUSE_URL`, `CLICKHOUSE_USER`, `CLICKHOUSE_PASSWORD`,
    /// `CLICKHOUSE_DATABASE`).
    pub fn from_env() -> Result<Self, DatabaseError> {
        let url = read_env_var("CLICKHOUSE_URL")?;
        let user = read_env_var("CLICKHOUSE_USER")?;
        let password = read_env_var("CLICKHOUSE_PASSWORD")?;
        let database = read_env_var("CLICKHOUSE_DATABASE")?;

        let client = Client::default()
            .with_url(url)
            .with_user(user)
            .with_password(password)
            .with_database(database.clone());

        Ok(Self::new(client, database))
    }

    async fn fetch_count(&self, sql: &str) -> Result<u64, DatabaseError> {
        debug!("count query: {}", sql);
        let row: CountRow = self.client.query(sql).fetch_one().await?;
        Ok(row.cnt)
    }
}

#[async_trait]
impl DatabaseInspector for ClickHouseInspector {
    async fn table_names(&self) -> Result<Vec<String>, DatabaseError> {
        #[derive(Debug, Deserialize, clickhouse::Row)]
        struct TableName {
            name: String,
        }

        let sql = format!(
            "SELECT name FROM system.tables \
             WHERE database = '{}' AND engine NOT IN ('SystemTable', 'MaterializedView') \
             ORDER BY name",
            self.database
        );
        let rows: Vec<TableName> = self.client.query(&sql).fetch_all().await?;
        Ok(rows.into_iter().map(|t| t.name).collect())
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError> {
        #[derive(Debug, Deserialize, clickhouse::Row)]
        struct ColumnRow {
            name: String,
            #[serde(rename = "type")]
            data_type: String,
        }

        let sql = format!(
            "SELECT name, type FROM system.columns \
             WHERE database = '{}' AND table = '{}' \
             ORDER BY position",
            self.database, table
        );
        let rows: Vec<ColumnRow> = self.client.query(&sql).fetch_all().await?;
        Ok(rows
            .into_iter()
            .map(|c| ColumnInfo {
                name: c.name,
                data_type: c.data_type,
            })
            .collect())
    }

    async fn row_count(&self, table: &str) -> Result<u64, DatabaseError> {
        self.fetch_count(&format!("SELECT count() AS cnt FROM {}", table))
            .await
    }

    async fn count_distinct(&self, table: &str, column: &str) -> Result<u64, DatabaseError> {
        self.fetch_count(&format!(
            "SELECT uniqExact({}) AS cnt FROM {}",
            column, table
        ))
        .await
    }

    async fn shared_values(
        &self,
        left_table: &str,
        left_column: &str,
        right_table: &str,
        right_column: &str,
    ) -> Result<u64, DatabaseError> {
        self.fetch_count(&format!(
            "SELECT uniqExact(l.{lc}) AS cnt FROM {lt} AS l INNER JOIN {rt} AS r ON l.{lc} = r.{rc}",
            lc = left_column,
            lt = left_table,
            rt = right_table,
            rc = right_column,
        ))
        .await
    }

    async fn join_count(&self, spec: &JoinCountSpec) -> Result<u64, DatabaseError> {
        self.fetch_count(&render_join_count(spec)).await
    }
}

fn render_condition(c: &super::JoinCondition) -> String {
    format!(
        "{}.{} = {}.{}",
        c.left_alias, c.left_column, c.right_alias, c.right_column
    )
}

/// Render a [`JoinCountSpec`] as a ClickHouse `count()` query.
///
/// Outer occurrences are joined with `CROSS JOIN` and all equality
/// constraints go into the `WHERE` clause, so conditions may connect any
/// pair of aliases regardless of join order. The optional existential
/// occurrence becomes a `SEMI LEFT JOIN`, which keeps the count bounded by
/// the outer combination count.
fn render_join_count(spec: &JoinCountSpec) -> String {
    let mut from = String::new();
    for (idx, table_ref) in spec.tables.iter().enumerate() {
        if idx > 0 {
            from.push_str(" CROSS JOIN ");
        }
        from.push_str(&format!("{} AS {}", table_ref.table, table_ref.alias));
    }

    if let Some(semi) = &spec.semi_join {
        let on: Vec<String> = semi.conditions.iter().map(render_condition).collect();
        from.push_str(&format!(
            " SEMI LEFT JOIN {} AS {} ON {}",
            semi.table.table,
            semi.table.alias,
            on.join(" AND ")
        ));
    }

    let mut sql = format!("SELECT count() AS cnt FROM {}", from);
    if !spec.conditions.is_empty() {
        let predicates: Vec<String> = spec.conditions.iter().map(render_condition).collect();
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    sql
}
