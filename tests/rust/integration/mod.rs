//! End-to-end discovery over an in-memory database fixture.
//!
//! The fixture implements [`DatabaseInspector`] directly: introspection
//! reads its table definitions and `join_count` evaluates the structured
//! count specs with nested loops, so the full pipeline — compatibility,
//! graph construction, traversal, metrics — runs without a ClickHouse
//! instance.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures_util::StreamExt;

use tgdmine::database::{
    ColumnInfo, DatabaseError, DatabaseInspector, JoinCondition, JoinCountSpec,
};
use tgdmine::discovery::{DiscoveryEngine, DiscoveryOptions};
use tgdmine::rules::TgdRule;

struct FixtureTable {
    name: String,
    columns: Vec<(String, String)>,
    rows: Vec<Vec<String>>,
}

struct FixtureDb {
    tables: Vec<FixtureTable>,
}

impl FixtureDb {
    fn table(&self, name: &str) -> &FixtureTable {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .unwrap_or_else(|| panic!("fixture has no table {}", name))
    }

    fn column_index(&self, table: &str, column: &str) -> usize {
        self.table(table)
            .columns
            .iter()
            .position(|(name, _)| name == column)
            .unwrap_or_else(|| panic!("fixture table {} has no column {}", table, column))
    }

    fn conditions_hold(
        &self,
        conditions: &[JoinCondition],
        binding: &HashMap<&str, (&str, &Vec<String>)>,
    ) -> bool {
        conditions.iter().all(|c| {
            let (lt, lrow) = binding[c.left_alias.as_str()];
            let (rt, rrow) = binding[c.right_alias.as_str()];
            lrow[self.column_index(lt, &c.left_column)] == rrow[self.column_index(rt, &c.right_column)]
        })
    }
}

#[async_trait]
impl DatabaseInspector for FixtureDb {
    async fn table_names(&self) -> Result<Vec<String>, DatabaseError> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>, DatabaseError> {
        Ok(self
            .table(table)
            .columns
            .iter()
            .map(|(name, data_type)| ColumnInfo {
                name: name.clone(),
                data_type: data_type.clone(),
            })
            .collect())
    }

    async fn row_count(&self, table: &str) -> Result<u64, DatabaseError> {
        Ok(self.table(table).rows.len() as u64)
    }

    async fn count_distinct(&self, table: &str, column: &str) -> Result<u64, DatabaseError> {
        let idx = self.column_index(table, column);
        let distinct: HashSet<&String> = self.table(table).rows.iter().map(|r| &r[idx]).collect();
        Ok(distinct.len() as u64)
    }

    async fn shared_values(
        &self,
        left_table: &str,
        left_column: &str,
        right_table: &str,
        right_column: &str,
    ) -> Result<u64, DatabaseError> {
        let li = self.column_index(left_table, left_column);
        let ri = self.column_index(right_table, right_column);
        let left: HashSet<&String> = self.table(left_table).rows.iter().map(|r| &r[li]).collect();
        let right: HashSet<&String> = self.table(right_table).rows.iter().map(|r| &r[ri]).collect();
        Ok(left.intersection(&right).count() as u64)
    }

    async fn join_count(&self, spec: &JoinCountSpec) -> Result<u64, DatabaseError> {
        let outer: Vec<(&str, &str, &FixtureTable)> = spec
            .tables
            .iter()
            .map(|tr| (tr.alias.as_str(), tr.table.as_str(), self.table(&tr.table)))
            .collect();
        if outer.is_empty() {
            return Ok(0);
        }

        let mut count = 0u64;
        let mut indices = vec![0usize; outer.len()];
        loop {
            let mut binding: HashMap<&str, (&str, &Vec<String>)> = HashMap::new();
            let mut in_range = true;
            for (slot, &(alias, table_name, table)) in outer.iter().enumerate() {
                if indices[slot] >= table.rows.len() {
                    in_range = false;
                    break;
                }
                binding.insert(alias, (table_name, &table.rows[indices[slot]]));
            }

            if in_range && self.conditions_hold(&spec.conditions, &binding) {
                let satisfied = match &spec.semi_join {
                    None => true,
                    Some(semi) => {
                        let head = self.table(&semi.table.table);
                        head.rows.iter().any(|row| {
                            let mut with_head = binding.clone();
                            with_head.insert(semi.table.alias.as_str(), (semi.table.table.as_str(), row));
                            self.conditions_hold(&semi.conditions, &with_head)
                        })
                    }
                };
                if satisfied {
                    count += 1;
                }
            }

            // odometer over the outer row combination
            let mut slot = 0;
            loop {
                if slot == outer.len() {
                    return Ok(count);
                }
                indices[slot] += 1;
                if indices[slot] < outer[slot].2.rows.len().max(1) {
                    break;
                }
                indices[slot] = 0;
                slot += 1;
            }
        }
    }
}

/// `a(id, name)` and `b(id, value)`, joinable on `id`, with
/// `matching` of `a`'s 100 ids present in `b`.
fn two_table_fixture(matching: usize) -> FixtureDb {
    let a_rows = (0..100)
        .map(|i| vec![i.to_string(), format!("n{}", i)])
        .collect();
    let b_rows = (0..matching)
        .map(|i| vec![i.to_string(), format!("v{}", i)])
        .collect();
    FixtureDb {
        tables: vec![
            FixtureTable {
                name: "a".to_string(),
                columns: vec![
                    ("id".to_string(), "UInt64".to_string()),
                    ("name".to_string(), "String".to_string()),
                ],
                rows: a_rows,
            },
            FixtureTable {
                name: "b".to_string(),
                columns: vec![
                    ("id".to_string(), "UInt64".to_string()),
                    ("value".to_string(), "String".to_string()),
                ],
                rows: b_rows,
            },
        ],
    }
}

async fn discover(
    db: FixtureDb,
    algorithm: &str,
    max_table: usize,
    max_vars: usize,
) -> Vec<TgdRule> {
    let engine = DiscoveryEngine::initialize(db, &DiscoveryOptions::default())
        .await
        .expect("engine initialization");
    let stream = engine
        .discover_rules(algorithm, max_table, max_vars, None)
        .expect("known algorithm");
    let items: Vec<_> = Box::pin(stream).collect().await;
    items
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("no database errors over the fixture")
}

#[tokio::test]
async fn fully_joinable_tables_yield_a_certain_rule() {
    let rules = discover(two_table_fixture(100), "dfs", 2, 2).await;
    assert_eq!(rules.len(), 1);

    let rule = &rules[0];
    assert_eq!(rule.confidence, 1.0);
    assert_eq!(rule.accuracy, 1.0);
    assert_eq!(rule.display, "∀ x0: a_0(id=x0) ⇒ b_0(id=x0)");
    assert_eq!(rule.body[0].table, "a");
    assert_eq!(rule.head[0].table, "b");
}

#[tokio::test]
async fn partial_match_lowers_confidence_to_the_matched_fraction() {
    let rules = discover(two_table_fixture(80), "dfs", 2, 2).await;
    assert_eq!(rules.len(), 1);

    let rule = &rules[0];
    assert!((rule.confidence - 0.80).abs() < 1e-9);
    // Derived from the same tuple counts: (100 - 100 + 80) / 100.
    assert!((rule.accuracy - 0.80).abs() < 1e-9);
}

#[tokio::test]
async fn all_strategies_emit_the_same_rules_end_to_end() {
    let dfs = discover(two_table_fixture(80), "dfs", 2, 2).await;
    let bfs = discover(two_table_fixture(80), "bfs", 2, 2).await;
    let astar = discover(two_table_fixture(80), "astar", 2, 2).await;

    let displays = |rules: &[TgdRule]| {
        rules
            .iter()
            .map(|r| r.display.clone())
            .collect::<HashSet<_>>()
    };
    assert_eq!(displays(&dfs), displays(&bfs));
    assert_eq!(displays(&dfs), displays(&astar));
}

#[tokio::test]
async fn metrics_stay_within_bounds() {
    let rules = discover(two_table_fixture(80), "bfs", 3, 3).await;
    assert!(!rules.is_empty());
    for rule in &rules {
        assert!((0.0..=1.0).contains(&rule.confidence), "{}", rule.display);
        assert!((0.0..=1.0).contains(&rule.accuracy), "{}", rule.display);
    }
}

#[tokio::test]
async fn unknown_algorithm_fails_fast() {
    let engine = DiscoveryEngine::initialize(two_table_fixture(100), &DiscoveryOptions::default())
        .await
        .expect("engine initialization");
    assert!(engine.discover_rules("dijkstra", 2, 2, None).is_err());
}

#[tokio::test]
async fn rules_serialize_for_the_persistence_layer() {
    let rules = discover(two_table_fixture(100), "dfs", 2, 2).await;
    let json = serde_json::to_string(&rules[0]).expect("serializable rule");
    assert!(json.contains("\"confidence\":1.0"));
    assert!(json.contains("\"display\""));
}
