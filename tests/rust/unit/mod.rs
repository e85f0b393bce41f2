//! Traversal property tests over a fixed synthetic constraint graph.
//!
//! These cover the engine-level guarantees every strategy must uphold:
//! acyclicity, connectivity, bound enforcement, occurrence contiguity and
//! set-equivalence of the three strategies.

use std::collections::{HashMap, HashSet};

use tgdmine::constraint_graph::{
    AttributeMapper, ConstraintGraph, IndexedAttribute, JoinableIndexedAttributes,
};
use tgdmine::database::TableStatistics;
use tgdmine::heuristics;
use tgdmine::traversal::{
    strategy_for_name, CandidateRule, SearchContext, SearchLimits,
};

fn ia(i: usize, j: usize, k: usize) -> IndexedAttribute {
    IndexedAttribute {
        table_index: i,
        occurrence_index: j,
        attribute_index: k,
    }
}

fn jia(a: (usize, usize, usize), b: (usize, usize, usize)) -> JoinableIndexedAttributes {
    JoinableIndexedAttributes::new(ia(a.0, a.1, a.2), ia(b.0, b.1, b.2))
}

/// Four tables a, b, c, d joined in a diamond plus one self-join pair on a:
///
/// 0: a0.x ~ b0.x    1: b0.y ~ c0.y    2: a0.x ~ c0.z
/// 3: c0.z ~ d0.z    4: a0.w ~ a1.w
fn fixture() -> (ConstraintGraph, AttributeMapper, TableStatistics) {
    let graph = ConstraintGraph::new(vec![
        jia((0, 0, 0), (1, 0, 0)),
        jia((1, 0, 1), (2, 0, 0)),
        jia((0, 0, 0), (2, 0, 1)),
        jia((2, 0, 1), (3, 0, 0)),
        jia((0, 0, 1), (0, 1, 1)),
    ]);
    let mapper = AttributeMapper::new(
        vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "d".to_string(),
        ],
        vec![
            vec!["x".to_string(), "w".to_string()],
            vec!["x".to_string(), "y".to_string()],
            vec!["y".to_string(), "z".to_string()],
            vec!["z".to_string()],
        ],
    );
    let statistics = TableStatistics::from_counts(vec![
        ("a".to_string(), 100),
        ("b".to_string(), 200),
        ("c".to_string(), 50),
        ("d".to_string(), 1_000),
    ]);
    (graph, mapper, statistics)
}

fn collect(
    algorithm: &str,
    graph: &ConstraintGraph,
    mapper: &AttributeMapper,
    statistics: &TableStatistics,
    max_table: usize,
    max_vars: usize,
) -> Vec<CandidateRule> {
    let strategy = strategy_for_name(algorithm, heuristics::hybrid).expect("known algorithm");
    let ctx = SearchContext {
        graph,
        limits: SearchLimits {
            max_table,
            max_vars,
        },
        mapper,
        statistics,
    };
    strategy.search(ctx).collect()
}

/// Order-insensitive rule identity: the set of JIA node ids.
fn as_sets(rules: &[CandidateRule]) -> HashSet<Vec<usize>> {
    rules
        .iter()
        .map(|r| {
            let mut ids = r.node_ids().to_vec();
            ids.sort_unstable();
            ids
        })
        .collect()
}

#[test]
fn no_candidate_repeats_a_jia() {
    let (graph, mapper, statistics) = fixture();
    for algorithm in ["dfs", "bfs", "astar"] {
        for rule in collect(algorithm, &graph, &mapper, &statistics, 4, 4) {
            let unique: HashSet<usize> = rule.node_ids().iter().copied().collect();
            assert_eq!(unique.len(), rule.len(), "{} repeated a JIA", algorithm);
        }
    }
}

#[test]
fn every_multi_jia_candidate_is_connected() {
    let (graph, mapper, statistics) = fixture();
    for algorithm in ["dfs", "bfs", "astar"] {
        for rule in collect(algorithm, &graph, &mapper, &statistics, 4, 4) {
            if rule.len() < 2 {
                continue;
            }
            // Union-walk the candidate's own shared-occurrence graph.
            let ids = rule.node_ids();
            let mut reached: HashSet<usize> = [ids[0]].into_iter().collect();
            let mut grew = true;
            while grew {
                grew = false;
                for &id in ids {
                    if reached.contains(&id) {
                        continue;
                    }
                    if reached
                        .iter()
                        .any(|&r| graph.node(r).is_connected(graph.node(id)))
                    {
                        reached.insert(id);
                        grew = true;
                    }
                }
            }
            assert_eq!(reached.len(), ids.len(), "{} yielded a disconnected rule", algorithm);
        }
    }
}

#[test]
fn bounds_are_respected() {
    let (graph, mapper, statistics) = fixture();
    for algorithm in ["dfs", "bfs", "astar"] {
        for rule in collect(algorithm, &graph, &mapper, &statistics, 3, 2) {
            assert!(rule.len() <= 2);
            assert!(rule.table_occurrences(&graph).len() <= 3);
        }
    }
}

#[test]
fn occurrence_indices_stay_contiguous() {
    let (graph, mapper, statistics) = fixture();
    for algorithm in ["dfs", "bfs", "astar"] {
        for rule in collect(algorithm, &graph, &mapper, &statistics, 4, 4) {
            let mut per_table: HashMap<usize, HashSet<usize>> = HashMap::new();
            for occ in rule.table_occurrences(&graph) {
                per_table
                    .entry(occ.table_index)
                    .or_default()
                    .insert(occ.occurrence_index);
            }
            for indices in per_table.values() {
                for j in 0..indices.len() {
                    assert!(indices.contains(&j), "{} skipped occurrence {}", algorithm, j);
                }
            }
        }
    }
}

#[test]
fn all_strategies_yield_the_same_rule_set() {
    let (graph, mapper, statistics) = fixture();
    let dfs = collect("dfs", &graph, &mapper, &statistics, 4, 3);
    let bfs = collect("bfs", &graph, &mapper, &statistics, 4, 3);
    let astar = collect("astar", &graph, &mapper, &statistics, 4, 3);

    assert!(!dfs.is_empty());
    assert_eq!(as_sets(&dfs), as_sets(&bfs));
    assert_eq!(as_sets(&dfs), as_sets(&astar));
}

#[test]
fn strategy_equivalence_holds_for_every_heuristic() {
    let (graph, mapper, statistics) = fixture();
    let dfs = as_sets(&collect("dfs", &graph, &mapper, &statistics, 3, 2));
    let all: [tgdmine::heuristics::HeuristicFn; 4] = [
        heuristics::naive,
        heuristics::table_size,
        heuristics::join_selectivity,
        heuristics::hybrid,
    ];
    for heuristic in all {
        let strategy = strategy_for_name("astar", heuristic).expect("astar resolves");
        let ctx = SearchContext {
            graph: &graph,
            limits: SearchLimits {
                max_table: 3,
                max_vars: 2,
            },
            mapper: &mapper,
            statistics: &statistics,
        };
        let rules: Vec<CandidateRule> = strategy.search(ctx).collect();
        assert_eq!(as_sets(&rules), dfs);
    }
}

#[test]
fn bfs_yields_short_rules_before_long_ones() {
    let (graph, mapper, statistics) = fixture();
    let rules = collect("bfs", &graph, &mapper, &statistics, 4, 3);
    let lengths: Vec<usize> = rules.iter().map(|r| r.len()).collect();
    let mut sorted = lengths.clone();
    sorted.sort_unstable();
    assert_eq!(lengths, sorted);
}
