//! Constraint graph over joinable indexed attribute pairs
//!
//! Nodes are [`JoinableIndexedAttributes`] (JIAs): compatible attribute
//! pairs lifted to concrete table occurrences so self-joins stay
//! distinguishable. Two nodes are adjacent iff they share a table
//! occurrence — adjacency never looks at attribute values, only occurrence
//! identity. The graph is built once per discovery run and is read-only
//! during traversal.

use serde::{Deserialize, Serialize};

mod builder;
pub mod errors;

pub use builder::GraphBuilder;
pub use errors::GraphBuildError;

/// One appearance of a table within a candidate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableOccurrence {
    pub table_index: usize,
    pub occurrence_index: usize,
}

/// An attribute reference carrying the `(table, occurrence, attribute)`
/// index triple, so the same table can appear several times in one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexedAttribute {
    pub table_index: usize,
    pub occurrence_index: usize,
    pub attribute_index: usize,
}

impl IndexedAttribute {
    pub fn occurrence(&self) -> TableOccurrence {
        TableOccurrence {
            table_index: self.table_index,
            occurrence_index: self.occurrence_index,
        }
    }
}

/// A compatible pair of indexed attributes usable as an equi-join
/// constraint; the atomic node of the constraint graph.
///
/// The pair is unordered in meaning but stored canonically
/// (`left <= right`) so two constructions of the same pair compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JoinableIndexedAttributes {
    pub left: IndexedAttribute,
    pub right: IndexedAttribute,
}

impl JoinableIndexedAttributes {
    /// Canonicalizing constructor: the smaller end (by index triple) always
    /// lands on `left`.
    pub fn new(a: IndexedAttribute, b: IndexedAttribute) -> Self {
        if a <= b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        }
    }

    /// The opposite end of the pair, or `None` if `given` is neither end.
    pub fn other_end(&self, given: &IndexedAttribute) -> Option<&IndexedAttribute> {
        if *given == self.left {
            Some(&self.right)
        } else if *given == self.right {
            Some(&self.left)
        } else {
            None
        }
    }

    pub fn occurrences(&self) -> [TableOccurrence; 2] {
        [self.left.occurrence(), self.right.occurrence()]
    }

    /// True iff the two pairs share a table occurrence.
    pub fn is_connected(&self, other: &JoinableIndexedAttributes) -> bool {
        let ours = self.occurrences();
        other.occurrences().iter().any(|occ| ours.contains(occ))
    }
}

/// Resolves table and attribute indices back to schema names.
#[derive(Debug, Clone)]
pub struct AttributeMapper {
    tables: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl AttributeMapper {
    pub fn new(tables: Vec<String>, columns: Vec<Vec<String>>) -> Self {
        debug_assert_eq!(tables.len(), columns.len());
        Self { tables, columns }
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn table_name(&self, table_index: usize) -> &str {
        &self.tables[table_index]
    }

    pub fn column_name(&self, table_index: usize, attribute_index: usize) -> &str {
        &self.columns[table_index][attribute_index]
    }

    /// Display/alias name of a table occurrence, e.g. `bupa_0`.
    pub fn occurrence_name(&self, occurrence: TableOccurrence) -> String {
        format!(
            "{}_{}",
            self.tables[occurrence.table_index], occurrence.occurrence_index
        )
    }
}

/// The searchable graph: JIA nodes plus shared-occurrence adjacency.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    nodes: Vec<JoinableIndexedAttributes>,
    adjacency: Vec<Vec<usize>>,
}

impl ConstraintGraph {
    /// Build adjacency from the node set. Quadratic, but the node count is
    /// bounded by compatible pairs times the occurrence budget.
    pub fn new(nodes: Vec<JoinableIndexedAttributes>) -> Self {
        let mut adjacency = vec![Vec::new(); nodes.len()];
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if nodes[i].is_connected(&nodes[j]) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }
        Self { nodes, adjacency }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: usize) -> &JoinableIndexedAttributes {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[JoinableIndexedAttributes] {
        &self.nodes
    }

    pub fn node_ids(&self) -> std::ops::Range<usize> {
        0..self.nodes.len()
    }

    pub fn neighbors(&self, id: usize) -> &[usize] {
        &self.adjacency[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ia(i: usize, j: usize, k: usize) -> IndexedAttribute {
        IndexedAttribute {
            table_index: i,
            occurrence_index: j,
            attribute_index: k,
        }
    }

    #[test]
    fn constructor_canonicalizes_end_order() {
        let a = ia(1, 0, 2);
        let b = ia(0, 0, 1);
        let jia = JoinableIndexedAttributes::new(a, b);
        assert_eq!(jia.left, b);
        assert_eq!(jia.right, a);
        assert_eq!(jia, JoinableIndexedAttributes::new(b, a));
    }

    #[test]
    fn other_end_resolves_both_directions() {
        let a = ia(0, 0, 1);
        let b = ia(1, 0, 2);
        let jia = JoinableIndexedAttributes::new(a, b);
        assert_eq!(jia.other_end(&a), Some(&b));
        assert_eq!(jia.other_end(&b), Some(&a));
        assert_eq!(jia.other_end(&ia(2, 0, 0)), None);
    }

    #[test]
    fn connectivity_is_shared_occurrence_only() {
        // a-b and b-c share occurrence b; a-b and c-d share nothing.
        let ab = JoinableIndexedAttributes::new(ia(0, 0, 0), ia(1, 0, 0));
        let bc = JoinableIndexedAttributes::new(ia(1, 0, 1), ia(2, 0, 0));
        let cd = JoinableIndexedAttributes::new(ia(2, 1, 0), ia(3, 0, 0));
        assert!(ab.is_connected(&bc));
        assert!(!ab.is_connected(&cd));
        // same table, different occurrence: not connected
        assert!(!bc.is_connected(&cd));
    }

    #[test]
    fn graph_adjacency_is_symmetric() {
        let ab = JoinableIndexedAttributes::new(ia(0, 0, 0), ia(1, 0, 0));
        let bc = JoinableIndexedAttributes::new(ia(1, 0, 1), ia(2, 0, 0));
        let cd = JoinableIndexedAttributes::new(ia(2, 1, 0), ia(3, 0, 0));
        let graph = ConstraintGraph::new(vec![ab, bc, cd]);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
        assert!(graph.neighbors(2).is_empty());
    }

    #[test]
    fn occurrence_name_appends_occurrence_index() {
        let mapper = AttributeMapper::new(
            vec!["bupa".to_string()],
            vec![vec!["arg1".to_string(), "arg2".to_string()]],
        );
        assert_eq!(
            mapper.occurrence_name(TableOccurrence {
                table_index: 0,
                occurrence_index: 1
            }),
            "bupa_1"
        );
        assert_eq!(mapper.column_name(0, 1), "arg2");
    }
}
