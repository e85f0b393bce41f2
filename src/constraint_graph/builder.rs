//! Constraint-graph construction.
//!
//! Compatibility testing happens once per unordered attribute pair; each
//! compatible pair is then expanded into JIAs for every valid combination
//! of table occurrence indices up to the configured occurrence budget.

use std::collections::HashSet;

use log::{debug, info};

use crate::attribute_model::{generate_attributes, is_compatible, Attribute};
use crate::database::DatabaseInspector;

use super::errors::GraphBuildError;
use super::{AttributeMapper, ConstraintGraph, IndexedAttribute, JoinableIndexedAttributes};

pub struct GraphBuilder {
    max_nb_occurrence: usize,
    min_domain_overlap: f64,
}

/// Flat attribute reference at the schema level (before occurrence lifting).
struct SchemaAttribute {
    table_index: usize,
    attribute_index: usize,
}

impl GraphBuilder {
    pub fn new(max_nb_occurrence: usize, min_domain_overlap: f64) -> Self {
        Self {
            max_nb_occurrence,
            min_domain_overlap,
        }
    }

    /// Introspect the schema, certify compatible attribute pairs and lift
    /// them into a constraint graph. One call per discovery run; any
    /// database error aborts the build.
    pub async fn build(
        &self,
        inspector: &dyn DatabaseInspector,
    ) -> Result<(ConstraintGraph, AttributeMapper), GraphBuildError> {
        let attributes = generate_attributes(inspector).await?;
        let (mapper, schema_refs) = self.index_attributes(&attributes);

        let mut compatible_pairs = Vec::new();
        for p in 0..attributes.len() {
            for q in (p + 1)..attributes.len() {
                if is_compatible(
                    &attributes[p],
                    &attributes[q],
                    inspector,
                    self.min_domain_overlap,
                )
                .await?
                {
                    compatible_pairs.push((p, q));
                }
            }
        }
        debug!("{} compatible attribute pairs", compatible_pairs.len());

        let nodes = self.lift_occurrences(&schema_refs, &compatible_pairs);
        info!(
            "constraint graph: {} nodes from {} compatible pairs",
            nodes.len(),
            compatible_pairs.len()
        );
        Ok((ConstraintGraph::new(nodes), mapper))
    }

    /// Assign table/attribute indices in first-appearance order.
    fn index_attributes(
        &self,
        attributes: &[Attribute],
    ) -> (AttributeMapper, Vec<SchemaAttribute>) {
        let mut tables: Vec<String> = Vec::new();
        let mut columns: Vec<Vec<String>> = Vec::new();
        let mut refs = Vec::with_capacity(attributes.len());

        for attribute in attributes {
            let table_index = match tables.iter().position(|t| *t == attribute.table) {
                Some(idx) => idx,
                None => {
                    tables.push(attribute.table.clone());
                    columns.push(Vec::new());
                    tables.len() - 1
                }
            };
            let attribute_index = columns[table_index].len();
            columns[table_index].push(attribute.column.clone());
            refs.push(SchemaAttribute {
                table_index,
                attribute_index,
            });
        }

        (AttributeMapper::new(tables, columns), refs)
    }

    /// Expand compatible pairs into JIAs over concrete table occurrences.
    ///
    /// The two ends of a JIA must lie on distinct occurrences; a
    /// same-occurrence pair would equate two columns of a single row, which
    /// is not a join constraint.
    fn lift_occurrences(
        &self,
        refs: &[SchemaAttribute],
        pairs: &[(usize, usize)],
    ) -> Vec<JoinableIndexedAttributes> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();

        for &(p, q) in pairs {
            let (a, b) = (&refs[p], &refs[q]);
            for j_a in 0..self.max_nb_occurrence {
                for j_b in 0..self.max_nb_occurrence {
                    if a.table_index == b.table_index && j_a == j_b {
                        continue;
                    }
                    let jia = JoinableIndexedAttributes::new(
                        IndexedAttribute {
                            table_index: a.table_index,
                            occurrence_index: j_a,
                            attribute_index: a.attribute_index,
                        },
                        IndexedAttribute {
                            table_index: b.table_index,
                            occurrence_index: j_b,
                            attribute_index: b.attribute_index,
                        },
                    );
                    if seen.insert(jia) {
                        nodes.push(jia);
                    }
                }
            }
        }

        nodes.sort();
        nodes
    }
}
