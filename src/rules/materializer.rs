//! Candidate-to-rule conversion and metric computation.

use std::collections::HashMap;

use log::debug;

use crate::constraint_graph::{AttributeMapper, ConstraintGraph, TableOccurrence};
use crate::database::{
    DatabaseInspector, JoinCondition, JoinCountSpec, SemiJoin, TableRef, TableStatistics,
};
use crate::traversal::CandidateRule;

use super::errors::MetricsError;
use super::{render_display, Predicate, PredicateArg, TgdRule};

/// Turns accepted candidates into [`TgdRule`]s.
///
/// The head is the table occurrence reached last along the traversal path;
/// every other occurrence contributes a body predicate. Confidence is
/// conditioned on the body alone: a candidate whose body is never
/// satisfied is skipped, not emitted with a sentinel value.
pub struct RuleMaterializer<'a> {
    graph: &'a ConstraintGraph,
    mapper: &'a AttributeMapper,
    statistics: &'a TableStatistics,
    inspector: &'a dyn DatabaseInspector,
    min_confidence: f64,
}

impl<'a> RuleMaterializer<'a> {
    pub fn new(
        graph: &'a ConstraintGraph,
        mapper: &'a AttributeMapper,
        statistics: &'a TableStatistics,
        inspector: &'a dyn DatabaseInspector,
        min_confidence: f64,
    ) -> Self {
        Self {
            graph,
            mapper,
            statistics,
            inspector,
            min_confidence,
        }
    }

    pub async fn materialize(
        &self,
        candidate: &CandidateRule,
    ) -> Result<Option<TgdRule>, MetricsError> {
        if candidate.is_empty() {
            return Ok(None);
        }

        // Table occurrences in first-appearance order along the path; the
        // last one reached becomes the head.
        let mut occurrence_order: Vec<TableOccurrence> = Vec::new();
        for jia in candidate.jias(self.graph) {
            for end in [jia.left, jia.right] {
                if !occurrence_order.contains(&end.occurrence()) {
                    occurrence_order.push(end.occurrence());
                }
            }
        }
        let head_occurrence = *occurrence_order
            .last()
            .expect("candidate has at least one JIA");

        let mut args: HashMap<TableOccurrence, Vec<PredicateArg>> = HashMap::new();
        for (variable, jia) in candidate.jias(self.graph).enumerate() {
            for end in [jia.left, jia.right] {
                args.entry(end.occurrence()).or_default().push(PredicateArg {
                    column: self
                        .mapper
                        .column_name(end.table_index, end.attribute_index)
                        .to_string(),
                    variable,
                });
            }
        }

        let predicate_for = |occ: TableOccurrence| Predicate {
            table: self.mapper.table_name(occ.table_index).to_string(),
            occurrence: occ.occurrence_index,
            args: args.get(&occ).cloned().unwrap_or_default(),
        };
        let body: Vec<Predicate> = occurrence_order
            .iter()
            .filter(|occ| **occ != head_occurrence)
            .map(|occ| predicate_for(*occ))
            .collect();
        let head = vec![predicate_for(head_occurrence)];

        let (body_count, satisfied_count) = self.count_tuples(candidate, head_occurrence).await?;
        if body_count == 0 {
            debug!("skipping rule with unsatisfiable body");
            return Ok(None);
        }

        let confidence = satisfied_count as f64 / body_count as f64;
        if confidence < self.min_confidence {
            debug!(
                "skipping rule below confidence threshold ({:.3} < {:.3})",
                confidence, self.min_confidence
            );
            return Ok(None);
        }

        // Tuples that never satisfy the body hold vacuously, so accuracy is
        // measured over the full cross product of the body occurrences.
        let mut universe = 1.0f64;
        for occ in occurrence_order.iter().filter(|occ| **occ != head_occurrence) {
            universe *= self
                .statistics
                .row_count_or_penalty(self.mapper.table_name(occ.table_index));
        }
        if universe <= 0.0 {
            debug!("skipping rule over an empty tuple universe");
            return Ok(None);
        }
        let accuracy =
            ((universe - body_count as f64 + satisfied_count as f64) / universe).clamp(0.0, 1.0);

        let display = render_display(&body, &head, candidate.len());
        Ok(Some(TgdRule {
            body,
            head,
            confidence,
            accuracy,
            display,
        }))
    }

    /// Issue the two counting queries: body combinations, then body
    /// combinations with at least one matching head row.
    async fn count_tuples(
        &self,
        candidate: &CandidateRule,
        head_occurrence: TableOccurrence,
    ) -> Result<(u64, u64), MetricsError> {
        let table_ref = |occ: TableOccurrence| TableRef {
            table: self.mapper.table_name(occ.table_index).to_string(),
            alias: self.mapper.occurrence_name(occ),
        };

        let mut body_tables: Vec<TableRef> = Vec::new();
        let mut seen: Vec<TableOccurrence> = Vec::new();
        for jia in candidate.jias(self.graph) {
            for end in [jia.left, jia.right] {
                let occ = end.occurrence();
                if occ != head_occurrence && !seen.contains(&occ) {
                    seen.push(occ);
                    body_tables.push(table_ref(occ));
                }
            }
        }

        let mut body_conditions = Vec::new();
        let mut head_conditions = Vec::new();
        for jia in candidate.jias(self.graph) {
            let (left, right) = (jia.left, jia.right);
            let column = |end: crate::constraint_graph::IndexedAttribute| {
                self.mapper
                    .column_name(end.table_index, end.attribute_index)
                    .to_string()
            };
            if left.occurrence() == head_occurrence || right.occurrence() == head_occurrence {
                // Orient so the head alias sits on the right.
                let (outer, inner) = if right.occurrence() == head_occurrence {
                    (left, right)
                } else {
                    (right, left)
                };
                head_conditions.push(JoinCondition {
                    left_alias: self.mapper.occurrence_name(outer.occurrence()),
                    left_column: column(outer),
                    right_alias: self.mapper.occurrence_name(inner.occurrence()),
                    right_column: column(inner),
                });
            } else {
                body_conditions.push(JoinCondition {
                    left_alias: self.mapper.occurrence_name(left.occurrence()),
                    left_column: column(left),
                    right_alias: self.mapper.occurrence_name(right.occurrence()),
                    right_column: column(right),
                });
            }
        }

        let body_spec = JoinCountSpec {
            tables: body_tables.clone(),
            conditions: body_conditions.clone(),
            semi_join: None,
        };
        let body_count = self.inspector.join_count(&body_spec).await?;

        let satisfied_spec = JoinCountSpec {
            tables: body_tables,
            conditions: body_conditions,
            semi_join: Some(SemiJoin {
                table: table_ref(head_occurrence),
                conditions: head_conditions,
            }),
        };
        let satisfied_count = self.inspector.join_count(&satisfied_spec).await?;

        Ok((body_count, satisfied_count))
    }
}
