//! Attribute model and join compatibility
//!
//! Columns become first-class [`Attribute`] values during schema
//! introspection. [`is_compatible`] decides which attribute pairs may serve
//! as equi-join constraints: declared types must be comparable and the two
//! value domains must overlap enough to make a join worth exploring.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::database::{DatabaseError, DatabaseInspector};

/// Simplified column type derived from an engine type string.
///
/// Widths are collapsed: every integer type compares with every other
/// integer or float, all string flavors compare with each other. Types the
/// model does not recognize only compare with themselves by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Text,
    Date,
    DateTime,
    Bool,
    Other(String),
}

impl DataType {
    /// Parse a ClickHouse type string, unwrapping `Nullable(...)` and
    /// `LowCardinality(...)` modifiers.
    pub fn parse(raw: &str) -> Self {
        let inner = unwrap_modifiers(raw.trim());
        if inner.starts_with("Int") || inner.starts_with("UInt") {
            DataType::Integer
        } else if inner.starts_with("Float") || inner.starts_with("Decimal") {
            DataType::Float
        } else if inner == "String" || inner.starts_with("FixedString") {
            DataType::Text
        } else if inner.starts_with("DateTime") {
            DataType::DateTime
        } else if inner.starts_with("Date") {
            DataType::Date
        } else if inner == "Bool" {
            DataType::Bool
        } else {
            DataType::Other(inner.to_string())
        }
    }

    /// Whether values of the two types can be meaningfully equated.
    pub fn comparable(&self, other: &DataType) -> bool {
        use DataType::*;
        match (self, other) {
            (Integer, Integer) | (Float, Float) | (Integer, Float) | (Float, Integer) => true,
            (Text, Text) | (Bool, Bool) => true,
            (Date, Date) | (DateTime, DateTime) | (Date, DateTime) | (DateTime, Date) => true,
            (Other(a), Other(b)) => a == b,
            _ => false,
        }
    }
}

fn unwrap_modifiers(raw: &str) -> &str {
    let mut inner = raw;
    loop {
        let stripped = ["Nullable(", "LowCardinality("]
            .iter()
            .find_map(|prefix| inner.strip_prefix(prefix));
        match stripped {
            Some(rest) => inner = rest.strip_suffix(')').unwrap_or(rest),
            None => return inner,
        }
    }
}

/// A column of the target schema, immutable after generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub table: String,
    pub column: String,
    pub data_type: DataType,
}

/// Enumerate every `(table, column)` attribute in the target schema,
/// ordered by table name and column position.
pub async fn generate_attributes(
    inspector: &dyn DatabaseInspector,
) -> Result<Vec<Attribute>, DatabaseError> {
    let mut attributes = Vec::new();
    for table in inspector.table_names().await? {
        for column in inspector.columns(&table).await? {
            attributes.push(Attribute {
                table: table.clone(),
                column: column.name,
                data_type: DataType::parse(&column.data_type),
            });
        }
    }
    debug!("generated {} attributes", attributes.len());
    Ok(attributes)
}

/// Decide whether two attributes may serve as an equi-join constraint.
///
/// Rejects the trivial same-table+same-column pair and incomparable types
/// without touching the database; otherwise measures value-domain overlap
/// as `shared / min(distinct_left, distinct_right)` and compares it against
/// `min_domain_overlap`. Any database error propagates: the check fails
/// closed rather than certifying a pair it could not verify.
pub async fn is_compatible(
    a: &Attribute,
    b: &Attribute,
    inspector: &dyn DatabaseInspector,
    min_domain_overlap: f64,
) -> Result<bool, DatabaseError> {
    if a.table == b.table && a.column == b.column {
        return Ok(false);
    }
    if !a.data_type.comparable(&b.data_type) {
        return Ok(false);
    }

    let distinct_a = inspector.count_distinct(&a.table, &a.column).await?;
    let distinct_b = inspector.count_distinct(&b.table, &b.column).await?;
    let smaller = distinct_a.min(distinct_b);
    if smaller == 0 {
        return Ok(false);
    }

    let shared = inspector
        .shared_values(&a.table, &a.column, &b.table, &b.column)
        .await?;
    let overlap = shared as f64 / smaller as f64;
    debug!(
        "overlap {}.{} ~ {}.{}: {:.3}",
        a.table, a.column, b.table, b.column, overlap
    );
    Ok(overlap >= min_domain_overlap)
}
