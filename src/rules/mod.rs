//! Rule materialization and quality metrics
//!
//! An accepted candidate (an ordered sequence of JIAs) becomes a
//! [`TgdRule`]: body and head predicates over named table occurrences,
//! plus confidence and accuracy computed from counting queries against the
//! database collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod errors;
mod materializer;

pub use errors::MetricsError;
pub use materializer::RuleMaterializer;

/// One `column = variable` binding inside a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateArg {
    pub column: String,
    /// Join variable id; rendered as `x{variable}`.
    pub variable: usize,
}

/// An atom over one table occurrence, e.g. `bupa_0(arg2=x0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub table: String,
    pub occurrence: usize,
    pub args: Vec<PredicateArg>,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}(", self.table, self.occurrence)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}=x{}", arg.column, arg.variable)?;
        }
        write!(f, ")")
    }
}

/// A discovered tuple-generating dependency. Immutable once created;
/// handed off to the external persistence layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TgdRule {
    pub body: Vec<Predicate>,
    pub head: Vec<Predicate>,
    /// Fraction of body-satisfying tuple combinations that also satisfy
    /// the head.
    pub confidence: f64,
    /// Fraction of all tuple combinations for which the implication holds,
    /// counting vacuous satisfaction.
    pub accuracy: f64,
    pub display: String,
}

/// Render the logical form, e.g.
/// `∀ x0: bupa_0(arg2=x0) ⇒ bupa_type_0(arg1=x0)`.
pub(crate) fn render_display(body: &[Predicate], head: &[Predicate], variables: usize) -> String {
    let vars: Vec<String> = (0..variables).map(|v| format!("x{}", v)).collect();
    let body_atoms: Vec<String> = body.iter().map(|p| p.to_string()).collect();
    let head_atoms: Vec<String> = head.iter().map(|p| p.to_string()).collect();
    format!(
        "∀ {}: {} ⇒ {}",
        vars.join(", "),
        body_atoms.join(" ∧ "),
        head_atoms.join(" ∧ ")
    )
}
