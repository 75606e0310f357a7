//! Errors raised while building a query tree.

use query_engine_metadata::metadata::ComparisonOperator;
use thiserror::Error;

/// A node was asked to be built from operands of the wrong shape.
/// These are reported by the builder and never deferred to later phases.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("operator {0} requires a list of values on its right-hand side")]
    ListRequired(ComparisonOperator),
    #[error("operator {0} does not accept a list of values on its right-hand side")]
    UnexpectedList(ComparisonOperator),
    #[error("a list of values is not allowed {0}")]
    ListNotAllowed(&'static str),
    #[error("a list expression requires at least one element")]
    EmptyList,
    #[error("a junction requires at least one predicate")]
    EmptyJunction,
    #[error("the float {0} cannot be written as a literal")]
    NonFiniteFloat(f64),
}
