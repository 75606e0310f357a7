//! Errors for query translation.

use query_engine_metadata::metadata::{ComparisonOperator, ScalarType};
use query_engine_sql::sqm::ConstructionError;
use thiserror::Error;

/// A type for translation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Entity '{0}' not found.")]
    EntityNotFound(String),
    #[error("Attribute '{0}' not found in entity '{1}'.")]
    AttributeNotFound(String, String),
    #[error("Alias '{alias}' does not refer to the query root '{root}'.")]
    UnknownRootAlias { alias: String, root: String },
    #[error("Operator '{operator}' is not supported for type '{scalar_type}'.")]
    OperatorNotSupportedForType {
        operator: ComparisonOperator,
        scalar_type: ScalarType,
    },
    #[error("Value '{0}' is not compatible with type '{1}'.")]
    TypeMismatch(serde_json::Value, ScalarType),
    #[error("Queries containing {0} are not supported.")]
    NotSupported(String),
    #[error("Malformed query: {0}")]
    Construction(#[from] ConstructionError),
}
