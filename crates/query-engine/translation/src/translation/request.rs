//! The shape of an incoming query request.
//!
//! A request names the entity to select from, the alias the predicate refers to it by,
//! and an optional predicate tree.

use query_engine_metadata::metadata::ComparisonOperator;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A query over a single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryRequest {
    pub entity: String,
    pub alias: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<Expression>,
}

/// A boolean expression restricting the rows of the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    And {
        expressions: Vec<Expression>,
    },
    Or {
        expressions: Vec<Expression>,
    },
    Not {
        expression: Box<Expression>,
    },
    BinaryComparison {
        left: ComparisonValue,
        operator: ComparisonOperator,
        right: ComparisonValue,
    },
    IsNull {
        value: ComparisonValue,
        #[serde(default)]
        negated: bool,
    },
    Between {
        value: ComparisonValue,
        lower: ComparisonValue,
        upper: ComparisonValue,
        #[serde(default)]
        negated: bool,
    },
}

/// An operand of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonValue {
    /// An attribute of the query root. The alias, when given, must be the root's.
    Column {
        name: String,
        #[serde(default)]
        #[serde(skip_serializing_if = "Option::is_none")]
        alias: Option<String>,
    },
    Scalar {
        value: serde_json::Value,
    },
    Parameter {
        parameter: ParameterReference,
    },
    /// Only valid on the right of `_in` and `_nin`.
    List {
        values: Vec<ComparisonValue>,
    },
}

/// A parameter supplied when the query is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParameterReference {
    Named(String),
    Positional(u32),
}
