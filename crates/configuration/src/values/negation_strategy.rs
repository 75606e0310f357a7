use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How negated predicates are handed to the SQL translation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum NegationStrategy {
    /// Keep negations where they were written: `NOT (a AND b)`.
    #[default]
    Wrap,
    /// Push negations down to the leaves first: `(a <> x OR b <> y)`.
    Distribute,
}
