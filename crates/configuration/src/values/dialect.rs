use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The SQL dialect queries are translated to.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    /// BigQuery has no case-insensitive `LIKE`.
    #[value(name = "bigquery")]
    BigQuery,
}
