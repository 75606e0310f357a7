//! Configuration for the query engine.

use std::sync::Arc;

use query_engine_metadata::metadata;
use schemars::schema::RootSchema;

use crate::error::MakeRuntimeConfigurationError;
use crate::values::{Dialect, NegationStrategy};
use crate::version1::ParsedConfiguration;

/// The 'Configuration' type collects all the information necessary to translate queries at
/// runtime.
///
/// 'ParsedConfiguration' is the serialized format, and is responsible for interpreting itself
/// into the current 'Configuration'. Values of this type are produced from a
/// 'ParsedConfiguration' using 'make_runtime_configuration'.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub metadata: Arc<metadata::Metadata>,
    pub dialect: Dialect,
    pub negation_strategy: NegationStrategy,
}

/// Check the parsed configuration and turn it into its runtime form.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    for (entity, info) in &parsed_config.metadata.entities.0 {
        if info.table_name.is_empty() {
            return Err(MakeRuntimeConfigurationError::MissingTableName {
                entity: entity.clone(),
            });
        }
        if info.attributes.is_empty() {
            return Err(MakeRuntimeConfigurationError::NoAttributes {
                entity: entity.clone(),
            });
        }
        if let Some((attribute, _)) = info
            .attributes
            .iter()
            .find(|(_, attribute)| attribute.column_name.is_empty())
        {
            return Err(MakeRuntimeConfigurationError::MissingColumnName {
                entity: entity.clone(),
                attribute: attribute.clone(),
            });
        }
    }

    Ok(Configuration {
        metadata: Arc::new(parsed_config.metadata),
        dialect: parsed_config.dialect,
        negation_strategy: parsed_config.negation_strategy,
    })
}

/// The jsonschema of the current configuration format.
pub fn generate_latest_schema() -> RootSchema {
    schemars::schema_for!(ParsedConfiguration)
}
