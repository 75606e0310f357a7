//! Internal Configuration and state for our query engine.

use std::path::Path;

use query_engine_metadata::metadata;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::configuration::generate_latest_schema;
use crate::error::{ParseConfigurationError, WriteParsedConfigurationError};
use crate::values::{Dialect, NegationStrategy};

pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";

/// The configuration as written on disk: how to translate queries, and the
/// entities they can be written against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Jsonschema of the configuration format.
    #[serde(rename = "$schema")]
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    // Which version of the configuration format are we using
    pub version: Version,
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub negation_strategy: NegationStrategy,
    #[serde(default)]
    pub metadata: metadata::Metadata,
}

impl ParsedConfiguration {
    pub fn initial() -> Self {
        ParsedConfiguration::empty()
    }

    pub fn empty() -> Self {
        Self {
            schema: Some(CONFIGURATION_JSONSCHEMA_FILENAME.to_string()),
            version: Version::This,
            dialect: Dialect::default(),
            negation_strategy: NegationStrategy::default(),
            metadata: metadata::Metadata::empty(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize, JsonSchema)]
pub enum Version {
    #[serde(rename = "1")]
    This,
}

/// Parse the configuration format from a directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_dir = configuration_dir.as_ref();
    if !fs::try_exists(configuration_dir).await? {
        return Err(ParseConfigurationError::MissingConfigurationDirectory(
            configuration_dir.to_owned(),
        ));
    }

    let configuration_file = configuration_dir.join(CONFIGURATION_FILENAME);

    let configuration_file_contents =
        fs::read_to_string(&configuration_file)
            .await
            .map_err(|err| {
                ParseConfigurationError::IoErrorButStringified(format!(
                    "{}: {}",
                    &configuration_file.display(),
                    err
                ))
            })?;

    let parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    tracing::debug!(
        entities = parsed_config.metadata.entities.0.len(),
        file = %configuration_file.display(),
        "parsed configuration"
    );

    Ok(parsed_config)
}

/// Write the parsed configuration into a directory on disk.
pub async fn write_parsed_configuration(
    parsed_config: ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(&parsed_config)
            .map_err(|e| WriteParsedConfigurationError::IoError(e.into()))?
            + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file_path = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    let output = generate_latest_schema();
    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&output)
            .map_err(|e| WriteParsedConfigurationError::IoError(e.into()))?
            + "\n",
    )
    .await?;

    Ok(())
}
