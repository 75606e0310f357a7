//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

use thiserror::Error;

/// The errors that can be thrown when parsing a configuration directory.
#[derive(Debug, Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {}:{line}:{column}: {message}", .file_path.display())]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("configuration directory {} does not exist", .0.display())]
    MissingConfigurationDirectory(PathBuf),

    #[error("I/O error: {0}")]
    IoErrorButStringified(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The errors that can be thrown when writing a configuration directory.
#[derive(Debug, Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The errors that can be thrown when a parsed configuration cannot be used at runtime.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("entity '{entity}' has no table name")]
    MissingTableName { entity: String },

    #[error("entity '{entity}' has no attributes")]
    NoAttributes { entity: String },

    #[error("attribute '{attribute}' of entity '{entity}' has no column name")]
    MissingColumnName { entity: String, attribute: String },
}
