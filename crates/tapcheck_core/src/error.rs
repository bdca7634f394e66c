//! Error types for schema and configuration definitions.
//!
//! Schema violations found in data are never errors at this level: they are
//! counted into a [`ValidationOutcome`](crate::ValidationOutcome). The types
//! here only cover definitions that cannot be used at all.

use thiserror::Error;

/// Errors raised by a malformed schema definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Schema declares no fields
    #[error("Schema '{0}' has no fields defined")]
    Empty(String),

    /// Two fields share a name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// A field name is empty or whitespace
    #[error("Field name cannot be blank")]
    BlankFieldName,
}

/// Errors raised by an invalid run configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No sources configured
    #[error("At least one source must be configured")]
    NoSources,

    /// Source name cannot be used in a file name
    #[error("Invalid source name '{0}': use letters, digits, '_' or '-'")]
    InvalidSourceName(String),

    /// Two sources share a name
    #[error("Duplicate source name: {0}")]
    DuplicateSource(String),

    /// Report label cannot be used in a file name
    #[error("Invalid report label '{0}': use letters, digits, '_' or '-'")]
    InvalidLabel(String),

    /// Key field is empty
    #[error("key_field cannot be empty")]
    EmptyKeyField,

    /// Requested source is not configured
    #[error("Unknown source: {0}")]
    UnknownSource(String),
}
