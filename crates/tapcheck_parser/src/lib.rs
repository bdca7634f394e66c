//! Parser for tapcheck run configurations and schema files (YAML/TOML formats).
//!
//! Both document kinds share the same format detection: `.yaml`/`.yml` files
//! are parsed as YAML, `.toml` files as TOML. Loaded documents are checked
//! before they are returned, so a [`RunConfig`] from [`load_config`] is ready
//! for a run and a [`Schema`] from [`load_schema`] is well formed.
//!
//! # Example
//!
//! ```rust
//! use tapcheck_parser::parse_config_yaml;
//!
//! let yaml = r#"
//! label: firebase_db
//! sources:
//!   - name: water_prod
//!     environment: prod
//!     location:
//!       type: file
//!       path: data/water_prod.json
//! "#;
//!
//! let config = parse_config_yaml(yaml).expect("Failed to parse config");
//! assert_eq!(config.sources.len(), 1);
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tapcheck_core::{ConfigError, RunConfig, Schema, SchemaError};
use thiserror::Error;

/// Errors that can occur while reading configuration or schema files.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Configuration parsed but cannot be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Schema parsed but is malformed
    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Detect the document format from a file path based on its extension.
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

fn parse_str<T: DeserializeOwned>(content: &str, format: DocumentFormat) -> Result<T> {
    match format {
        DocumentFormat::Yaml => Ok(serde_yaml_ng::from_str(content)?),
        DocumentFormat::Toml => {
            toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
        }
    }
}

fn parse_path<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}

/// Parse a run configuration from a YAML string.
pub fn parse_config_yaml(content: &str) -> Result<RunConfig> {
    parse_str(content, DocumentFormat::Yaml)
}

/// Parse a run configuration from a TOML string.
pub fn parse_config_toml(content: &str) -> Result<RunConfig> {
    parse_str(content, DocumentFormat::Toml)
}

/// Load and check a run configuration file.
///
/// # Errors
///
/// Fails on I/O errors, unknown extensions, malformed documents and
/// configurations rejected by [`RunConfig::validate`].
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let config: RunConfig = parse_path(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse a schema from a YAML string.
pub fn parse_schema_yaml(content: &str) -> Result<Schema> {
    parse_str(content, DocumentFormat::Yaml)
}

/// Parse a schema from a TOML string.
pub fn parse_schema_toml(content: &str) -> Result<Schema> {
    parse_str(content, DocumentFormat::Toml)
}

/// Load and check a schema file.
///
/// # Errors
///
/// Fails on I/O errors, unknown extensions, malformed documents and
/// schemas rejected by [`Schema::check_definition`].
pub fn load_schema(path: &Path) -> Result<Schema> {
    let schema: Schema = parse_path(path)?;
    schema.check_definition()?;
    Ok(schema)
}

/// Serialize a document in the given format.
///
/// # Errors
///
/// Returns the serializer's error for values it cannot represent.
pub fn render<T: Serialize>(value: &T, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Yaml => Ok(serde_yaml_ng::to_string(value)?),
        DocumentFormat::Toml => {
            toml::to_string_pretty(value).map_err(|e| ParserError::TomlError(e.to_string()))
        }
    }
}
