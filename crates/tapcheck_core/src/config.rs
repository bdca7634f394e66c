//! Run configuration.
//!
//! A [`RunConfig`] names the sources to validate, where reports go, and which
//! columns feed the descriptive statistics. Every field has a default, so an
//! empty configuration file is valid and equivalent to [`RunConfig::default`].

use crate::{ConfigError, DEFAULT_KEY_FIELD};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

static FILE_SAFE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static pattern compiles"));

/// Deployment environment a source belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production
    Prod,
    /// Beta
    Beta,
    /// Test
    Test,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Prod => f.write_str("prod"),
            Environment::Beta => f.write_str("beta"),
            Environment::Test => f.write_str("test"),
        }
    }
}

/// Where a source's records come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceLocation {
    /// JSON snapshot on disk
    File {
        /// Path to the snapshot
        path: PathBuf,
    },

    /// Firebase Realtime Database over REST
    Firebase {
        /// Database URL (e.g., "https://example-default-rtdb.firebaseio.com")
        database_url: String,
        /// Reference path inside the database (e.g., "water")
        reference: String,
        /// Environment variable holding the auth token, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        auth_token_env: Option<String>,
        /// Request timeout in seconds
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_secs: Option<u64>,
    },
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::File { path } => write!(f, "file:{}", path.display()),
            SourceLocation::Firebase {
                database_url,
                reference,
                ..
            } => write!(f, "{}/{}", database_url.trim_end_matches('/'), reference),
        }
    }
}

/// A named source to validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source name, used in report file names (e.g., "water_prod")
    pub name: String,

    /// Environment the source belongs to
    pub environment: Environment,

    /// How to reach the source
    pub location: SourceLocation,
}

impl SourceConfig {
    /// Creates a file-backed source.
    pub fn file(
        name: impl Into<String>,
        environment: Environment,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            environment,
            location: SourceLocation::File { path: path.into() },
        }
    }
}

/// Which validator(s) to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Lazy batch validation over the filtered table
    #[default]
    Batch,
    /// Recursive per-record validation
    Row,
    /// Both; counts are reported per mode
    Both,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Batch => f.write_str("batch"),
            ValidationMode::Row => f.write_str("row"),
            ValidationMode::Both => f.write_str("both"),
        }
    }
}

/// Columns used for the descriptive statistics in the text report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightFields {
    /// Column whose most frequent value is reported
    pub mode_field: String,
    /// Columns whose value frequencies are reported
    pub count_fields: Vec<String>,
    /// Zip-code-like column; empty strings are ignored
    pub zip_field: String,
    /// Column counted when non-null
    pub images_field: String,
}

impl Default for InsightFields {
    fn default() -> Self {
        Self {
            mode_field: "city".to_string(),
            count_fields: vec![
                "access".to_string(),
                "filtration".to_string(),
                "status".to_string(),
            ],
            zip_field: "zip_code".to_string(),
            images_field: "images".to_string(),
        }
    }
}

/// Full configuration of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Label embedded in the summary CSV name
    pub label: String,

    /// Directory for failure CSVs and text reports
    pub output_dir: PathBuf,

    /// Directory for summary CSVs
    pub summary_dir: PathBuf,

    /// Records lacking this field are dropped before batch validation
    pub key_field: String,

    /// Validator selection
    pub mode: ValidationMode,

    /// Overrides the schema's own strictness when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    /// Schema file; the built-in water tap schema is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,

    /// Sources, processed in order
    pub sources: Vec<SourceConfig>,

    /// Statistics columns
    pub insights: InsightFields,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            label: "firebase_db".to_string(),
            output_dir: PathBuf::from("validation_results"),
            summary_dir: PathBuf::from("."),
            key_field: DEFAULT_KEY_FIELD.to_string(),
            mode: ValidationMode::default(),
            strict: None,
            schema: None,
            sources: vec![
                SourceConfig::file("water_prod", Environment::Prod, "data/water_prod.json"),
                SourceConfig::file("water_beta", Environment::Beta, "data/water_beta.json"),
                SourceConfig::file("water_test", Environment::Test, "data/water_test.json"),
            ],
            insights: InsightFields::default(),
        }
    }
}

impl RunConfig {
    /// Checks that the configuration can be used for a run.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty source list, a source name or
    /// label that is unsafe in a file name, duplicate source names, or an
    /// empty key field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        if !FILE_SAFE_NAME.is_match(&self.label) {
            return Err(ConfigError::InvalidLabel(self.label.clone()));
        }

        if self.key_field.trim().is_empty() {
            return Err(ConfigError::EmptyKeyField);
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if !FILE_SAFE_NAME.is_match(&source.name) {
                return Err(ConfigError::InvalidSourceName(source.name.clone()));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateSource(source.name.clone()));
            }
        }

        Ok(())
    }

    /// Returns the sources to run: all of them, or only those named.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownSource`] for a name that is not configured.
    pub fn select_sources(&self, names: &[String]) -> Result<Vec<&SourceConfig>, ConfigError> {
        if names.is_empty() {
            return Ok(self.sources.iter().collect());
        }

        names
            .iter()
            .map(|name| {
                self.sources
                    .iter()
                    .find(|s| &s.name == name)
                    .ok_or_else(|| ConfigError::UnknownSource(name.clone()))
            })
            .collect()
    }
}
