//! Record sources for tapcheck.
//!
//! Each configured source yields the full snapshot of tap records, either
//! from a JSON file on disk or from a Firebase Realtime Database reference
//! over its REST interface.
//!
//! # Example
//!
//! ```no_run
//! use tapcheck_core::{Environment, SourceConfig};
//! use tapcheck_source::RecordLoader;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SourceConfig::file("water_test", Environment::Test, "data/water_test.json");
//! let dataset = RecordLoader::new(&source).fetch().await?;
//! println!("{} records", dataset.len());
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod converter;
mod loader;

pub use converter::payload_to_dataset;
pub use loader::{DEFAULT_TIMEOUT_SECS, RecordLoader};

/// Error types for record sources.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source could not be reached or returned unusable data
    #[error("Source '{name}' unavailable: {reason}")]
    SourceUnavailable { name: String, reason: String },
}

impl SourceError {
    /// Creates a new source unavailable error.
    pub fn unavailable(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the name of the failing source.
    pub fn source_name(&self) -> &str {
        match self {
            Self::SourceUnavailable { name, .. } => name,
        }
    }
}
