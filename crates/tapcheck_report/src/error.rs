//! Error types for report persistence.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A report file or directory could not be written
    #[error("Failed to write report {path}: {reason}")]
    ReportWriteFailure { path: PathBuf, reason: String },
}

impl ReportError {
    /// Creates a new write failure for `path`.
    pub fn write_failure(path: &Path, reason: impl ToString) -> Self {
        Self::ReportWriteFailure {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::write_failure(Path::new("out/water_test_errors.csv"), "denied");
        assert_eq!(
            err.to_string(),
            "Failed to write report out/water_test_errors.csv: denied"
        );
    }
}
