//! Writing reports to disk.
//!
//! Every file is keyed by source name (and date where it applies). A file
//! already at the target path is deleted before the new one is written, so
//! persisting the same report twice gives identical files.

use crate::{Report, ReportError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Header of the failure CSV.
const FAILURE_COLUMNS: [&str; 6] = [
    "index",
    "column",
    "check",
    "expected_type",
    "actual_type",
    "failure_case",
];

/// Where report files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// Directory of the summary CSVs
    pub summary_dir: PathBuf,
    /// Directory of the failure CSVs and text reports
    pub output_dir: PathBuf,
    /// Label embedded in summary CSV names
    pub label: String,
}

/// Files written by [`persist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFiles {
    pub summary_csv: PathBuf,
    /// `None` when there were no failures to write
    pub failure_csv: Option<PathBuf>,
    pub text_report: PathBuf,
}

impl ReportPaths {
    /// `<summary_dir>/<date>_<label>_validation_<source>.csv`
    pub fn summary_csv(&self, report: &Report) -> PathBuf {
        self.summary_dir.join(format!(
            "{}_{}_validation_{}.csv",
            report.date.format("%Y-%m-%d"),
            self.label,
            report.source_name
        ))
    }

    /// `<output_dir>/<source>_errors.csv`
    pub fn failure_csv(&self, report: &Report) -> PathBuf {
        self.output_dir
            .join(format!("{}_errors.csv", report.source_name))
    }

    /// `<output_dir>/<source>_<date>.txt`
    pub fn text_report(&self, report: &Report) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}.txt",
            report.source_name,
            report.date.format("%Y-%m-%d")
        ))
    }
}

/// Writes the summary CSV, the failure CSV and the text report of `report`.
///
/// The failure CSV is only written when there are failure cases; otherwise
/// a stale one from an earlier run is removed.
///
/// # Errors
///
/// Returns [`ReportError::ReportWriteFailure`] if a directory cannot be
/// created or a file cannot be replaced.
pub fn persist(report: &Report, paths: &ReportPaths) -> Result<PersistedFiles, ReportError> {
    create_dir(&paths.summary_dir)?;
    create_dir(&paths.output_dir)?;

    let summary_csv = paths.summary_csv(report);
    replace_file(&summary_csv, &summary_bytes(report, &summary_csv)?)?;

    let failure_path = paths.failure_csv(report);
    let failure_csv = if report.has_failures() {
        replace_file(&failure_path, &failure_bytes(report, &failure_path)?)?;
        Some(failure_path)
    } else {
        remove_stale(&failure_path)?;
        None
    };

    let text_report = paths.text_report(report);
    replace_file(&text_report, report.render_text().as_bytes())?;

    info!(
        "Wrote reports for {} to {}",
        report.source_name,
        paths.output_dir.display()
    );

    Ok(PersistedFiles {
        summary_csv,
        failure_csv,
        text_report,
    })
}

fn summary_bytes(report: &Report, path: &Path) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in report.summary_rows() {
        writer
            .serialize(row)
            .map_err(|e| ReportError::write_failure(path, e))?;
    }
    writer
        .into_inner()
        .map_err(|e| ReportError::write_failure(path, e))
}

fn failure_bytes(report: &Report, path: &Path) -> Result<Vec<u8>, ReportError> {
    // With several modes every row says which mode found it.
    let tagged = report.outcomes.len() > 1;
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = Vec::with_capacity(FAILURE_COLUMNS.len() + 1);
    if tagged {
        header.push("mode");
    }
    header.extend(FAILURE_COLUMNS);
    writer
        .write_record(&header)
        .map_err(|e| ReportError::write_failure(path, e))?;

    for mode_outcome in &report.outcomes {
        for case in &mode_outcome.outcome.failure_cases {
            let mut record: Vec<String> = Vec::with_capacity(header.len());
            if tagged {
                record.push(mode_outcome.mode.to_string());
            }
            record.push(case.index.map(|i| i.to_string()).unwrap_or_default());
            record.push(case.column.clone().unwrap_or_default());
            record.push(case.check.to_string());
            record.push(
                case.expected_type
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
            );
            record.push(case.actual_type.clone());
            record.push(case.failure_case.clone());

            writer
                .write_record(&record)
                .map_err(|e| ReportError::write_failure(path, e))?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::write_failure(path, e))
}

fn create_dir(dir: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(dir).map_err(|e| ReportError::write_failure(dir, e))
}

fn replace_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    remove_stale(path)?;
    fs::write(path, contents).map_err(|e| ReportError::write_failure(path, e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn remove_stale(path: &Path) -> Result<(), ReportError> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| ReportError::write_failure(path, e))?;
        debug!("Removed {}", path.display());
    }
    Ok(())
}
