//! Per-source validation reports.

use crate::Statistics;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use tapcheck_core::{DataSet, Environment, InsightFields, Schema};
use tapcheck_validator::{ModeOutcome, Table};

/// Everything known about one source after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub source_name: String,
    /// Environment of the source, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    pub date: NaiveDate,
    /// Records returned by the source
    pub rows_retrieved: usize,
    /// Records left after dropping those without the key field
    pub rows_after_key_filter: usize,
    /// One outcome per validation mode that ran
    pub outcomes: Vec<ModeOutcome>,
    pub stats: Statistics,
    /// Set when the source could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_error: Option<String>,
}

/// One row of the summary CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Database")]
    pub database: String,
    #[serde(rename = "Errors")]
    pub errors: usize,
    #[serde(rename = "Warnings")]
    pub warnings: usize,
    #[serde(rename = "Unexpected Types")]
    pub unexpected_types: usize,
}

/// Builds the report of a source that was read and validated.
///
/// Statistics are computed over `filtered`, the batch left after dropping
/// records without the key field.
pub fn summarize(
    source_name: &str,
    date: NaiveDate,
    rows_retrieved: usize,
    filtered: &DataSet,
    outcomes: Vec<ModeOutcome>,
    schema: &Schema,
    insights: &InsightFields,
) -> Report {
    let table = Table::from_dataset(filtered);
    Report {
        source_name: source_name.to_string(),
        environment: None,
        date,
        rows_retrieved,
        rows_after_key_filter: filtered.len(),
        outcomes,
        stats: Statistics::compute(&table, schema, insights),
        source_error: None,
    }
}

impl Report {
    /// Builds the zero-row report of a source that could not be read.
    pub fn unavailable(source_name: &str, date: NaiveDate, error: impl ToString) -> Self {
        Self {
            source_name: source_name.to_string(),
            environment: None,
            date,
            rows_retrieved: 0,
            rows_after_key_filter: 0,
            outcomes: Vec::new(),
            stats: Statistics::default(),
            source_error: Some(error.to_string()),
        }
    }

    /// Tags the report with the environment of its source.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Total errors over every mode.
    pub fn error_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.outcome.error_count).sum()
    }

    /// Returns true if no mode recorded an error.
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns the summary CSV rows, one per mode.
    ///
    /// With a single mode the row is named after the source alone; with
    /// several, each row carries the mode in parentheses. A source without
    /// outcomes gives one all-zero row.
    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        if self.outcomes.is_empty() {
            return vec![SummaryRow {
                database: self.source_name.clone(),
                errors: 0,
                warnings: 0,
                unexpected_types: 0,
            }];
        }

        let tagged = self.outcomes.len() > 1;
        self.outcomes
            .iter()
            .map(|o| SummaryRow {
                database: if tagged {
                    format!("{} ({})", self.source_name, o.mode)
                } else {
                    self.source_name.clone()
                },
                errors: o.outcome.error_count,
                warnings: o.outcome.warning_count,
                unexpected_types: o.outcome.unexpected_type_count,
            })
            .collect()
    }

    /// Returns true if any mode recorded a failure case.
    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| !o.outcome.failure_cases.is_empty())
    }

    /// Renders the text report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "Validation report for {}", self.source_name)?;
        writeln!(out, "Date: {}", self.date.format("%Y-%m-%d"))?;
        if let Some(environment) = self.environment {
            writeln!(out, "Environment: {}", environment)?;
        }
        writeln!(out)?;

        if let Some(error) = &self.source_error {
            writeln!(out, "Source unavailable: {}", error)?;
            writeln!(out, "No records were validated.")?;
            return Ok(());
        }

        writeln!(out, "Rows retrieved: {}", self.rows_retrieved)?;
        writeln!(out, "Rows after key filter: {}", self.rows_after_key_filter)?;

        for mode_outcome in &self.outcomes {
            let outcome = &mode_outcome.outcome;
            writeln!(out)?;
            writeln!(out, "[{}]", mode_outcome.mode)?;
            writeln!(out, "Rows checked: {}", outcome.rows_checked)?;
            writeln!(out, "Errors: {}", outcome.error_count)?;
            writeln!(out, "Warnings: {}", outcome.warning_count)?;
            writeln!(out, "Unexpected types: {}", outcome.unexpected_type_count)?;

            if outcome.failure_cases.is_empty() {
                writeln!(out, "No errors found.")?;
                continue;
            }

            let indices: Vec<String> = outcome
                .failing_indices()
                .iter()
                .map(ToString::to_string)
                .collect();
            if !indices.is_empty() {
                writeln!(out, "Failing rows: {}", indices.join(", "))?;
            }
            for case in &outcome.failure_cases {
                let row = case
                    .index
                    .map_or_else(|| "table".to_string(), |i| format!("row {i}"));
                writeln!(
                    out,
                    "  {}, {}: {} failed for '{}' ({})",
                    row,
                    case.column.as_deref().unwrap_or("-"),
                    case.check,
                    case.failure_case,
                    case.actual_type
                )?;
            }
        }

        self.write_stats(out)
    }

    fn write_stats(&self, out: &mut String) -> std::fmt::Result {
        let stats = &self.stats;
        writeln!(out)?;
        writeln!(out, "Statistics")?;

        match &stats.mode {
            Some((field, vc)) => writeln!(
                out,
                "Most common {}: {} ({})",
                field, vc.value, vc.count
            )?,
            None => writeln!(out, "Most common value: none")?,
        }

        for column in &stats.value_counts {
            writeln!(out, "Value counts for {}:", column.column)?;
            for vc in &column.counts {
                writeln!(out, "  {}: {}", vc.value, vc.count)?;
            }
        }

        match &stats.most_common_zip {
            Some(vc) => writeln!(out, "Most common zip code: {} ({})", vc.value, vc.count)?,
            None => writeln!(out, "Most common zip code: none")?,
        }
        writeln!(out, "Records with images: {}", stats.image_count)?;

        if !stats.null_percentages.is_empty() {
            writeln!(out, "Null percentage by column:")?;
            for np in &stats.null_percentages {
                writeln!(out, "  {}: {:.2}%", np.column, np.percent)?;
            }
        }

        for column in &stats.duplicates {
            writeln!(out, "Duplicated values in {}:", column.column)?;
            for vc in &column.counts {
                writeln!(out, "  {}: {}", vc.value, vc.count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tapcheck_core::{
        Check, Environment, FailureCase, FieldType, ValidationMode, ValidationOutcome,
        water_tap_schema,
    };

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn failing_outcome() -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        outcome.rows_checked = 3;
        outcome.add_failure(FailureCase {
            index: Some(4),
            column: Some("lat".to_string()),
            check: Check::CoerceDataType(FieldType::Float),
            expected_type: Some(FieldType::Float),
            actual_type: "string".to_string(),
            failure_case: "north".to_string(),
        });
        outcome
    }

    fn report(outcomes: Vec<ModeOutcome>) -> Report {
        summarize(
            "water_test",
            date(),
            5,
            &DataSet::empty(),
            outcomes,
            &water_tap_schema(),
            &InsightFields::default(),
        )
    }

    #[test]
    fn test_single_mode_summary_row() {
        let report = report(vec![ModeOutcome {
            mode: ValidationMode::Batch,
            outcome: failing_outcome(),
        }]);

        assert_eq!(
            report.summary_rows(),
            vec![SummaryRow {
                database: "water_test".to_string(),
                errors: 1,
                warnings: 0,
                unexpected_types: 0,
            }]
        );
        assert!(!report.passed());
        assert!(report.has_failures());
    }

    #[test]
    fn test_both_modes_tag_rows() {
        let report = report(vec![
            ModeOutcome {
                mode: ValidationMode::Batch,
                outcome: ValidationOutcome::new(),
            },
            ModeOutcome {
                mode: ValidationMode::Row,
                outcome: failing_outcome(),
            },
        ]);

        let names: Vec<String> = report.summary_rows().into_iter().map(|r| r.database).collect();
        assert_eq!(names, vec!["water_test (batch)", "water_test (row)"]);
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn test_text_lists_failures() {
        let text = report(vec![ModeOutcome {
            mode: ValidationMode::Batch,
            outcome: failing_outcome(),
        }])
        .render_text();

        assert!(text.starts_with("Validation report for water_test\nDate: 2024-05-01\n"));
        assert!(text.contains("Errors: 1\n"));
        assert!(text.contains("Failing rows: 4\n"));
        assert!(text.contains("  row 4, lat: coerce_dtype('float') failed for 'north' (string)\n"));
        assert!(!text.contains("No errors found."));
    }

    #[test]
    fn test_text_counts_rows_per_mode() {
        let mut row_outcome = ValidationOutcome::new();
        row_outcome.rows_checked = 5;
        let text = report(vec![
            ModeOutcome {
                mode: ValidationMode::Batch,
                outcome: failing_outcome(),
            },
            ModeOutcome {
                mode: ValidationMode::Row,
                outcome: row_outcome,
            },
        ])
        .render_text();

        assert!(text.contains("Rows retrieved: 5\nRows after key filter: 0\n"));
        assert!(text.contains("[batch]\nRows checked: 3\n"));
        assert!(text.contains("[row]\nRows checked: 5\n"));
    }

    #[test]
    fn test_text_names_environment() {
        let report = report(Vec::new()).with_environment(Environment::Test);
        assert_eq!(report.environment, Some(Environment::Test));
        assert!(
            report
                .render_text()
                .starts_with("Validation report for water_test\nDate: 2024-05-01\nEnvironment: test\n")
        );
    }

    #[test]
    fn test_text_states_no_errors() {
        let text = report(vec![ModeOutcome {
            mode: ValidationMode::Batch,
            outcome: ValidationOutcome::new(),
        }])
        .render_text();

        assert!(text.contains("No errors found."));
    }

    #[test]
    fn test_unavailable_report() {
        let report = Report::unavailable("water_prod", date(), "connection refused");

        assert_eq!(report.rows_retrieved, 0);
        assert!(report.passed());
        assert_eq!(report.summary_rows()[0].errors, 0);
        assert!(report.render_text().contains("Source unavailable: connection refused"));
    }
}
