//! Batch ("lazy") validation.
//!
//! Drops records that lack the key field, coerces the rest into a [`Table`]
//! and checks every column in one pass, collecting all failing cells instead
//! of stopping at the first.

use crate::coerce::{coerce, matches_exact};
use crate::{Table, ValidationError};
use tapcheck_core::{
    Check, DataSet, FailureCase, FieldSpec, RecordValidator, Schema, ValidationContext,
    ValidationOutcome,
};
use tracing::{debug, error, info, warn};

/// Returns the records that have a non-null value for `key_field`.
///
/// Applying the filter twice gives the same rows as applying it once.
pub fn drop_missing_key(dataset: &DataSet, key_field: &str) -> DataSet {
    let filtered = dataset.retain_with_value(key_field);
    debug!(
        "Dropped {} of {} records without '{}'",
        dataset.len() - filtered.len(),
        dataset.len(),
        key_field
    );
    filtered
}

/// Column-wise validator over a filtered batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchValidator;

impl BatchValidator {
    /// Creates a new batch validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates an already filtered table.
    pub fn validate_table(&self, schema: &Schema, table: &Table) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        outcome.rows_checked = table.len();

        self.check_columns(schema, table, &mut outcome);

        for field in &schema.fields {
            self.check_cells(field, table, &mut outcome);
            if field.report_duplicates {
                self.count_duplicates(field, table, &mut outcome);
            }
        }

        outcome
    }

    fn check_columns(&self, schema: &Schema, table: &Table, outcome: &mut ValidationOutcome) {
        for column in table.columns() {
            if schema.contains(column) {
                continue;
            }
            if schema.strict {
                outcome.add_failure(FailureCase {
                    index: None,
                    column: None,
                    check: Check::ColumnInSchema,
                    expected_type: None,
                    actual_type: "column".to_string(),
                    failure_case: column.clone(),
                });
                error!("{}", ValidationError::unexpected_key(column));
            } else {
                warn!("{}", ValidationError::unexpected_key(column));
                outcome.add_warning();
            }
        }

        // An empty batch has no columns at all; only report missing ones for data.
        if table.is_empty() {
            return;
        }

        for field in schema.required_fields() {
            if table.has_column(&field.name) {
                continue;
            }
            outcome.add_failure(FailureCase {
                index: None,
                column: None,
                check: Check::ColumnInDataframe,
                expected_type: Some(field.field_type),
                actual_type: "missing".to_string(),
                failure_case: field.name.clone(),
            });
            error!("{}", ValidationError::missing_field(&field.name));
        }
    }

    fn check_cells(&self, field: &FieldSpec, table: &Table, outcome: &mut ValidationOutcome) {
        let Some(cells) = table.column(&field.name) else {
            return;
        };

        for (value, &index) in cells.iter().zip(table.index()) {
            let check = if value.is_null() {
                if field.nullable {
                    continue;
                }
                Check::NotNullable
            } else if field.coerce {
                if coerce(field.field_type, value).is_some() {
                    continue;
                }
                Check::CoerceDataType(field.field_type)
            } else {
                if matches_exact(field.field_type, value) {
                    continue;
                }
                Check::DataType(field.field_type)
            };

            if value.is_composite() {
                outcome.add_unexpected();
            }

            let case = FailureCase {
                index: Some(index),
                column: Some(field.name.clone()),
                check,
                expected_type: Some(field.field_type),
                actual_type: value.type_name().to_string(),
                failure_case: value.to_string(),
            };
            error!("{}", ValidationError::from(&case));
            outcome.add_failure(case);
        }
    }

    fn count_duplicates(&self, field: &FieldSpec, table: &Table, outcome: &mut ValidationOutcome) {
        for (value, count) in table.duplicates(&field.name, field.field_type) {
            warn!(
                "Value '{}' appears {} times in '{}'",
                value, count, field.name
            );
            outcome.warning_count += count;
        }
    }
}

impl RecordValidator for BatchValidator {
    fn name(&self) -> &'static str {
        "batch"
    }

    fn validate(
        &self,
        schema: &Schema,
        dataset: &DataSet,
        context: &ValidationContext,
    ) -> ValidationOutcome {
        let filtered = drop_missing_key(dataset, &context.key_field);
        info!(
            "{}: {} rows after dropping rows without {}",
            context.source_name(),
            filtered.len(),
            context.key_field
        );

        let table = Table::from_dataset(&filtered);
        self.validate_table(schema, &table)
    }
}
