//! Row-wise validation.
//!
//! Walks every record recursively and checks each present key against the
//! schema with exact type matching. Nested records are checked against the
//! same schema; list elements that are not records are only counted as
//! unexpected types.

use crate::ValidationError;
use crate::coerce::matches_exact;
use tapcheck_core::{
    Check, DataSet, FailureCase, Record, RecordValidator, Row, Schema, ValidationContext,
    ValidationOutcome, Value,
};
use tracing::{debug, error, warn};

/// Recursive per-record validator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RowValidator;

impl RowValidator {
    /// Creates a new row validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates a single top-level row.
    pub fn validate_row(&self, schema: &Schema, row: &Row) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        self.check_required(schema, row, &mut outcome);
        self.walk(schema, &row.record, row.index, None, &mut outcome);
        outcome.rows_checked = 1;
        outcome
    }

    fn check_required(&self, schema: &Schema, row: &Row, outcome: &mut ValidationOutcome) {
        for field in schema.required_fields() {
            if row.record.contains_key(&field.name) {
                continue;
            }
            let case = FailureCase {
                index: Some(row.index),
                column: Some(field.name.clone()),
                check: Check::ColumnInDataframe,
                expected_type: Some(field.field_type),
                actual_type: "missing".to_string(),
                failure_case: field.name.clone(),
            };
            error!("{}", ValidationError::from(&case));
            outcome.add_failure(case);
        }
    }

    fn walk(
        &self,
        schema: &Schema,
        record: &Record,
        index: usize,
        prefix: Option<&str>,
        outcome: &mut ValidationOutcome,
    ) {
        for (key, value) in record {
            let path = match prefix {
                Some(p) => format!("{p}.{key}"),
                None => key.clone(),
            };

            self.check_key(schema, key, &path, value, index, outcome);

            match value {
                Value::Map(nested) => self.walk(schema, nested, index, Some(&path), outcome),
                Value::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        match item {
                            Value::Map(nested) => {
                                let item_path = format!("{path}.{i}");
                                self.walk(schema, nested, index, Some(&item_path), outcome);
                            }
                            other => {
                                debug!(
                                    "Unexpected {} element in '{}' (row {})",
                                    other.type_name(),
                                    path,
                                    index
                                );
                                outcome.add_unexpected();
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn check_key(
        &self,
        schema: &Schema,
        key: &str,
        path: &str,
        value: &Value,
        index: usize,
        outcome: &mut ValidationOutcome,
    ) {
        let Some(field) = schema.field(key) else {
            if schema.strict {
                let case = FailureCase {
                    index: Some(index),
                    column: Some(path.to_string()),
                    check: Check::ColumnInSchema,
                    expected_type: None,
                    actual_type: value.type_name().to_string(),
                    failure_case: key.to_string(),
                };
                error!("{}", ValidationError::from(&case));
                outcome.add_failure(case);
            } else {
                warn!("{} (row {})", ValidationError::unexpected_key(path), index);
                outcome.add_warning();
            }
            return;
        };

        let check = if value.is_null() {
            if field.nullable {
                return;
            }
            Check::NotNullable
        } else if matches_exact(field.field_type, value) {
            return;
        } else {
            Check::DataType(field.field_type)
        };

        let case = FailureCase {
            index: Some(index),
            column: Some(path.to_string()),
            check,
            expected_type: Some(field.field_type),
            actual_type: value.type_name().to_string(),
            failure_case: value.to_string(),
        };
        error!("{}", ValidationError::from(&case));
        outcome.add_failure(case);
    }
}

impl RecordValidator for RowValidator {
    fn name(&self) -> &'static str {
        "row"
    }

    fn validate(
        &self,
        schema: &Schema,
        dataset: &DataSet,
        context: &ValidationContext,
    ) -> ValidationOutcome {
        debug!(
            "Row-wise validation of {} records from {}",
            dataset.len(),
            context.source_name()
        );

        let mut outcome = ValidationOutcome::new();
        for row in dataset.rows() {
            outcome.merge(self.validate_row(schema, row));
        }
        outcome
    }
}
