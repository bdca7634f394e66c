//! Main validation engine.
//!
//! `DataValidator` runs the row-wise and/or batch validator selected by a
//! [`ValidationMode`] and returns one outcome per mode that ran.

use crate::{BatchValidator, RowValidator};
use serde::Serialize;
use std::time::Instant;
use tapcheck_core::{
    DataSet, RecordValidator, Schema, SchemaError, ValidationContext, ValidationMode,
    ValidationOutcome,
};
use tracing::{debug, info};

/// Outcome of one validation mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeOutcome {
    /// `Row` or `Batch`; never `Both`
    pub mode: ValidationMode,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
}

/// Validation engine for tap records.
///
/// # Example
///
/// ```rust
/// use tapcheck_core::{DataSet, ValidationContext, ValidationMode, water_tap_schema};
/// use tapcheck_validator::DataValidator;
///
/// let validator = DataValidator::new();
/// let results = validator.validate_with_data(
///     &water_tap_schema(),
///     &DataSet::empty(),
///     &ValidationContext::new(),
///     ValidationMode::Both,
/// );
///
/// assert_eq!(results.len(), 2);
/// assert!(results.iter().all(|r| r.outcome.passed()));
/// ```
#[derive(Debug, Default)]
pub struct DataValidator {
    row_validator: RowValidator,
    batch_validator: BatchValidator,
}

impl DataValidator {
    /// Creates a new data validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `dataset` against `schema` with the selected mode(s).
    ///
    /// With [`ValidationMode::Both`] the batch outcome comes first.
    pub fn validate_with_data(
        &self,
        schema: &Schema,
        dataset: &DataSet,
        context: &ValidationContext,
        mode: ValidationMode,
    ) -> Vec<ModeOutcome> {
        let validators: Vec<(ValidationMode, &dyn RecordValidator)> = match mode {
            ValidationMode::Batch => vec![(ValidationMode::Batch, &self.batch_validator)],
            ValidationMode::Row => vec![(ValidationMode::Row, &self.row_validator)],
            ValidationMode::Both => vec![
                (ValidationMode::Batch, &self.batch_validator),
                (ValidationMode::Row, &self.row_validator),
            ],
        };

        validators
            .into_iter()
            .map(|(mode, validator)| {
                let start = Instant::now();
                let outcome = validator.validate(schema, dataset, context);
                debug!(
                    "{} validator finished in {} ms",
                    validator.name(),
                    start.elapsed().as_millis()
                );
                info!(
                    "{} ({}): {} errors, {} warnings, {} unexpected types",
                    context.source_name(),
                    mode,
                    outcome.error_count,
                    outcome.warning_count,
                    outcome.unexpected_type_count
                );
                ModeOutcome { mode, outcome }
            })
            .collect()
    }

    /// Validates only the schema definition itself (no data).
    pub fn validate_definition(&self, schema: &Schema) -> Result<(), SchemaError> {
        schema.check_definition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tapcheck_core::{Record, SchemaBuilder, Value, water_tap_schema};

    fn tap(tapnum: i64, lat: Value) -> Record {
        let mut record = Record::new();
        record.insert("access".to_string(), Value::from("Public"));
        record.insert("address".to_string(), Value::from("1 Main St"));
        record.insert("tapnum".to_string(), Value::Int(tapnum));
        record.insert("lat".to_string(), lat);
        record
    }

    #[test]
    fn test_single_mode() {
        let dataset = DataSet::from_records(vec![tap(1, Value::Float(39.9))]);
        let validator = DataValidator::new();

        let results = validator.validate_with_data(
            &water_tap_schema(),
            &dataset,
            &ValidationContext::new(),
            ValidationMode::Row,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].mode, ValidationMode::Row);
        assert!(results[0].outcome.passed());
    }

    #[test]
    fn test_both_modes_disagree_on_coercible_strings() {
        // "39.95" coerces to float in batch mode but is a string to the row walk.
        let dataset = DataSet::from_records(vec![
            tap(1, Value::from("39.95")),
            tap(2, Value::Float(39.9)),
        ]);
        let validator = DataValidator::new();

        let results = validator.validate_with_data(
            &water_tap_schema(),
            &dataset,
            &ValidationContext::new().with_source("water_test"),
            ValidationMode::Both,
        );
        assert_eq!(results[0].mode, ValidationMode::Batch);
        assert_eq!(results[0].outcome.error_count, 0);
        assert_eq!(results[1].mode, ValidationMode::Row);
        assert_eq!(results[1].outcome.error_count, 1);
    }

    #[test]
    fn test_key_field_from_context() {
        let mut no_lat = tap(1, Value::Null);
        no_lat.remove("lat");
        let dataset = DataSet::from_records(vec![no_lat, tap(2, Value::Float(1.0))]);

        let results = DataValidator::new().validate_with_data(
            &water_tap_schema(),
            &dataset,
            &ValidationContext::new().with_key_field("lat"),
            ValidationMode::Batch,
        );
        assert_eq!(results[0].outcome.rows_checked, 1);
    }

    #[test]
    fn test_validate_definition() {
        let validator = DataValidator::new();
        assert!(validator.validate_definition(&water_tap_schema()).is_ok());
        assert!(
            validator
                .validate_definition(&SchemaBuilder::new("empty").build())
                .is_err()
        );
    }
}
