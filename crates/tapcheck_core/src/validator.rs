//! Validation traits and outcome types.
//!
//! A validator is a pure function of a [`Schema`], a [`DataSet`] and a
//! [`ValidationContext`]; it never fails; every violation is recorded in the
//! returned [`ValidationOutcome`].

use crate::{DataSet, FieldType, Schema};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Core trait implemented by the row-wise and batch validators.
///
/// # Example
///
/// ```rust
/// use tapcheck_core::{DataSet, RecordValidator, Schema, ValidationContext, ValidationOutcome};
///
/// struct CountingValidator;
///
/// impl RecordValidator for CountingValidator {
///     fn name(&self) -> &'static str {
///         "counting"
///     }
///
///     fn validate(
///         &self,
///         _schema: &Schema,
///         dataset: &DataSet,
///         _context: &ValidationContext,
///     ) -> ValidationOutcome {
///         let mut outcome = ValidationOutcome::new();
///         outcome.rows_checked = dataset.len();
///         outcome
///     }
/// }
/// ```
pub trait RecordValidator: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Validates every record of `dataset` against `schema`.
    fn validate(
        &self,
        schema: &Schema,
        dataset: &DataSet,
        context: &ValidationContext,
    ) -> ValidationOutcome;
}

/// Options shared by both validation modes.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Records without a value for this field are dropped before batch validation
    pub key_field: String,

    /// Name of the source being validated, for log output
    pub source: Option<String>,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            key_field: crate::DEFAULT_KEY_FIELD.to_string(),
            source: None,
        }
    }
}

impl ValidationContext {
    /// Creates a new validation context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key field used by batch filtering.
    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// Sets the source name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the source name or a placeholder.
    pub fn source_name(&self) -> &str {
        self.source.as_deref().unwrap_or("<unnamed>")
    }
}

/// The check a failure case did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Key or column is not declared in the schema
    ColumnInSchema,
    /// Required column is missing
    ColumnInDataframe,
    /// Null value in a non-nullable column
    NotNullable,
    /// Exact type check
    DataType(FieldType),
    /// Type check after attempted coercion
    CoerceDataType(FieldType),
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::ColumnInSchema => f.write_str("column_in_schema"),
            Check::ColumnInDataframe => f.write_str("column_in_dataframe"),
            Check::NotNullable => f.write_str("not_nullable"),
            Check::DataType(t) => write!(f, "dtype('{t}')"),
            Check::CoerceDataType(t) => write!(f, "coerce_dtype('{t}')"),
        }
    }
}

impl Serialize for Check {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single failing cell, key or column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureCase {
    /// Row index in the source sequence; `None` for whole-column failures
    pub index: Option<usize>,
    /// Column name or dotted key path; `None` for table-level failures
    pub column: Option<String>,
    /// The failed check
    pub check: Check,
    /// Declared type of the column, if it is in the schema
    pub expected_type: Option<FieldType>,
    /// Runtime type of the failing value
    pub actual_type: String,
    /// Rendered failing value
    pub failure_case: String,
}

/// Result of validating one source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Number of values of an unexpected shape
    pub unexpected_type_count: usize,
    /// Number of records that were validated
    pub rows_checked: usize,
    /// Every recorded failure, in discovery order
    pub failure_cases: Vec<FailureCase>,
}

impl ValidationOutcome {
    /// Creates an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no errors were recorded.
    pub fn passed(&self) -> bool {
        self.error_count == 0
    }

    /// Records an error together with its failure case.
    pub fn add_failure(&mut self, case: FailureCase) {
        self.error_count += 1;
        self.failure_cases.push(case);
    }

    /// Records a warning.
    pub fn add_warning(&mut self) {
        self.warning_count += 1;
    }

    /// Records a value of an unexpected shape.
    pub fn add_unexpected(&mut self) {
        self.unexpected_type_count += 1;
    }

    /// Adds the counts and failure cases of `other` to this outcome.
    pub fn merge(&mut self, other: ValidationOutcome) {
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.unexpected_type_count += other.unexpected_type_count;
        self.rows_checked += other.rows_checked;
        self.failure_cases.extend(other.failure_cases);
    }

    /// Returns the sorted, de-duplicated row indices with at least one failure.
    pub fn failing_indices(&self) -> Vec<usize> {
        self.failure_cases
            .iter()
            .filter_map(|c| c.index)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
