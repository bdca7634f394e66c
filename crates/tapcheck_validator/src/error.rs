//! Error types describing individual schema violations.
//!
//! Violations are never returned as `Err`: validators count them into a
//! [`ValidationOutcome`](tapcheck_core::ValidationOutcome). These types give
//! each violation a readable message for the log.

use tapcheck_core::{Check, FailureCase};
use thiserror::Error;

/// A single schema violation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Key or column not declared in the schema
    #[error("Unexpected key '{0}'")]
    UnexpectedKey(String),

    /// Required field is missing
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    /// Field should not be null
    #[error("Field '{field}' is null but nullability is not allowed (row {row:?})")]
    NullConstraintViolation { field: String, row: Option<usize> },

    /// Field type mismatch
    #[error("Invalid data type for key '{field}': expected {expected}, got {actual} (row {row:?})")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
        row: Option<usize>,
    },
}

impl ValidationError {
    /// Creates a new unexpected key error.
    pub fn unexpected_key(key: impl Into<String>) -> Self {
        Self::UnexpectedKey(key.into())
    }

    /// Creates a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Creates a new null constraint violation error.
    pub fn null_violation(field: impl Into<String>, row: Option<usize>) -> Self {
        Self::NullConstraintViolation {
            field: field.into(),
            row,
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        row: Option<usize>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
            row,
        }
    }
}

impl From<&FailureCase> for ValidationError {
    fn from(case: &FailureCase) -> Self {
        let column = case.column.clone().unwrap_or_else(|| case.failure_case.clone());
        match case.check {
            Check::ColumnInSchema => Self::unexpected_key(column),
            Check::ColumnInDataframe => Self::missing_field(column),
            Check::NotNullable => Self::null_violation(column, case.index),
            Check::DataType(t) | Check::CoerceDataType(t) => {
                Self::type_mismatch(column, t.as_str(), case.actual_type.clone(), case.index)
            }
        }
    }
}
