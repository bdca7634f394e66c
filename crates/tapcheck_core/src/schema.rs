//! Schema types for water tap records.
//!
//! A [`Schema`] is an ordered list of [`FieldSpec`]s plus a strictness flag.
//! The same value drives both the row-wise and the batch validator, so there is
//! exactly one description of what a tap record looks like.

use crate::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Expected type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 text
    String,
    /// Floating point number (integers are accepted)
    Float,
    /// Boolean flag
    Boolean,
    /// Sequence of values
    List,
}

impl FieldType {
    /// Returns the lowercase name used in reports and check names.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::List => "list",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of a single schema column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name as it appears in the source records
    pub name: String,

    /// Expected value type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the column must be present in every batch
    #[serde(default)]
    pub required: bool,

    /// Whether null values are allowed
    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Whether batch validation may coerce values into `field_type`
    #[serde(default)]
    pub coerce: bool,

    /// Whether duplicated values in this column are reported
    #[serde(default)]
    pub report_duplicates: bool,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Ordered collection of field specifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name, used in log output
    pub name: String,

    /// Reject keys that are not declared in `fields`
    #[serde(default)]
    pub strict: bool,

    /// Field definitions in declaration order
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if `name` is declared in the schema.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Returns an iterator over the required fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Returns a copy of this schema with the given strictness.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Checks that the schema itself is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Empty`] when no fields are declared and
    /// [`SchemaError::DuplicateField`] for the first repeated field name.
    pub fn check_definition(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::Empty(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::BlankFieldName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        Ok(())
    }
}
