//! Builder pattern for creating schemas.
//!
//! This module provides ergonomic builders for constructing schemas
//! and their field specifications with a fluent API.

use crate::{FieldSpec, FieldType, Schema};

/// Builder for creating a [`Schema`].
///
/// # Example
///
/// ```rust
/// use tapcheck_core::{FieldSpecBuilder, FieldType, SchemaBuilder};
///
/// let schema = SchemaBuilder::new("fountains")
///     .strict(true)
///     .field(FieldSpecBuilder::new("name", FieldType::String).required(true).build())
///     .build();
///
/// assert!(schema.strict);
/// assert_eq!(schema.fields.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    name: String,
    strict: bool,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Adds a field to the schema.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds multiple fields to the schema.
    pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builds the schema.
    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            strict: self.strict,
            fields: self.fields,
        }
    }
}

/// Builder for creating a [`FieldSpec`].
///
/// Fields start out optional, nullable and without coercion.
///
/// # Example
///
/// ```rust
/// use tapcheck_core::{FieldSpecBuilder, FieldType};
///
/// let field = FieldSpecBuilder::new("lat", FieldType::Float)
///     .coerce(true)
///     .report_duplicates(true)
///     .description("Latitude of the water tap")
///     .build();
///
/// assert!(field.nullable);
/// assert!(field.coerce);
/// ```
#[derive(Debug)]
pub struct FieldSpecBuilder {
    field: FieldSpec,
}

impl FieldSpecBuilder {
    /// Creates a new field builder.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: FieldSpec {
                name: name.into(),
                field_type,
                required: false,
                nullable: true,
                coerce: false,
                report_duplicates: false,
                description: None,
            },
        }
    }

    /// Sets whether the field must be present.
    pub fn required(mut self, required: bool) -> Self {
        self.field.required = required;
        self
    }

    /// Sets whether the field can be null.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.field.nullable = nullable;
        self
    }

    /// Sets whether batch validation may coerce values.
    pub fn coerce(mut self, coerce: bool) -> Self {
        self.field.coerce = coerce;
        self
    }

    /// Sets whether duplicated values are reported.
    pub fn report_duplicates(mut self, report: bool) -> Self {
        self.field.report_duplicates = report;
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.field.description = Some(description.into());
        self
    }

    /// Builds the field.
    pub fn build(self) -> FieldSpec {
        self.field
    }
}
