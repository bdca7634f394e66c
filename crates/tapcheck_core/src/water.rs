//! Built-in schema for water tap records.

use crate::{FieldSpec, FieldSpecBuilder, FieldType, Schema, SchemaBuilder};

/// Records without a value for this field are not validated in batch mode.
pub const DEFAULT_KEY_FIELD: &str = "tapnum";

/// Name of the built-in schema.
pub const WATER_SCHEMA_NAME: &str = "water_tap";

fn text(name: &str, description: &str) -> FieldSpec {
    FieldSpecBuilder::new(name, FieldType::String)
        .coerce(true)
        .description(description)
        .build()
}

fn coordinate(name: &str, description: &str) -> FieldSpec {
    FieldSpecBuilder::new(name, FieldType::Float)
        .coerce(true)
        .report_duplicates(true)
        .description(description)
        .build()
}

/// Returns the strict water tap schema.
///
/// `access` and `address` are required and non-nullable; every other field
/// is optional and nullable. All columns allow coercion in batch mode.
///
/// The closed flag is spelled `permanently_closed`. Some producers write
/// `permanetley_closed`; such records fail `column_in_schema` until the
/// upstream spelling is settled.
pub fn water_tap_schema() -> Schema {
    SchemaBuilder::new(WATER_SCHEMA_NAME)
        .strict(true)
        .field(
            FieldSpecBuilder::new("access", FieldType::String)
                .required(true)
                .nullable(false)
                .coerce(true)
                .description("Access to the water tap")
                .build(),
        )
        .field(
            FieldSpecBuilder::new("address", FieldType::String)
                .required(true)
                .nullable(false)
                .coerce(true)
                .description("Address of the water tap")
                .build(),
        )
        .field(text("city", "City of the water tap"))
        .field(text("description", "Description of the water tap"))
        .field(text("filtration", "Filtration of the water tap"))
        .field(text("gp_id", "ID of the water tap"))
        .field(text("handicap", "Handicap accessibility of the water tap"))
        .field(
            FieldSpecBuilder::new("hours", FieldType::List)
                .coerce(true)
                .description("Hours of the water tap")
                .build(),
        )
        .field(coordinate("lat", "Latitude of the water tap"))
        .field(coordinate("lon", "Longitude of the water tap"))
        .field(text("norms_rules", "Norms and rules of the water tap"))
        .field(text("organization", "Organization of the water tap"))
        .field(
            FieldSpecBuilder::new("permanently_closed", FieldType::Boolean)
                .coerce(true)
                .description("Permanently closed status of the water tap")
                .build(),
        )
        .field(text("phone", "Phone number of the water tap"))
        .field(text("quality", "Quality of the water tap"))
        .field(text("service", "Service of the water tap"))
        .field(text("statement", "Statement of the water tap"))
        .field(text("status", "Status of the water tap"))
        .field(text("tap_type", "Type of the water tap"))
        .field(coordinate("tapnum", "Number of the water tap"))
        .field(text("vessel", "Vessel of the water tap"))
        .field(text("zip_code", "Zip code of the water tap"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_water_schema_shape() {
        let schema = water_tap_schema();
        assert!(schema.strict);
        assert_eq!(schema.fields.len(), 22);
        assert!(schema.check_definition().is_ok());

        let required: Vec<&str> = schema.required_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(required, vec!["access", "address"]);
    }

    #[test]
    fn test_water_schema_types() {
        let schema = water_tap_schema();
        assert_eq!(schema.field("hours").map(|f| f.field_type), Some(FieldType::List));
        assert_eq!(
            schema.field("permanently_closed").map(|f| f.field_type),
            Some(FieldType::Boolean)
        );
        assert_eq!(schema.field("tapnum").map(|f| f.field_type), Some(FieldType::Float));
        assert!(!schema.contains("permanetley_closed"));

        let duplicates: Vec<&str> = schema
            .fields
            .iter()
            .filter(|f| f.report_duplicates)
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(duplicates, vec!["lat", "lon", "tapnum"]);
    }
}
