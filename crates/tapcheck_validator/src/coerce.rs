//! Type matching and coercion rules.
//!
//! Exact matching is used by the row-wise validator and by batch columns
//! without `coerce`. Integers always satisfy a float column since JSON does
//! not tell the two apart.

use tapcheck_core::{FieldType, Value};

/// Returns true if `value` already has the runtime type `field_type` asks for.
///
/// Null never matches; nullability is checked separately.
pub fn matches_exact(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::String => matches!(value, Value::String(_)),
        FieldType::Float => matches!(value, Value::Float(_) | Value::Int(_)),
        FieldType::Boolean => matches!(value, Value::Bool(_)),
        FieldType::List => matches!(value, Value::List(_)),
    }
}

/// Attempts to convert `value` into `field_type`.
///
/// Returns `None` when the value cannot be coerced:
///
/// - string: any scalar is rendered as text; records and lists are rejected
/// - float: numbers, and strings that parse to a finite number
/// - boolean: booleans, `"true"`/`"false"`/`"1"`/`"0"` (any case) and the
///   integers 0 and 1
/// - list: lists only
pub fn coerce(field_type: FieldType, value: &Value) -> Option<Value> {
    if value.is_null() {
        return None;
    }

    match field_type {
        FieldType::String => match value {
            Value::String(_) => Some(value.clone()),
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
                Some(Value::String(value.to_string()))
            }
            _ => None,
        },
        FieldType::Float => match value {
            Value::Float(f) => Some(Value::Float(*f)),
            Value::Int(i) => Some(Value::Float(*i as f64)),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Value::Float),
            _ => None,
        },
        FieldType::Boolean => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::Int(0) => Some(Value::Bool(false)),
            Value::Int(1) => Some(Value::Bool(true)),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        FieldType::List => match value {
            Value::List(_) => Some(value.clone()),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tapcheck_core::Record;

    #[test]
    fn test_exact_matching() {
        assert!(matches_exact(FieldType::String, &Value::from("x")));
        assert!(!matches_exact(FieldType::String, &Value::Int(1)));
        assert!(matches_exact(FieldType::Float, &Value::Int(1)));
        assert!(matches_exact(FieldType::Float, &Value::Float(1.5)));
        assert!(!matches_exact(FieldType::Float, &Value::from("1.5")));
        assert!(matches_exact(FieldType::Boolean, &Value::Bool(false)));
        assert!(!matches_exact(FieldType::Boolean, &Value::from("false")));
        assert!(matches_exact(FieldType::List, &Value::List(vec![])));
        assert!(!matches_exact(FieldType::List, &Value::Null));
    }

    #[test]
    fn test_numeric_string_coerces_to_float() {
        assert_eq!(
            coerce(FieldType::Float, &Value::from(" 39.95 ")),
            Some(Value::Float(39.95))
        );
        assert_eq!(coerce(FieldType::Float, &Value::Int(7)), Some(Value::Float(7.0)));
        assert_eq!(coerce(FieldType::Float, &Value::from("north")), None);
        assert_eq!(coerce(FieldType::Float, &Value::from("")), None);
        assert_eq!(coerce(FieldType::Float, &Value::from("inf")), None);
        assert_eq!(coerce(FieldType::Float, &Value::Bool(true)), None);
    }

    #[test]
    fn test_scalars_coerce_to_string() {
        assert_eq!(
            coerce(FieldType::String, &Value::Int(19104)),
            Some(Value::from("19104"))
        );
        assert_eq!(
            coerce(FieldType::String, &Value::Bool(true)),
            Some(Value::from("true"))
        );
        assert_eq!(coerce(FieldType::String, &Value::Map(Record::new())), None);
        assert_eq!(coerce(FieldType::String, &Value::List(vec![])), None);
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(
            coerce(FieldType::Boolean, &Value::from("TRUE")),
            Some(Value::Bool(true))
        );
        assert_eq!(coerce(FieldType::Boolean, &Value::Int(0)), Some(Value::Bool(false)));
        assert_eq!(coerce(FieldType::Boolean, &Value::Int(2)), None);
        assert_eq!(coerce(FieldType::Boolean, &Value::from("yes")), None);
    }

    #[test]
    fn test_null_never_coerces() {
        assert_eq!(coerce(FieldType::String, &Value::Null), None);
        assert_eq!(coerce(FieldType::List, &Value::Null), None);
    }
}
