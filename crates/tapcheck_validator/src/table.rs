//! Tabular view of a dataset.
//!
//! Columns are the union of record keys in first-seen order. A key missing
//! from a record becomes a null cell, so every column has one cell per row.

use std::collections::{BTreeMap, HashMap};
use tapcheck_core::{DataSet, FieldType, Value};

use crate::coerce::coerce;

/// Column-oriented copy of a [`DataSet`].
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    index: Vec<usize>,
    cells: HashMap<String, Vec<Value>>,
}

impl Table {
    /// Builds a table from a dataset.
    pub fn from_dataset(dataset: &DataSet) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in dataset.rows() {
            for key in row.record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let index: Vec<usize> = dataset.rows().map(|r| r.index).collect();
        let cells = columns
            .iter()
            .map(|column| {
                let values = dataset
                    .rows()
                    .map(|row| row.get(column).cloned().unwrap_or(Value::Null))
                    .collect();
                (column.clone(), values)
            })
            .collect();

        Self {
            columns,
            index,
            cells,
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the source row index of every table row.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Returns true if the column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Returns the cells of a column.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.cells.get(name).map(Vec::as_slice)
    }

    /// Returns the number of null cells in a column; a missing column is all null.
    pub fn null_count(&self, name: &str) -> usize {
        match self.column(name) {
            Some(cells) => cells.iter().filter(|v| v.is_null()).count(),
            None => self.len(),
        }
    }

    /// Counts the scalar values of a column, ignoring nulls and composites.
    pub fn value_counts(&self, name: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for key in self
            .column(name)
            .unwrap_or_default()
            .iter()
            .filter_map(Value::scalar_key)
        {
            *counts.entry(key).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the scalar values that occur more than once, with their counts.
    ///
    /// Cells are first converted to `field_type` where possible, so `7`,
    /// `7.0` and `"7"` group together in a float column.
    pub fn duplicates(&self, name: &str, field_type: FieldType) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for cell in self.column(name).unwrap_or_default() {
            let key = match coerce(field_type, cell) {
                Some(normalized) => normalized.scalar_key(),
                None => cell.scalar_key(),
            };
            if let Some(key) = key {
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts.retain(|_, count| *count > 1);
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tapcheck_core::Record;

    fn dataset() -> DataSet {
        let rows: Vec<Record> = vec![
            serde_json::json!({"tapnum": 1, "city": "Philadelphia"}),
            serde_json::json!({"tapnum": 2, "zip_code": "19104"}),
            serde_json::json!({"tapnum": 1, "city": "Philadelphia", "extra": [1]}),
        ]
        .into_iter()
        .map(|json| match Value::from(json) {
            Value::Map(m) => m,
            _ => unreachable!(),
        })
        .collect();
        DataSet::from_records(rows)
    }

    #[test]
    fn test_columns_in_first_seen_order() {
        let table = Table::from_dataset(&dataset());
        assert_eq!(table.columns(), &["city", "tapnum", "zip_code", "extra"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.index(), &[0, 1, 2]);
    }

    #[test]
    fn test_missing_keys_become_null() {
        let table = Table::from_dataset(&dataset());
        assert_eq!(table.null_count("city"), 1);
        assert_eq!(table.null_count("zip_code"), 2);
        assert_eq!(table.null_count("absent"), 3);
    }

    #[test]
    fn test_value_counts_and_duplicates() {
        let table = Table::from_dataset(&dataset());
        let counts = table.value_counts("tapnum");
        assert_eq!(counts.get("1"), Some(&2));
        assert_eq!(counts.get("2"), Some(&1));
        assert_eq!(table.duplicates("tapnum", FieldType::Float).len(), 1);
        assert!(table.value_counts("extra").is_empty());
    }

    #[test]
    fn test_duplicates_normalize_numbers() {
        let rows: Vec<Record> = vec![
            serde_json::json!({"tapnum": 7, "lat": "39.5"}),
            serde_json::json!({"tapnum": 7.0, "lat": 39.5}),
            serde_json::json!({"tapnum": 8, "lat": "north"}),
        ]
        .into_iter()
        .map(|json| match Value::from(json) {
            Value::Map(m) => m,
            _ => unreachable!(),
        })
        .collect();
        let table = Table::from_dataset(&DataSet::from_records(rows));

        assert_eq!(table.value_counts("tapnum").get("7"), Some(&1));
        let tapnum = table.duplicates("tapnum", FieldType::Float);
        assert_eq!(tapnum.get("7.0"), Some(&2));
        let lat = table.duplicates("lat", FieldType::Float);
        assert_eq!(lat.get("39.5"), Some(&2));
        assert_eq!(lat.len(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::from_dataset(&DataSet::empty());
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
