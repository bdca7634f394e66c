//! Descriptive statistics over a validated batch.

use serde::Serialize;
use std::collections::BTreeMap;
use tapcheck_core::{InsightFields, Schema};
use tapcheck_validator::Table;

/// A value together with how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Frequencies of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnCounts {
    pub column: String,
    pub counts: Vec<ValueCount>,
}

/// Share of null cells in one column, as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullPercentage {
    pub column: String,
    pub percent: f64,
}

/// Statistics included in the text report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    /// Null percentage of every table column, in column order
    pub null_percentages: Vec<NullPercentage>,
    /// Most frequent value of the mode field
    pub mode: Option<(String, ValueCount)>,
    /// Value frequencies of the count fields
    pub value_counts: Vec<ColumnCounts>,
    /// Most common non-empty zip code
    pub most_common_zip: Option<ValueCount>,
    /// Records with a non-null images value
    pub image_count: usize,
    /// Duplicated values of columns that report duplicates
    pub duplicates: Vec<ColumnCounts>,
}

impl Statistics {
    /// Computes statistics for `table`.
    pub fn compute(table: &Table, schema: &Schema, insights: &InsightFields) -> Self {
        if table.is_empty() {
            return Self::default();
        }

        let null_percentages = table
            .columns()
            .iter()
            .map(|column| NullPercentage {
                column: column.clone(),
                percent: null_percentage(table.null_count(column), table.len()),
            })
            .collect();

        let top_value = mode(&table.value_counts(&insights.mode_field))
            .map(|vc| (insights.mode_field.clone(), vc));

        let value_counts = insights
            .count_fields
            .iter()
            .map(|column| ColumnCounts {
                column: column.clone(),
                counts: sorted_counts(table.value_counts(column)),
            })
            .collect();

        let mut zips = table.value_counts(&insights.zip_field);
        zips.retain(|value, _| !value.trim().is_empty());
        let most_common_zip = mode(&zips);

        let image_count = table.len() - table.null_count(&insights.images_field);

        let duplicates = schema
            .fields
            .iter()
            .filter(|f| f.report_duplicates)
            .map(|f| ColumnCounts {
                column: f.name.clone(),
                counts: sorted_counts(table.duplicates(&f.name, f.field_type)),
            })
            .filter(|c| !c.counts.is_empty())
            .collect();

        Self {
            null_percentages,
            mode: top_value,
            value_counts,
            most_common_zip,
            image_count,
            duplicates,
        }
    }
}

/// Returns `round(nulls / rows, 4) * 100`; zero for an empty column.
pub fn null_percentage(nulls: usize, rows: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    let ratio = nulls as f64 / rows as f64;
    (ratio * 10_000.0).round() / 100.0
}

/// Returns the most frequent value; ties go to the smallest value.
pub fn mode(counts: &BTreeMap<String, usize>) -> Option<ValueCount> {
    let mut best: Option<(&String, usize)> = None;
    for (value, &count) in counts {
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, count)| ValueCount {
        value: value.clone(),
        count,
    })
}

/// Orders counts by frequency, most frequent first, then by value.
pub fn sorted_counts(counts: BTreeMap<String, usize>) -> Vec<ValueCount> {
    let mut sorted: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    // Stable sort keeps the ascending value order among equal counts.
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted
}
