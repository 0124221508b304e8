//! Aggregate and distinct computation
//!
//! Aggregates coerce every source value to a 128-bit integer; a single
//! non-integer value fails the whole statement before anything is output.

use std::collections::HashSet;

use crate::errors::{QueryError, QueryResult};
use crate::planner::{AggregateFunction, ResolvedAggregate};
use crate::schema::ResolvedColumn;
use crate::storage::{parse_integer, Table};

/// Placeholder written where a shorter distinct column has run out of values
pub const DISTINCT_PADDING: &str = "";

/// Computes one aggregate over the owning table's column.
pub fn aggregate(call: &ResolvedAggregate, table: &Table) -> QueryResult<String> {
    let values = integers(&call.column, table)?;

    let empty = || QueryError::EmptyDomain {
        function: call.function.to_string(),
        column: call.column.label(),
    };

    match call.function {
        AggregateFunction::Max => values
            .iter()
            .max()
            .map(|v| v.to_string())
            .ok_or_else(empty),
        AggregateFunction::Min => values
            .iter()
            .min()
            .map(|v| v.to_string())
            .ok_or_else(empty),
        AggregateFunction::Sum => Ok(sum(&call.column, &values)?.to_string()),
        AggregateFunction::Avg => {
            if values.is_empty() {
                return Err(empty());
            }
            let avg = sum(&call.column, &values)? as f64 / values.len() as f64;
            Ok(format_float(avg))
        }
    }
}

fn integers(column: &ResolvedColumn, table: &Table) -> QueryResult<Vec<i128>> {
    table
        .rows()
        .iter()
        .map(|row| {
            let raw = &row[column.index];
            parse_integer(raw).ok_or_else(|| QueryError::AggregateType {
                column: column.label(),
                value: raw.clone(),
            })
        })
        .collect()
}

fn sum(column: &ResolvedColumn, values: &[i128]) -> QueryResult<i128> {
    values.iter().try_fold(0i128, |acc, &v| {
        acc.checked_add(v).ok_or_else(|| QueryError::AggregateType {
            column: column.label(),
            value: v.to_string(),
        })
    })
}

/// Floating output always carries a fractional part.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Distinct values of a column in first-occurrence order
pub fn distinct_values(column: &ResolvedColumn, table: &Table) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for row in table.rows() {
        let value = &row[column.index];
        if seen.insert(value.as_str()) {
            values.push(value.clone());
        }
    }
    values
}

/// Aligns independently deduplicated columns by position.
///
/// Rows run to the longest column; shorter columns are padded with
/// [`DISTINCT_PADDING`]. Cells in one output row are not correlated when the
/// column lengths differ.
pub fn pad_columns(columns: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|i| {
            columns
                .iter()
                .map(|values| {
                    values
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| DISTINCT_PADDING.to_string())
                })
                .collect()
        })
        .collect()
}
