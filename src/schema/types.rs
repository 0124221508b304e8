//! Schema type definitions
//!
//! A table schema is an ordered list of column names. Column references in
//! queries are either qualified (`table.column`) or bare (`column`).

use std::fmt;

use serde::Serialize;

use crate::errors::{QueryError, QueryResult};
use crate::text::normalize;

/// Ordered column list for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Column names in storage order
    pub columns: Vec<String>,
}

impl TableSchema {
    /// Creates a new table schema
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Returns the position of a column within a row of this table
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Number of columns (row width)
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// A column reference as written in a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    /// `table.column`
    Qualified { table: String, column: String },
    /// `column`
    Unqualified(String),
}

impl ColumnRef {
    /// Parses a reference, rejecting empty parts and more than one dot.
    pub fn parse(text: &str) -> QueryResult<Self> {
        let text = normalize(text);
        if text.is_empty() {
            return Err(QueryError::syntax("empty column reference"));
        }

        let parts: Vec<&str> = text.split('.').map(str::trim).collect();
        match parts.as_slice() {
            [column] => Ok(ColumnRef::Unqualified(column.to_string())),
            [table, column] if !table.is_empty() && !column.is_empty() => {
                Ok(ColumnRef::Qualified {
                    table: table.to_string(),
                    column: column.to_string(),
                })
            }
            _ => Err(QueryError::syntax(format!(
                "invalid column reference '{}'",
                text
            ))),
        }
    }

    /// Returns the column name part
    pub fn column(&self) -> &str {
        match self {
            ColumnRef::Qualified { column, .. } => column,
            ColumnRef::Unqualified(column) => column,
        }
    }

    /// Returns the table name if qualified
    pub fn table(&self) -> Option<&str> {
        match self {
            ColumnRef::Qualified { table, .. } => Some(table),
            ColumnRef::Unqualified(_) => None,
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Qualified { table, column } => write!(f, "{}.{}", table, column),
            ColumnRef::Unqualified(column) => write!(f, "{}", column),
        }
    }
}

/// A column reference bound to exactly one table in scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedColumn {
    /// Owning table
    pub table: String,
    /// Column name
    pub column: String,
    /// Position within the owning table's rows
    pub index: usize,
}

impl ResolvedColumn {
    /// Output header label, `table.column`
    pub fn label(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

impl fmt::Display for ResolvedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        let schema = TableSchema::new("table1", vec!["A".into(), "B".into(), "C".into()]);
        assert_eq!(schema.column_index("B"), Some(1));
        assert_eq!(schema.column_index("D"), None);
        assert_eq!(schema.width(), 3);
    }

    #[test]
    fn test_parse_qualified() {
        let r = ColumnRef::parse(" table1 . A ").unwrap();
        assert_eq!(r.table(), Some("table1"));
        assert_eq!(r.column(), "A");
        assert_eq!(r.to_string(), "table1.A");
    }

    #[test]
    fn test_parse_unqualified() {
        let r = ColumnRef::parse("A").unwrap();
        assert_eq!(r, ColumnRef::Unqualified("A".into()));
        assert_eq!(r.table(), None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ColumnRef::parse("").is_err());
        assert!(ColumnRef::parse("a.b.c").is_err());
        assert!(ColumnRef::parse(".b").is_err());
        assert!(ColumnRef::parse("a.").is_err());
    }
}
