//! Row and table containers

use std::collections::HashMap;

use crate::errors::{QueryError, QueryResult};
use crate::schema::TableSchema;

/// One record, positionally aligned to its table's column order
pub type Row = Vec<String>;

/// A loaded table: every row has the schema's width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    width: usize,
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table, rejecting rows whose width differs from the schema.
    pub fn new(schema: &TableSchema, rows: Vec<Row>) -> QueryResult<Self> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != schema.width())
        {
            return Err(QueryError::malformed_table(
                &schema.name,
                format!(
                    "row {} has {} fields, expected {}",
                    i + 1,
                    row.len(),
                    schema.width()
                ),
            ));
        }

        Ok(Self {
            name: schema.name.clone(),
            width: schema.width(),
            rows,
        })
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column count
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows in load order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Tables loaded for one statement, keyed by name
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    tables: HashMap<String, Table>,
}

impl TableSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a loaded table
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Looks up a loaded table
    pub fn get(&self, name: &str) -> QueryResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| QueryError::unknown_table(name))
    }

    /// Number of loaded tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
