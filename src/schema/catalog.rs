//! Schema catalog: table name → ordered columns
//!
//! The catalog is immutable once loaded. It answers table lookups and binds
//! column references to exactly one table among those in a query's scope.

use std::collections::HashMap;

use crate::errors::{QueryError, QueryResult};

use super::types::{ColumnRef, ResolvedColumn, TableSchema};

/// In-memory registry of table schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    /// Schemas indexed by table name
    tables: HashMap<String, TableSchema>,
    /// Table names in definition order
    order: Vec<String>,
}

impl SchemaCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table schema.
    ///
    /// Rejects duplicate table names and duplicate columns within a table.
    pub fn register(&mut self, schema: TableSchema) -> QueryResult<()> {
        if self.tables.contains_key(&schema.name) {
            return Err(QueryError::malformed_metadata(format!(
                "table '{}' defined more than once",
                schema.name
            )));
        }

        for (i, column) in schema.columns.iter().enumerate() {
            if schema.columns[..i].contains(column) {
                return Err(QueryError::malformed_metadata(format!(
                    "column '{}' defined more than once in table '{}'",
                    column, schema.name
                )));
            }
        }

        self.order.push(schema.name.clone());
        self.tables.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Looks up a table's schema.
    pub fn lookup_table(&self, name: &str) -> QueryResult<&TableSchema> {
        self.tables
            .get(name)
            .ok_or_else(|| QueryError::unknown_table(name))
    }

    /// Checks if a table exists
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns all schemas in definition order
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.order.iter().filter_map(|name| self.tables.get(name))
    }

    /// Number of registered tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Binds a column reference to one table in `scope`.
    ///
    /// A qualified reference must name a table in scope that has the column.
    /// A bare reference must match exactly one table in scope.
    pub fn resolve(&self, column_ref: &ColumnRef, scope: &[String]) -> QueryResult<ResolvedColumn> {
        match column_ref {
            ColumnRef::Qualified { table, column } => {
                if !scope.iter().any(|t| t == table) {
                    return Err(QueryError::unknown_table(table));
                }
                let schema = self.lookup_table(table)?;
                let index = schema
                    .column_index(column)
                    .ok_or_else(|| QueryError::unknown_column_in(column, table))?;
                Ok(ResolvedColumn {
                    table: table.clone(),
                    column: column.clone(),
                    index,
                })
            }
            ColumnRef::Unqualified(column) => {
                let mut found: Option<ResolvedColumn> = None;
                for table in scope {
                    let schema = self.lookup_table(table)?;
                    if let Some(index) = schema.column_index(column) {
                        if found.is_some() {
                            return Err(QueryError::ambiguous_column(column));
                        }
                        found = Some(ResolvedColumn {
                            table: table.clone(),
                            column: column.clone(),
                            index,
                        });
                    }
                }
                found.ok_or_else(|| QueryError::unknown_column(column))
            }
        }
    }

    /// Resolves every column of `table`, in schema order (the `*` expansion).
    pub fn all_columns(&self, table: &str) -> QueryResult<Vec<ResolvedColumn>> {
        let schema = self.lookup_table(table)?;
        Ok(schema
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| ResolvedColumn {
                table: schema.name.clone(),
                column: column.clone(),
                index,
            })
            .collect())
    }
}
