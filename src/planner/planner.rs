//! Query planner
//!
//! Binds a parsed statement to the catalog and selects exactly one
//! execution path. Path selection (strict priority order):
//! 1. Filter over one table → filtered scan
//! 2. Filter over two tables → filtered join
//! 3. Aggregate calls → aggregate
//! 4. Distinct calls → distinct
//! 5. Two tables → cross join
//! 6. Otherwise → plain scan
//!
//! All table lookups, column resolution and condition compilation happen
//! here, so a statement that fails planning never touches table data.

use serde::Serialize;

use crate::errors::QueryResult;
use crate::schema::{ColumnRef, ResolvedColumn, SchemaCatalog};

use super::ast::{AggregateFunction, ParsedQuery, Projection};
use super::condition::Condition;

/// An aggregate call bound to its column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAggregate {
    pub function: AggregateFunction,
    pub column: ResolvedColumn,
}

impl ResolvedAggregate {
    /// Output header label
    pub fn label(&self) -> String {
        self.column.label()
    }
}

/// The two sides of a join, in `from` order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinTables {
    /// First table named in `from`; its columns come first in joined rows
    pub left: String,
    /// Second table named in `from`
    pub right: String,
}

/// Projected columns grouped per table, tables in first-reference order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnGroups {
    pub groups: Vec<(String, Vec<ResolvedColumn>)>,
}

impl ColumnGroups {
    fn push(&mut self, column: ResolvedColumn) {
        match self.groups.iter_mut().find(|(t, _)| *t == column.table) {
            Some((_, columns)) => columns.push(column),
            None => self.groups.push((column.table.clone(), vec![column])),
        }
    }

    /// Columns in output order: the first-referenced table's columns first
    pub fn columns(&self) -> impl Iterator<Item = &ResolvedColumn> {
        self.groups.iter().flat_map(|(_, columns)| columns.iter())
    }

    /// Number of distinct tables referenced
    pub fn table_count(&self) -> usize {
        self.groups.len()
    }
}

/// Execution path chosen for a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Projection over one table
    Scan {
        table: String,
        columns: Vec<ResolvedColumn>,
    },
    /// Filtered projection over one table
    FilteredScan {
        table: String,
        columns: Vec<ResolvedColumn>,
        condition: Condition,
    },
    /// Aggregates over one or two tables; one result row
    Aggregate {
        tables: Vec<String>,
        calls: Vec<ResolvedAggregate>,
    },
    /// Distinct value lists, padded to equal length
    Distinct {
        tables: Vec<String>,
        columns: Vec<ResolvedColumn>,
    },
    /// Unfiltered two-table projection
    CrossJoin {
        tables: JoinTables,
        projection: ColumnGroups,
    },
    /// Filtered two-table join
    FilteredJoin {
        tables: JoinTables,
        projection: ColumnGroups,
        condition: Condition,
    },
}

impl QueryPlan {
    /// Short name of the execution path
    pub fn kind(&self) -> &'static str {
        match self {
            QueryPlan::Scan { .. } => "SCAN",
            QueryPlan::FilteredScan { .. } => "FILTERED_SCAN",
            QueryPlan::Aggregate { .. } => "AGGREGATE",
            QueryPlan::Distinct { .. } => "DISTINCT",
            QueryPlan::CrossJoin { .. } => "CROSS_JOIN",
            QueryPlan::FilteredJoin { .. } => "FILTERED_JOIN",
        }
    }

    /// Tables whose data must be loaded, in `from` order
    pub fn tables(&self) -> Vec<&str> {
        match self {
            QueryPlan::Scan { table, .. } | QueryPlan::FilteredScan { table, .. } => {
                vec![table.as_str()]
            }
            QueryPlan::Aggregate { tables, .. } | QueryPlan::Distinct { tables, .. } => {
                tables.iter().map(String::as_str).collect()
            }
            QueryPlan::CrossJoin { tables, .. } | QueryPlan::FilteredJoin { tables, .. } => {
                vec![tables.left.as_str(), tables.right.as_str()]
            }
        }
    }
}

/// Query planner bound to a schema catalog
pub struct QueryPlanner<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> QueryPlanner<'a> {
    /// Creates a new planner
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Plans a parsed statement.
    pub fn plan(&self, query: &ParsedQuery) -> QueryResult<QueryPlan> {
        query.validate()?;
        for table in &query.tables {
            self.catalog.lookup_table(table)?;
        }
        let scope = &query.tables;

        if let Some(filter) = &query.filter {
            let condition = Condition::compile(filter, self.catalog, scope)?;
            return match scope.as_slice() {
                [table] => Ok(QueryPlan::FilteredScan {
                    table: table.clone(),
                    columns: self.scan_columns(&query.projection, table)?,
                    condition,
                }),
                _ => Ok(QueryPlan::FilteredJoin {
                    tables: join_tables(scope),
                    projection: self.column_groups(&query.projection, scope)?,
                    condition,
                }),
            };
        }

        match &query.projection {
            Projection::Aggregates(calls) => {
                let calls = calls
                    .iter()
                    .map(|call| {
                        Ok(ResolvedAggregate {
                            function: call.function,
                            column: self.catalog.resolve(&call.column, scope)?,
                        })
                    })
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(QueryPlan::Aggregate {
                    tables: scope.clone(),
                    calls,
                })
            }
            Projection::Distinct(columns) => Ok(QueryPlan::Distinct {
                tables: scope.clone(),
                columns: self.resolve_all(columns, scope)?,
            }),
            projection if scope.len() > 1 => Ok(QueryPlan::CrossJoin {
                tables: join_tables(scope),
                projection: self.column_groups(projection, scope)?,
            }),
            projection => {
                let table = &scope[0];
                Ok(QueryPlan::Scan {
                    table: table.clone(),
                    columns: self.scan_columns(projection, table)?,
                })
            }
        }
    }

    fn resolve_all(&self, columns: &[ColumnRef], scope: &[String]) -> QueryResult<Vec<ResolvedColumn>> {
        columns
            .iter()
            .map(|c| self.catalog.resolve(c, scope))
            .collect()
    }

    /// Columns of a single-table projection; `*` expands in schema order.
    fn scan_columns(&self, projection: &Projection, table: &str) -> QueryResult<Vec<ResolvedColumn>> {
        match projection {
            Projection::Columns(columns) => self.resolve_all(columns, &[table.to_string()]),
            _ => self.catalog.all_columns(table),
        }
    }

    /// Columns of a two-table projection grouped per owning table.
    fn column_groups(&self, projection: &Projection, scope: &[String]) -> QueryResult<ColumnGroups> {
        let columns = match projection {
            Projection::Columns(columns) => self.resolve_all(columns, scope)?,
            _ => {
                let mut all = Vec::new();
                for table in scope {
                    all.extend(self.catalog.all_columns(table)?);
                }
                all
            }
        };

        let mut groups = ColumnGroups { groups: Vec::new() };
        for column in columns {
            groups.push(column);
        }
        Ok(groups)
    }
}

fn join_tables(scope: &[String]) -> JoinTables {
    JoinTables {
        left: scope[0].clone(),
        right: scope[1].clone(),
    }
}
