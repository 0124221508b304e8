//! Query executor for minisql
//!
//! Executes a plan against the tables loaded for its statement. Every
//! path builds its complete result before returning, so an error found
//! while evaluating rows leaves nothing half-written.

use crate::errors::QueryResult;
use crate::observability::{log_event_with_fields, Event};
use crate::planner::{ColumnGroups, Condition, JoinTables, QueryPlan, ResolvedAggregate};
use crate::schema::ResolvedColumn;
use crate::storage::{Row, Table, TableSet};

use super::aggregate::{aggregate, distinct_values, pad_columns};
use super::filters::{ConditionFilter, SingleRow};
use super::join::JoinEngine;
use super::result::{ResultBlock, ResultSet};

/// Query executor over one statement's tables
pub struct QueryExecutor<'a> {
    tables: &'a TableSet,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new executor
    pub fn new(tables: &'a TableSet) -> Self {
        Self { tables }
    }

    /// Executes a query plan and returns its result blocks.
    ///
    /// Deterministic: same plan + same data = same output.
    pub fn execute(&self, plan: &QueryPlan) -> QueryResult<ResultSet> {
        match plan {
            QueryPlan::Scan { table, columns } => {
                let table = self.tables.get(table)?;
                Ok(ResultSet::single(project(table.rows().iter(), columns)))
            }
            QueryPlan::FilteredScan {
                table,
                columns,
                condition,
            } => {
                let table = self.tables.get(table)?;
                Ok(ResultSet::single(self.filtered_scan(table, columns, condition)))
            }
            QueryPlan::Aggregate { calls, .. } => self.aggregate(calls).map(ResultSet::single),
            QueryPlan::Distinct { columns, .. } => self.distinct(columns).map(ResultSet::single),
            QueryPlan::CrossJoin { tables, projection } => self.cross_join(tables, projection),
            QueryPlan::FilteredJoin {
                tables,
                projection,
                condition,
            } => self
                .filtered_join(tables, projection, condition)
                .map(ResultSet::single),
        }
    }

    fn filtered_scan(&self, table: &Table, columns: &[ResolvedColumn], condition: &Condition) -> ResultBlock {
        let matching = table.rows().iter().filter(|row| {
            ConditionFilter::matches(
                condition,
                &SingleRow {
                    table: table.name(),
                    row,
                },
            )
        });
        project(matching, columns)
    }

    fn aggregate(&self, calls: &[ResolvedAggregate]) -> QueryResult<ResultBlock> {
        let mut header = Vec::with_capacity(calls.len());
        let mut values = Vec::with_capacity(calls.len());
        for call in calls {
            let table = self.tables.get(&call.column.table)?;
            values.push(aggregate(call, table)?);
            header.push(call.label());
        }
        Ok(ResultBlock::new(header, vec![values]))
    }

    fn distinct(&self, columns: &[ResolvedColumn]) -> QueryResult<ResultBlock> {
        let mut lists = Vec::with_capacity(columns.len());
        for column in columns {
            let table = self.tables.get(&column.table)?;
            lists.push(distinct_values(column, table));
        }

        let lengths: Vec<usize> = lists.iter().map(Vec::len).collect();
        if lengths.windows(2).any(|w| w[0] != w[1]) {
            let labels = columns.iter().map(|c| c.label()).collect::<Vec<_>>().join(",");
            let lengths = lengths
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(",");
            log_event_with_fields(
                Event::DistinctColumnsUnaligned,
                &[("columns", &labels), ("lengths", &lengths)],
            );
        }

        Ok(ResultBlock::new(labels(columns.iter()), pad_columns(lists)))
    }

    /// Unfiltered join. Columns from one table only are read straight from
    /// that table; columns from both tables project the Cartesian product.
    fn cross_join(&self, tables: &JoinTables, projection: &ColumnGroups) -> QueryResult<ResultSet> {
        if projection.table_count() == 1 {
            let mut blocks = Vec::new();
            for (table, columns) in &projection.groups {
                let table = self.tables.get(table)?;
                blocks.push(project(table.rows().iter(), columns));
            }
            return Ok(ResultSet { blocks });
        }

        let left = self.tables.get(&tables.left)?;
        let right = self.tables.get(&tables.right)?;
        let rows = JoinEngine::cross_join(left, right);
        Ok(ResultSet::single(joined_block(&rows, projection, left)))
    }

    fn filtered_join(
        &self,
        tables: &JoinTables,
        projection: &ColumnGroups,
        condition: &Condition,
    ) -> QueryResult<ResultBlock> {
        let left = self.tables.get(&tables.left)?;
        let right = self.tables.get(&tables.right)?;
        let rows = JoinEngine::filtered_join(left, right, condition);
        Ok(joined_block(&rows, projection, left))
    }
}

fn labels<'c>(columns: impl Iterator<Item = &'c ResolvedColumn>) -> Vec<String> {
    columns.map(ResolvedColumn::label).collect()
}

fn project<'r>(rows: impl Iterator<Item = &'r Row>, columns: &[ResolvedColumn]) -> ResultBlock {
    let rows = rows
        .map(|row| columns.iter().map(|c| row[c.index].clone()).collect())
        .collect();
    ResultBlock::new(labels(columns.iter()), rows)
}

fn joined_block(rows: &[Row], projection: &ColumnGroups, left: &Table) -> ResultBlock {
    let columns: Vec<&ResolvedColumn> = projection.columns().collect();
    let rows = JoinEngine::project(rows, &columns, left.name(), left.width());
    ResultBlock::new(labels(columns.into_iter()), rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{QueryParser, QueryPlanner};
    use crate::schema::{SchemaCatalog, TableSchema};

    fn schemas() -> Vec<TableSchema> {
        vec![
            TableSchema::new("table1", vec!["A".into(), "B".into()]),
            TableSchema::new("table2", vec!["B".into(), "C".into()]),
        ]
    }

    fn data() -> TableSet {
        let rows: [&[&[&str]]; 2] = [
            &[&["1", "10"], &["2", "20"], &["2", "30"]],
            &[&["10", "x"], &["30", "y"]],
        ];
        let mut set = TableSet::new();
        for (schema, rows) in schemas().iter().zip(rows) {
            let rows = rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect();
            set.insert(Table::new(schema, rows).unwrap());
        }
        set
    }

    fn run(sql: &str) -> QueryResult<ResultSet> {
        let mut catalog = SchemaCatalog::new();
        for schema in schemas() {
            catalog.register(schema).unwrap();
        }
        let plan = QueryPlanner::new(&catalog).plan(&QueryParser::parse(sql)?)?;
        let tables = data();
        QueryExecutor::new(&tables).execute(&plan)
    }

    fn only(result: ResultSet) -> ResultBlock {
        assert_eq!(result.blocks.len(), 1);
        result.blocks.into_iter().next().unwrap()
    }

    #[test]
    fn test_select_star() {
        let block = only(run("select * from table1").unwrap());
        assert_eq!(block.header, vec!["table1.A", "table1.B"]);
        assert_eq!(block.rows.len(), 3);
        assert_eq!(block.rows[2], vec!["2", "30"]);
    }

    #[test]
    fn test_filtered_scan() {
        let block = only(run("select B from table1 where A = 2").unwrap());
        assert_eq!(block.rows, vec![vec!["20"], vec!["30"]]);
    }

    #[test]
    fn test_aggregate_row() {
        let block = only(run("select max(A), sum(table1.B) from table1").unwrap());
        assert_eq!(block.header, vec!["table1.A", "table1.B"]);
        assert_eq!(block.rows, vec![vec!["2", "60"]]);

        let err = run("select min(A), avg(C) from table1, table2").unwrap_err();
        assert_eq!(err.code(), "AGGREGATE_TYPE_ERROR");
    }

    #[test]
    fn test_distinct_pads_shorter_column() {
        let block = only(run("select distinct(A), distinct(C) from table1, table2").unwrap());
        assert_eq!(block.header, vec!["table1.A", "table2.C"]);
        assert_eq!(block.rows, vec![vec!["1", "x"], vec!["2", "y"]]);

        let block = only(run("select distinct(table1.B), distinct(A) from table1").unwrap());
        assert_eq!(block.rows[2], vec!["30", ""]);
    }

    #[test]
    fn test_cross_join_single_table_columns() {
        let result = run("select A from table1, table2").unwrap();
        let block = only(result);
        assert_eq!(block.header, vec!["table1.A"]);
        assert_eq!(block.rows.len(), 3);
    }

    #[test]
    fn test_cross_join_both_tables() {
        let block = only(run("select C, A from table1, table2").unwrap());
        assert_eq!(block.header, vec!["table2.C", "table1.A"]);
        assert_eq!(block.rows.len(), 6);
        assert_eq!(block.rows[0], vec!["x", "1"]);
        assert_eq!(block.rows[1], vec!["y", "1"]);
    }

    #[test]
    fn test_filtered_join() {
        let block = only(run("select A, C from table1, table2 where table1.B = table2.B").unwrap());
        assert_eq!(block.rows, vec![vec!["1", "x"], vec!["2", "y"]]);
    }
}
