//! Statement orchestration
//!
//! parse → plan → load referenced tables → execute. Planning finishes
//! before any table data is read, and each statement loads its tables
//! fresh from the source.

use crate::config::Config;
use crate::errors::QueryResult;
use crate::executor::{QueryExecutor, ResultSet};
use crate::observability::{log_event_with_fields, Event};
use crate::planner::{ExplainPlan, QueryParser, QueryPlan, QueryPlanner};
use crate::schema::{MetadataLoader, SchemaCatalog};
use crate::storage::{CsvTableSource, TableSet, TableSource};

/// A schema catalog bound to a table data source
pub struct QueryEngine<S: TableSource> {
    catalog: SchemaCatalog,
    source: S,
}

impl QueryEngine<CsvTableSource> {
    /// Loads the metadata file and binds the CSV data directory named by `config`.
    pub fn open(config: &Config) -> QueryResult<Self> {
        let path = config.metadata_path();
        let catalog = MetadataLoader::load(&path)?;
        let names: Vec<&str> = catalog.tables().map(|t| t.name.as_str()).collect();
        log_event_with_fields(
            Event::MetadataLoaded,
            &[
                ("names", &names.join(",")),
                ("path", &path.display().to_string()),
                ("tables", &catalog.table_count().to_string()),
            ],
        );

        let source = CsvTableSource::new(config.data_path())
            .with_extension(config.table_extension.clone())
            .with_delimiter(config.delimiter_byte()?);
        Ok(Self::new(catalog, source))
    }
}

impl<S: TableSource> QueryEngine<S> {
    /// Creates an engine over an already loaded catalog
    pub fn new(catalog: SchemaCatalog, source: S) -> Self {
        Self { catalog, source }
    }

    /// The schema catalog
    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Parses and plans one statement without reading table data.
    pub fn plan(&self, statement: &str) -> QueryResult<QueryPlan> {
        let query = QueryParser::parse(statement)?;
        log_event_with_fields(
            Event::StatementParsed,
            &[("statement", statement), ("tables", &query.tables.join(","))],
        );

        let plan = QueryPlanner::new(&self.catalog).plan(&query)?;
        log_event_with_fields(Event::PlanSelected, &[("path", plan.kind())]);
        Ok(plan)
    }

    /// Runs one statement to completion.
    pub fn run(&self, statement: &str) -> QueryResult<ResultSet> {
        let plan = self.plan(statement)?;

        let mut tables = TableSet::new();
        for name in plan.tables() {
            let table = self.source.load(self.catalog.lookup_table(name)?)?;
            log_event_with_fields(
                Event::TableLoaded,
                &[("rows", &table.len().to_string()), ("table", name)],
            );
            tables.insert(table);
        }

        let result = QueryExecutor::new(&tables).execute(&plan)?;
        log_event_with_fields(
            Event::StatementComplete,
            &[
                ("path", plan.kind()),
                ("rows", &result.row_count().to_string()),
            ],
        );
        Ok(result)
    }

    /// Explains one statement. Planning errors become a rejected plan.
    pub fn explain(&self, statement: &str) -> ExplainPlan {
        match self.plan(statement) {
            Ok(plan) => ExplainPlan::from_plan(&plan),
            Err(e) => ExplainPlan::from_error(&e),
        }
    }
}
