//! CLI command implementation
//!
//! Boot order: configuration, log level, metadata, then statements one at
//! a time. The first failing statement aborts the run; output already
//! written for earlier statements stays written.

use std::io::{self, Write};

use crate::config::Config;
use crate::engine::QueryEngine;
use crate::errors::QueryResult;
use crate::observability::Logger;
use crate::planner::QueryParser;
use crate::storage::TableSource;

use super::args::Cli;
use super::io::{write_explain, write_result};

/// Main entry point for CLI
pub fn run() -> QueryResult<()> {
    let cli = Cli::parse_args();
    let config = resolve_config(&cli)?;
    Logger::set_min_severity(config.severity()?);

    let engine = QueryEngine::open(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_statements(&engine, &cli.queries, cli.explain, &mut out)
}

/// Builds the effective configuration: file (or defaults), then flags.
pub fn resolve_config(cli: &Cli) -> QueryResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(metadata) = &cli.metadata {
        config.metadata_path = metadata.display().to_string();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.display().to_string();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Runs (or explains) each statement of `queries` in order.
///
/// Results of consecutive statements are separated by an empty line. The
/// separator is written only once the next statement has succeeded.
pub fn run_statements<S: TableSource, W: Write>(
    engine: &QueryEngine<S>,
    queries: &str,
    explain: bool,
    out: &mut W,
) -> QueryResult<()> {
    for (i, statement) in QueryParser::split_statements(queries).iter().enumerate() {
        if explain {
            let plan = engine.explain(statement);
            if i > 0 {
                writeln!(out)?;
            }
            write_explain(&plan, out)?;
        } else {
            let result = engine.run(statement)?;
            if i > 0 {
                writeln!(out)?;
            }
            write_result(&result, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaCatalog, TableSchema};
    use crate::storage::MemoryTableSource;
    use clap::Parser;

    fn engine() -> QueryEngine<MemoryTableSource> {
        let mut catalog = SchemaCatalog::new();
        catalog
            .register(TableSchema::new("table1", vec!["A".into(), "B".into()]))
            .unwrap();
        let source = MemoryTableSource::new().with_table("table1", &[&["1", "2"], &["3", "4"]]);
        QueryEngine::new(catalog, source)
    }

    fn output(queries: &str, explain: bool) -> (QueryResult<()>, String) {
        let mut out = Vec::new();
        let result = run_statements(&engine(), queries, explain, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_statements_in_order() {
        let (result, out) = output("select A from table1; ;select max(B) from table1;", false);
        result.unwrap();
        assert_eq!(out, "table1.A\n1\n3\n\ntable1.B\n4\n");
    }

    #[test]
    fn test_first_error_stops_run() {
        let (result, out) = output("select A from table1; select Z from table1; select B from table1", false);
        assert_eq!(result.unwrap_err().code(), "UNKNOWN_COLUMN");
        assert_eq!(out, "table1.A\n1\n3\n");
    }

    #[test]
    fn test_explain_mode() {
        let (result, out) = output("select A from table1 where B > 2", true);
        result.unwrap();
        assert!(out.starts_with("=== EXPLAIN PLAN ==="));
        assert!(out.contains("Path: FILTERED_SCAN"));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "minisql",
            "--metadata",
            "/data/meta.txt",
            "--log-level",
            "info",
            "select * from t",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.metadata_path, "/data/meta.txt");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.data_dir, ".");
    }

    #[test]
    fn test_bad_log_level_flag() {
        let cli = Cli::parse_from(["minisql", "--log-level", "chatty", "select * from t"]);
        assert_eq!(resolve_config(&cli).unwrap_err().code(), "CONFIG_ERROR");
    }
}
