//! Table data sources
//!
//! Each table lives in its own delimited file, `<data_dir>/<table>.<ext>`,
//! one record per line, no header row. Data is read fresh for every
//! statement; nothing is cached between statements.

use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::PathBuf;

use csv::{ReaderBuilder, Trim};

use crate::errors::{QueryError, QueryResult};
use crate::schema::TableSchema;

use super::table::{Row, Table};

/// Trait for loading a table's rows
pub trait TableSource {
    /// Loads every row of the table described by `schema`, in file order.
    fn load(&self, schema: &TableSchema) -> QueryResult<Table>;
}

/// Reads tables from delimited files in a data directory
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    data_dir: PathBuf,
    extension: String,
    delimiter: u8,
}

impl CsvTableSource {
    /// Creates a source reading `<data_dir>/<table>.csv` with `,` delimiters
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            extension: "csv".to_string(),
            delimiter: b',',
        }
    }

    /// Sets the file extension (without the dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Path of the file backing `table`
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", table, self.extension))
    }
}

impl TableSource for CsvTableSource {
    fn load(&self, schema: &TableSchema) -> QueryResult<Table> {
        let path = self.table_path(&schema.name);
        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => QueryError::TableDataNotFound {
                table: schema.name.clone(),
                path: path.clone(),
            },
            _ => QueryError::Io(e),
        })?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(self.delimiter)
            .from_reader(file);

        let mut rows: Vec<Row> = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| QueryError::malformed_table(&schema.name, e.to_string()))?;
            if record.len() != schema.width() {
                let line = record.position().map_or(0, |p| p.line());
                return Err(QueryError::malformed_table(
                    &schema.name,
                    format!(
                        "line {} has {} fields, expected {}",
                        line,
                        record.len(),
                        schema.width()
                    ),
                ));
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Table::new(schema, rows)
    }
}

/// Serves tables held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryTableSource {
    tables: HashMap<String, Vec<Row>>,
}

impl MemoryTableSource {
    /// Creates an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a table's rows
    pub fn insert(&mut self, table: impl Into<String>, rows: Vec<Row>) {
        self.tables.insert(table.into(), rows);
    }

    /// Builder-style [`insert`](Self::insert) taking string slices
    pub fn with_table(mut self, table: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        self.insert(table, rows);
        self
    }
}

impl TableSource for MemoryTableSource {
    fn load(&self, schema: &TableSchema) -> QueryResult<Table> {
        let rows = self
            .tables
            .get(&schema.name)
            .ok_or_else(|| QueryError::TableDataNotFound {
                table: schema.name.clone(),
                path: PathBuf::from(&schema.name),
            })?;
        Table::new(schema, rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn schema() -> TableSchema {
        TableSchema::new("table1", vec!["A".into(), "B".into(), "C".into()])
    }

    #[test]
    fn test_load_csv() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("table1.csv"),
            "922,158,5727\n640,773,5058\n\"775\", 85 ,10164\n",
        )
        .unwrap();

        let table = CsvTableSource::new(dir.path()).load(&schema()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0], vec!["922", "158", "5727"]);
        assert_eq!(table.rows()[2], vec!["775", "85", "10164"]);
    }

    #[test]
    fn test_custom_extension_and_delimiter() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("table1.tsv"), "1\t2\t3\n").unwrap();

        let source = CsvTableSource::new(dir.path())
            .with_extension("tsv")
            .with_delimiter(b'\t');
        let table = source.load(&schema()).unwrap();
        assert_eq!(table.rows()[0], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = CsvTableSource::new(dir.path()).load(&schema()).unwrap_err();
        assert_eq!(err.code(), "TABLE_DATA_NOT_FOUND");
    }

    #[test]
    fn test_width_mismatch_reports_line() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("table1.csv"), "1,2,3\n4,5\n").unwrap();

        let err = CsvTableSource::new(dir.path()).load(&schema()).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_TABLE_DATA");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_memory_source() {
        let source = MemoryTableSource::new().with_table("table1", &[&["1", "2", "3"]]);
        let table = source.load(&schema()).unwrap();
        assert_eq!(table.len(), 1);

        let other = TableSchema::new("table2", vec!["X".into()]);
        assert_eq!(
            source.load(&other).unwrap_err().code(),
            "TABLE_DATA_NOT_FOUND"
        );
    }
}
