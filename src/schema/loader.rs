//! Metadata loader
//!
//! Reads table definitions in block form:
//!
//! ```text
//! <begin_table>
//! table1
//! A
//! B
//! <end_table>
//! ```
//!
//! A missing metadata file is fatal (`METADATA_NOT_FOUND`).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::{QueryError, QueryResult};
use crate::text::normalize;

use super::catalog::SchemaCatalog;
use super::types::TableSchema;

const BEGIN_TABLE: &str = "<begin_table>";
const END_TABLE: &str = "<end_table>";

/// Parser state while scanning metadata lines
enum Block {
    /// Between blocks
    Outside,
    /// After `<begin_table>`, expecting the table name
    Name,
    /// Collecting columns for a named table
    Columns(TableSchema),
}

/// Loads the schema catalog from a metadata file
pub struct MetadataLoader;

impl MetadataLoader {
    /// Reads and parses the metadata file at `path`.
    pub fn load(path: &Path) -> QueryResult<SchemaCatalog> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => QueryError::MetadataNotFound(path.to_path_buf()),
            _ => QueryError::Io(e),
        })?;
        Self::parse(&content)
    }

    /// Parses metadata text into a catalog.
    pub fn parse(content: &str) -> QueryResult<SchemaCatalog> {
        let mut catalog = SchemaCatalog::new();
        let mut block = Block::Outside;

        for (line_no, raw) in content.lines().enumerate() {
            let line = normalize(raw);
            if line.is_empty() {
                continue;
            }

            block = match (block, line.as_str()) {
                (Block::Outside, BEGIN_TABLE) => Block::Name,
                (Block::Outside, _) => {
                    return Err(QueryError::malformed_metadata(format!(
                        "line {}: '{}' outside of a table block",
                        line_no + 1,
                        line
                    )));
                }
                (Block::Name, BEGIN_TABLE | END_TABLE) => {
                    return Err(QueryError::malformed_metadata(format!(
                        "line {}: table block without a name",
                        line_no + 1
                    )));
                }
                (Block::Name, name) => Block::Columns(TableSchema::new(name, Vec::new())),
                (Block::Columns(schema), END_TABLE) => {
                    catalog.register(schema)?;
                    Block::Outside
                }
                (Block::Columns(schema), BEGIN_TABLE) => {
                    return Err(QueryError::malformed_metadata(format!(
                        "line {}: table '{}' is not terminated",
                        line_no + 1,
                        schema.name
                    )));
                }
                (Block::Columns(mut schema), column) => {
                    schema.columns.push(column.to_string());
                    Block::Columns(schema)
                }
            };
        }

        match block {
            Block::Outside => Ok(catalog),
            Block::Name => Err(QueryError::malformed_metadata(
                "table block without a name at end of file",
            )),
            Block::Columns(schema) => Err(QueryError::malformed_metadata(format!(
                "table '{}' is not terminated",
                schema.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "<begin_table>\ntable1\nA\nB\nC\n<end_table>\n\
                          <begin_table>\ntable2\nD\nE\n<end_table>\n";

    #[test]
    fn test_parse_blocks() {
        let catalog = MetadataLoader::parse(SAMPLE).unwrap();
        assert_eq!(catalog.table_count(), 2);
        assert_eq!(
            catalog.lookup_table("table1").unwrap().columns,
            vec!["A", "B", "C"]
        );
        assert_eq!(catalog.lookup_table("table2").unwrap().columns, vec!["D", "E"]);
    }

    #[test]
    fn test_blank_lines_and_padding_ignored() {
        let text = "\n  <begin_table>  \n  table1 \n\n A \r\n<end_table>\n\n";
        let catalog = MetadataLoader::parse(text).unwrap();
        assert_eq!(catalog.lookup_table("table1").unwrap().columns, vec!["A"]);
    }

    #[test]
    fn test_unterminated_block() {
        let err = MetadataLoader::parse("<begin_table>\nt\nA\n").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_METADATA");

        let err = MetadataLoader::parse("<begin_table>\nt\nA\n<begin_table>\nu\n<end_table>")
            .unwrap_err();
        assert_eq!(err.code(), "MALFORMED_METADATA");
    }

    #[test]
    fn test_column_outside_block() {
        let err = MetadataLoader::parse("A\n").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_METADATA");
    }

    #[test]
    fn test_missing_name() {
        let err = MetadataLoader::parse("<begin_table>\n<end_table>\n").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_METADATA");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.txt");
        fs::write(&path, SAMPLE).unwrap();

        let catalog = MetadataLoader::load(&path).unwrap();
        assert!(catalog.contains("table2"));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = MetadataLoader::load(&dir.path().join("metadata.txt")).unwrap_err();
        assert_eq!(err.code(), "METADATA_NOT_FOUND");
    }
}
