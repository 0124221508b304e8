//! Error types for minisql
//!
//! Every failure is fatal at the statement level: nothing is retried and no
//! partial result is produced. Each variant carries a stable code used by
//! the CLI when reporting to stderr.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for all query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query processing errors
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed select/from/where structure
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Table absent from the catalog or from the query's scope
    #[error("No such table '{0}' exists")]
    UnknownTable(String),

    /// Column absent from every table in scope
    #[error("No such column '{column}' found{}", in_table(.table))]
    UnknownColumn {
        column: String,
        table: Option<String>,
    },

    /// Unqualified column present in more than one table in scope
    #[error("Ambiguous column name '{0}' given")]
    AmbiguousColumn(String),

    /// Clauses that cannot be combined in one statement
    #[error("Unsupported clause combination: {0}")]
    UnsupportedClauseCombination(String),

    /// Non-integer value found in an aggregate's source column, or a sum
    /// leaving the 128-bit range
    #[error("Cannot aggregate '{column}': value '{value}' is not a 128-bit integer")]
    AggregateType { column: String, value: String },

    /// Extremum or average requested over zero rows
    #[error("{function}({column}) is undefined over an empty table")]
    EmptyDomain { function: String, column: String },

    /// Metadata file missing
    #[error("No metadata file '{}' found", .0.display())]
    MetadataNotFound(PathBuf),

    /// Metadata file present but not well formed
    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    /// Table data file missing
    #[error("No file for given table '{table}' found at '{}'", .path.display())]
    TableDataNotFound { table: String, path: PathBuf },

    /// Table data present but not aligned with the schema
    #[error("Malformed data for table '{table}': {reason}")]
    MalformedTableData { table: String, reason: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure while reading input or writing output
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn in_table(table: &Option<String>) -> String {
    match table {
        Some(t) => format!(" in table '{}'", t),
        None => String::new(),
    }
}

impl QueryError {
    /// Create a syntax error
    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }

    /// Create an unknown table error
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::UnknownTable(table.into())
    }

    /// Create an unknown column error for an unqualified lookup
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            table: None,
        }
    }

    /// Create an unknown column error for a lookup in a named table
    pub fn unknown_column_in(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            table: Some(table.into()),
        }
    }

    /// Create an ambiguous column error
    pub fn ambiguous_column(column: impl Into<String>) -> Self {
        Self::AmbiguousColumn(column.into())
    }

    /// Create an unsupported clause combination error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedClauseCombination(msg.into())
    }

    /// Create a malformed metadata error
    pub fn malformed_metadata(msg: impl Into<String>) -> Self {
        Self::MalformedMetadata(msg.into())
    }

    /// Create a malformed table data error
    pub fn malformed_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTableData {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Syntax(_) => "SYNTAX_ERROR",
            Self::UnknownTable(_) => "UNKNOWN_TABLE",
            Self::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            Self::AmbiguousColumn(_) => "AMBIGUOUS_COLUMN",
            Self::UnsupportedClauseCombination(_) => "UNSUPPORTED_CLAUSE_COMBINATION",
            Self::AggregateType { .. } => "AGGREGATE_TYPE_ERROR",
            Self::EmptyDomain { .. } => "EMPTY_DOMAIN",
            Self::MetadataNotFound(_) => "METADATA_NOT_FOUND",
            Self::MalformedMetadata(_) => "MALFORMED_METADATA",
            Self::TableDataNotFound { .. } => "TABLE_DATA_NOT_FOUND",
            Self::MalformedTableData { .. } => "MALFORMED_TABLE_DATA",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}
