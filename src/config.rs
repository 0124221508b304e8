//! Configuration file structure
//!
//! A JSON object; every field is optional. Command-line flags override
//! file values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{QueryError, QueryResult};
use crate::observability::Severity;

/// minisql configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Metadata file (default "metadata.txt")
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,

    /// Directory holding one data file per table (default ".")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Data file extension without the dot (default "csv")
    #[serde(default = "default_table_extension")]
    pub table_extension: String,

    /// Field delimiter, a single ASCII character (default ",")
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Minimum log severity (default "error")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_metadata_path() -> String {
    "metadata.txt".to_string()
}
fn default_data_dir() -> String {
    ".".to_string()
}
fn default_table_extension() -> String {
    "csv".to_string()
}
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_log_level() -> String {
    "error".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metadata_path: default_metadata_path(),
            data_dir: default_data_dir(),
            table_extension: default_table_extension(),
            delimiter: default_delimiter(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> QueryResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QueryError::config(format!(
                "Failed to read config '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| QueryError::config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> QueryResult<()> {
        if self.metadata_path.trim().is_empty() {
            return Err(QueryError::config("metadata_path must not be empty"));
        }

        if self.table_extension.trim().is_empty() {
            return Err(QueryError::config("table_extension must not be empty"));
        }

        self.delimiter_byte()?;
        self.severity()?;

        Ok(())
    }

    /// Delimiter as the byte the reader expects
    pub fn delimiter_byte(&self) -> QueryResult<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() && !b.is_ascii_alphanumeric() && *b != b'"' && *b != b'\n' => {
                Ok(*b)
            }
            _ => Err(QueryError::config(format!(
                "Invalid delimiter: '{}'. Expected one ASCII punctuation or whitespace character.",
                self.delimiter
            ))),
        }
    }

    /// Parsed log level
    pub fn severity(&self) -> QueryResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            QueryError::config(format!(
                "Invalid log_level: '{}'. Expected trace, info, warn, error or fatal.",
                self.log_level
            ))
        })
    }

    /// Metadata file as Path
    pub fn metadata_path(&self) -> PathBuf {
        PathBuf::from(&self.metadata_path)
    }

    /// Data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}
