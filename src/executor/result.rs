//! Result types for query execution

use crate::storage::Row;

/// A header line plus its rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBlock {
    /// `table.column` labels
    pub header: Vec<String>,
    /// Rows in result order, aligned to `header`
    pub rows: Vec<Row>,
}

impl ResultBlock {
    /// Creates a new result block
    pub fn new(header: Vec<String>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of executing one statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Blocks in output order
    pub blocks: Vec<ResultBlock>,
}

impl ResultSet {
    /// A result with a single block
    pub fn single(block: ResultBlock) -> Self {
        Self {
            blocks: vec![block],
        }
    }

    /// Total rows across all blocks
    pub fn row_count(&self) -> usize {
        self.blocks.iter().map(ResultBlock::len).sum()
    }
}
