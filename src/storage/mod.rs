//! Table storage subsystem for minisql
//!
//! Cells are stored as text and classified only when compared or
//! aggregated. Tables are loaded per statement and are read-only once
//! loaded.

mod reader;
mod table;
mod value;

pub use reader::{CsvTableSource, MemoryTableSource, TableSource};
pub use table::{Row, Table, TableSet};
pub use value::{compare, parse_integer, Value};
