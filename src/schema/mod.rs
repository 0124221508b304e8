//! Schema catalog subsystem for minisql
//!
//! The catalog maps each table name to its ordered column list. It is loaded
//! once from the metadata file and never mutated afterwards.
//!
//! # Column resolution
//!
//! - Qualified (`table.column`): the table must be in the query's scope and
//!   own the column
//! - Bare (`column`): exactly one table in scope may own the column; zero
//!   matches is `UNKNOWN_COLUMN`, more than one is `AMBIGUOUS_COLUMN`

mod catalog;
mod loader;
mod types;

pub use catalog::SchemaCatalog;
pub use loader::MetadataLoader;
pub use types::{ColumnRef, ResolvedColumn, TableSchema};
