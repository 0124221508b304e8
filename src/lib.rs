//! minisql - A small, deterministic SQL engine over in-memory CSV tables
//!
//! Supports `select` over one or two tables with `where`, `distinct`, and
//! the `max`/`min`/`sum`/`avg` aggregates. The table layout comes from a
//! metadata file; each table's rows come from a delimited text file.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod schema;
pub mod storage;
mod text;

pub use config::Config;
pub use engine::QueryEngine;
pub use errors::{QueryError, QueryResult};
