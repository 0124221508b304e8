//! Query Executor subsystem for minisql
//!
//! The executor consumes plans and produces deterministic result blocks.
//!
//! # Execution paths
//!
//! - Scan / filtered scan: rows in table order, projected per column
//! - Aggregate: one row, one value per call
//! - Distinct: first-occurrence values, columns padded to equal length
//! - Cross join / filtered join: outer loop over the first `from` table,
//!   inner loop over the second
//!
//! Tables are read-only for the whole statement.

mod aggregate;
mod executor;
mod filters;
mod join;
mod result;

pub use aggregate::DISTINCT_PADDING;
pub use executor::QueryExecutor;
pub use filters::{ConditionFilter, JoinedRow, RowScope, SingleRow};
pub use join::JoinEngine;
pub use result::{ResultBlock, ResultSet};
