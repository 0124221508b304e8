//! Query planner subsystem for minisql
//!
//! Turns statement text into an immutable, fully bound plan.
//!
//! # Pipeline
//!
//! 1. Parse: keyword splits produce a [`ParsedQuery`]
//! 2. Validate: clause combinations are checked before anything is bound
//! 3. Plan: tables and columns are bound to the catalog, the filter is
//!    compiled, and exactly one execution path is selected
//!
//! Planning never reads table data.

mod ast;
mod condition;
mod explain;
mod parser;
mod planner;

pub use ast::{AggregateCall, AggregateFunction, ParsedQuery, Projection};
pub use condition::{Combinator, CompareOp, Comparison, Condition, Operand};
pub use explain::ExplainPlan;
pub use parser::QueryParser;
pub use planner::{ColumnGroups, JoinTables, QueryPlan, QueryPlanner, ResolvedAggregate};
