//! Explain output
//!
//! Describes the execution path chosen for a statement without reading any
//! table data. Output is deterministic.

use std::fmt;

use serde::Serialize;

use crate::errors::QueryError;

use super::planner::QueryPlan;

/// Explain plan output
#[derive(Debug, Clone, Serialize)]
pub struct ExplainPlan {
    /// Whether planning succeeded
    pub accepted: bool,
    /// Execution path (if accepted)
    pub path: Option<String>,
    /// Tables read, in `from` order
    pub tables: Vec<String>,
    /// Output columns or aggregate calls
    pub outputs: Vec<String>,
    /// Compiled filter
    pub condition: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a successful query plan
    pub fn from_plan(plan: &QueryPlan) -> Self {
        let (outputs, condition) = match plan {
            QueryPlan::Scan { columns, .. } => (labels(columns.iter()), None),
            QueryPlan::FilteredScan {
                columns, condition, ..
            } => (labels(columns.iter()), Some(condition.to_string())),
            QueryPlan::Aggregate { calls, .. } => (
                calls
                    .iter()
                    .map(|c| format!("{}({})", c.function, c.column))
                    .collect(),
                None,
            ),
            QueryPlan::Distinct { columns, .. } => (
                columns.iter().map(|c| format!("distinct({})", c)).collect(),
                None,
            ),
            QueryPlan::CrossJoin { projection, .. } => (labels(projection.columns()), None),
            QueryPlan::FilteredJoin {
                projection,
                condition,
                ..
            } => (labels(projection.columns()), Some(condition.to_string())),
        };

        Self {
            accepted: true,
            path: Some(plan.kind().to_string()),
            tables: plan.tables().into_iter().map(str::to_string).collect(),
            outputs,
            condition,
            rejection_code: None,
            rejection_reason: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(err: &QueryError) -> Self {
        Self {
            accepted: false,
            path: None,
            tables: Vec::new(),
            outputs: Vec::new(),
            condition: None,
            rejection_code: Some(err.code().to_string()),
            rejection_reason: Some(err.to_string()),
        }
    }
}

fn labels<'a>(columns: impl Iterator<Item = &'a crate::schema::ResolvedColumn>) -> Vec<String> {
    columns.map(|c| c.label()).collect()
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if self.accepted {
            writeln!(f, "Status: ACCEPTED")?;
            if let Some(path) = &self.path {
                writeln!(f, "Path: {}", path)?;
            }
            writeln!(f, "Tables: {}", self.tables.join(", "))?;
            if !self.outputs.is_empty() {
                writeln!(f, "Outputs:")?;
                for output in &self.outputs {
                    writeln!(f, "  - {}", output)?;
                }
            }
            if let Some(condition) = &self.condition {
                writeln!(f, "Condition: {}", condition)?;
            }
        } else {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
        }

        Ok(())
    }
}
