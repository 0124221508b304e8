//! Parsed query structures
//!
//! A statement parses into a projection, a source table list and an optional
//! filter text. The projection kinds are mutually exclusive by construction.

use std::fmt;

use crate::errors::{QueryError, QueryResult};
use crate::schema::ColumnRef;

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    Max,
    Min,
    Sum,
    Avg,
}

impl AggregateFunction {
    /// Looks up a function by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "max" => Some(AggregateFunction::Max),
            "min" => Some(AggregateFunction::Min),
            "sum" => Some(AggregateFunction::Sum),
            "avg" => Some(AggregateFunction::Avg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Max => "max",
            AggregateFunction::Min => "min",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `function(column)` in the select list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCall {
    pub function: AggregateFunction,
    pub column: ColumnRef,
}

/// What the select list asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `*`
    All,
    /// Plain column references, in select-list order
    Columns(Vec<ColumnRef>),
    /// Aggregate calls, in select-list order
    Aggregates(Vec<AggregateCall>),
    /// `distinct(column)` calls, in select-list order
    Distinct(Vec<ColumnRef>),
}

impl Projection {
    /// Returns true for aggregate or distinct projections
    pub fn is_computed(&self) -> bool {
        matches!(self, Projection::Aggregates(_) | Projection::Distinct(_))
    }
}

/// A parsed `select ... from ... [where ...]` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Select list
    pub projection: Projection,
    /// Source tables in `from` order
    pub tables: Vec<String>,
    /// Raw filter text after `where`, whitespace-normalized
    pub filter: Option<String>,
}

impl ParsedQuery {
    /// Checks clause combinations that cannot be executed together.
    pub fn validate(&self) -> QueryResult<()> {
        if self.filter.is_some() && self.projection.is_computed() {
            return Err(QueryError::unsupported(
                "where condition can only be given to project columns",
            ));
        }
        if self.tables.len() > 2 {
            return Err(QueryError::unsupported(
                "at most two tables can be given in 'from'",
            ));
        }
        Ok(())
    }
}
