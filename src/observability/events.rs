//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in a minisql run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Metadata file read into the catalog
    MetadataLoaded,
    /// Statement text parsed
    StatementParsed,
    /// Execution path selected
    PlanSelected,
    /// Table data read for a statement
    TableLoaded,
    /// Statement executed and written
    StatementComplete,
    /// Multi-column distinct padded columns of different lengths
    DistinctColumnsUnaligned,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::MetadataLoaded => "METADATA_LOADED",
            Event::StatementParsed => "STATEMENT_PARSED",
            Event::PlanSelected => "PLAN_SELECTED",
            Event::TableLoaded => "TABLE_LOADED",
            Event::StatementComplete => "STATEMENT_COMPLETE",
            Event::DistinctColumnsUnaligned => "DISTINCT_COLUMNS_UNALIGNED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StatementParsed | Event::TableLoaded => Severity::Trace,
            Event::DistinctColumnsUnaligned => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
