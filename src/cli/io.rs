//! Result output
//!
//! Each block is a header line of comma-joined `table.column` labels
//! followed by one comma-joined line per row. Blocks of one statement are
//! separated by an empty line.

use std::io::Write;

use crate::errors::QueryResult;
use crate::executor::{ResultBlock, ResultSet};
use crate::planner::ExplainPlan;

/// Write every block of a statement's result
pub fn write_result<W: Write>(result: &ResultSet, out: &mut W) -> QueryResult<()> {
    for (i, block) in result.blocks.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        write_block(block, out)?;
    }
    out.flush()?;
    Ok(())
}

fn write_block<W: Write>(block: &ResultBlock, out: &mut W) -> QueryResult<()> {
    writeln!(out, "{}", block.header.join(","))?;
    for row in &block.rows {
        writeln!(out, "{}", row.join(","))?;
    }
    Ok(())
}

/// Write an explain plan
pub fn write_explain<W: Write>(plan: &ExplainPlan, out: &mut W) -> QueryResult<()> {
    write!(out, "{}", plan)?;
    out.flush()?;
    Ok(())
}
