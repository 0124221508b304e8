//! Condition evaluation
//!
//! Evaluates compiled conditions against one row or one joined row pair.
//! Column operands are looked up through a [`RowScope`]; literals are used
//! as written.

use crate::planner::{Combinator, Comparison, Condition, Operand};
use crate::schema::ResolvedColumn;
use crate::storage::{compare, Row};

/// Trait for reading column values out of the row(s) under evaluation
pub trait RowScope {
    /// Value of `column`, or None if its table is not bound in this scope
    fn value(&self, column: &ResolvedColumn) -> Option<&str>;
}

/// One row of one table
pub struct SingleRow<'a> {
    pub table: &'a str,
    pub row: &'a Row,
}

impl RowScope for SingleRow<'_> {
    fn value(&self, column: &ResolvedColumn) -> Option<&str> {
        if column.table != self.table {
            return None;
        }
        self.row.get(column.index).map(String::as_str)
    }
}

/// A left row paired with a right row
pub struct JoinedRow<'a> {
    pub left_table: &'a str,
    pub left: &'a Row,
    pub right_table: &'a str,
    pub right: &'a Row,
}

impl RowScope for JoinedRow<'_> {
    fn value(&self, column: &ResolvedColumn) -> Option<&str> {
        let row = if column.table == self.left_table {
            self.left
        } else if column.table == self.right_table {
            self.right
        } else {
            return None;
        };
        row.get(column.index).map(String::as_str)
    }
}

/// No row bound; only literal-only comparisons can hold
pub struct NoRow;

impl RowScope for NoRow {
    fn value(&self, _column: &ResolvedColumn) -> Option<&str> {
        None
    }
}

/// Evaluates conditions against row scopes
pub struct ConditionFilter;

impl ConditionFilter {
    /// Checks if the bound row(s) satisfy the condition
    pub fn matches(condition: &Condition, scope: &impl RowScope) -> bool {
        match condition {
            Condition::Leaf(leaf) => Self::matches_comparison(leaf, scope),
            Condition::Binary {
                left,
                combinator: Combinator::And,
                right,
            } => Self::matches_comparison(left, scope) && Self::matches_comparison(right, scope),
            Condition::Binary {
                left,
                combinator: Combinator::Or,
                right,
            } => Self::matches_comparison(left, scope) || Self::matches_comparison(right, scope),
        }
    }

    /// Checks a single leaf. An operand whose table is unbound never matches.
    pub fn matches_comparison(comparison: &Comparison, scope: &impl RowScope) -> bool {
        let left = match Self::operand_value(&comparison.left, scope) {
            Some(v) => v,
            None => return false,
        };
        let right = match Self::operand_value(&comparison.right, scope) {
            Some(v) => v,
            None => return false,
        };
        comparison.op.accepts(compare(left, right))
    }

    fn operand_value<'a>(operand: &'a Operand, scope: &'a impl RowScope) -> Option<&'a str> {
        match operand {
            Operand::Column(column) => scope.value(column),
            Operand::Literal(literal) => Some(literal),
        }
    }
}
