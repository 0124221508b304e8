//! Two-table join engine
//!
//! Joined rows are the left row followed by the right row. Result order is
//! always outer loop over left rows, inner loop over right rows.
//!
//! A filtered join classifies each leaf by the tables it references:
//! single-table leaves are evaluated once per row of that table (narrowing),
//! two-table leaves once per row pair, and literal-only leaves once.

use crate::planner::{Combinator, Comparison, Condition};
use crate::schema::ResolvedColumn;
use crate::storage::{Row, Table};

use super::filters::{ConditionFilter, JoinedRow, NoRow, SingleRow};

/// Precomputed evaluation of one leaf
enum LeafMatcher<'a> {
    /// Per-row result over the left table
    Left(Vec<bool>),
    /// Per-row result over the right table
    Right(Vec<bool>),
    /// Evaluated per row pair
    Pairwise(&'a Comparison),
    /// References no column
    Constant(bool),
}

impl<'a> LeafMatcher<'a> {
    fn build(leaf: &'a Comparison, left: &Table, right: &Table) -> Self {
        let tables = leaf.tables();
        let only = |name: &str| tables.iter().all(|t| *t == name);

        if tables.is_empty() {
            LeafMatcher::Constant(ConditionFilter::matches_comparison(leaf, &NoRow))
        } else if only(left.name()) {
            LeafMatcher::Left(mask(leaf, left))
        } else if only(right.name()) {
            LeafMatcher::Right(mask(leaf, right))
        } else {
            LeafMatcher::Pairwise(leaf)
        }
    }

    fn holds(&self, i: usize, j: usize, left: &Table, right: &Table) -> bool {
        match self {
            LeafMatcher::Left(mask) => mask[i],
            LeafMatcher::Right(mask) => mask[j],
            LeafMatcher::Constant(value) => *value,
            LeafMatcher::Pairwise(leaf) => ConditionFilter::matches_comparison(
                leaf,
                &JoinedRow {
                    left_table: left.name(),
                    left: &left.rows()[i],
                    right_table: right.name(),
                    right: &right.rows()[j],
                },
            ),
        }
    }
}

fn mask(leaf: &Comparison, table: &Table) -> Vec<bool> {
    table
        .rows()
        .iter()
        .map(|row| {
            ConditionFilter::matches_comparison(
                leaf,
                &SingleRow {
                    table: table.name(),
                    row,
                },
            )
        })
        .collect()
}

/// Join operations over two loaded tables
pub struct JoinEngine;

impl JoinEngine {
    /// Full Cartesian product, left-then-right concatenation
    pub fn cross_join(left: &Table, right: &Table) -> Vec<Row> {
        let mut rows = Vec::with_capacity(left.len() * right.len());
        for l in left.rows() {
            for r in right.rows() {
                rows.push(concat(l, r));
            }
        }
        rows
    }

    /// Row pairs satisfying `condition`, each pair at most once
    pub fn filtered_join(left: &Table, right: &Table, condition: &Condition) -> Vec<Row> {
        let matchers: Vec<LeafMatcher> = condition
            .leaves()
            .into_iter()
            .map(|leaf| LeafMatcher::build(leaf, left, right))
            .collect();

        match condition.combinator() {
            Some(Combinator::Or) => Self::pairs_where(left, right, |i, j| {
                matchers.iter().any(|m| m.holds(i, j, left, right))
            }),
            _ => {
                // Narrow each side by its own leaves first, then check the rest per pair
                let lefts = narrowed(&matchers, left.len(), |m, i| match m {
                    LeafMatcher::Left(mask) => mask[i],
                    LeafMatcher::Constant(value) => *value,
                    _ => true,
                });
                let rights = narrowed(&matchers, right.len(), |m, j| match m {
                    LeafMatcher::Right(mask) => mask[j],
                    _ => true,
                });
                let pairwise: Vec<&LeafMatcher> = matchers
                    .iter()
                    .filter(|m| matches!(m, LeafMatcher::Pairwise(_)))
                    .collect();

                let mut rows = Vec::new();
                for &i in &lefts {
                    for &j in &rights {
                        if pairwise.iter().all(|m| m.holds(i, j, left, right)) {
                            rows.push(concat(&left.rows()[i], &right.rows()[j]));
                        }
                    }
                }
                rows
            }
        }
    }

    fn pairs_where(left: &Table, right: &Table, keep: impl Fn(usize, usize) -> bool) -> Vec<Row> {
        let mut rows = Vec::new();
        for i in 0..left.len() {
            for j in 0..right.len() {
                if keep(i, j) {
                    rows.push(concat(&left.rows()[i], &right.rows()[j]));
                }
            }
        }
        rows
    }

    /// Projects joined rows onto `columns`.
    ///
    /// Right-table columns sit after the left table's `left_width` cells.
    pub fn project(
        rows: &[Row],
        columns: &[&ResolvedColumn],
        left_table: &str,
        left_width: usize,
    ) -> Vec<Row> {
        let positions: Vec<usize> = columns
            .iter()
            .map(|c| {
                if c.table == left_table {
                    c.index
                } else {
                    left_width + c.index
                }
            })
            .collect();

        rows.iter()
            .map(|row| positions.iter().map(|&p| row[p].clone()).collect())
            .collect()
    }
}

fn narrowed(
    matchers: &[LeafMatcher],
    len: usize,
    keep: impl Fn(&LeafMatcher, usize) -> bool,
) -> Vec<usize> {
    (0..len)
        .filter(|&i| matchers.iter().all(|m| keep(m, i)))
        .collect()
}

fn concat(left: &Row, right: &Row) -> Row {
    let mut row = Vec::with_capacity(left.len() + right.len());
    row.extend_from_slice(left);
    row.extend_from_slice(right);
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaCatalog, TableSchema};

    fn schema_a() -> TableSchema {
        TableSchema::new("A", vec!["x".into(), "y".into()])
    }

    fn schema_b() -> TableSchema {
        TableSchema::new("B", vec!["x".into(), "z".into()])
    }

    fn table(schema: &TableSchema, rows: &[&[&str]]) -> Table {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        Table::new(schema, rows).unwrap()
    }

    fn fixture() -> (Table, Table) {
        let a = table(&schema_a(), &[&["1", "3"], &["2", "7"], &["3", "9"]]);
        let b = table(&schema_b(), &[&["2", "20"], &["4", "40"]]);
        (a, b)
    }

    fn compile(filter: &str) -> Condition {
        let mut catalog = SchemaCatalog::new();
        catalog.register(schema_a()).unwrap();
        catalog.register(schema_b()).unwrap();
        Condition::compile(filter, &catalog, &["A".to_string(), "B".to_string()]).unwrap()
    }

    fn strings(rows: &[&[&str]]) -> Vec<Row> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_cross_join_order() {
        let a = table(&schema_a(), &[&["1", "a"], &["2", "b"]]);
        let b = table(&schema_b(), &[&["x", "p"], &["y", "q"], &["z", "r"]]);
        let rows = JoinEngine::cross_join(&a, &b);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0], vec!["1", "a", "x", "p"]);
        assert_eq!(rows[2], vec!["1", "a", "z", "r"]);
        assert_eq!(rows[3], vec!["2", "b", "x", "p"]);
    }

    #[test]
    fn test_and_join_single_pair() {
        let (a, b) = fixture();
        let rows = JoinEngine::filtered_join(&a, &b, &compile("A.x = B.x and A.y > 5"));
        assert_eq!(rows, strings(&[&["2", "7", "2", "20"]]));
    }

    #[test]
    fn test_narrowing_leaf() {
        let (a, b) = fixture();
        let rows = JoinEngine::filtered_join(&a, &b, &compile("A.y > 5"));
        // Two surviving left rows, each paired with every right row
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], vec!["2", "7", "2", "20"]);
        assert_eq!(rows[1], vec!["2", "7", "4", "40"]);
    }

    #[test]
    fn test_or_join_no_duplicates() {
        let (a, b) = fixture();
        // A.x = B.x holds for (2,2); A.y > 8 holds for row 3 against both right rows
        let rows = JoinEngine::filtered_join(&a, &b, &compile("A.x = B.x or A.y > 8"));
        assert_eq!(
            rows,
            strings(&[
                &["2", "7", "2", "20"],
                &["3", "9", "2", "20"],
                &["3", "9", "4", "40"],
            ])
        );

        // A pair satisfying both leaves appears once
        let rows = JoinEngine::filtered_join(&a, &b, &compile("A.x = B.x or B.z = 20"));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_constant_leaf() {
        let (a, b) = fixture();
        assert!(JoinEngine::filtered_join(&a, &b, &compile("1 > 2")).is_empty());
        assert_eq!(JoinEngine::filtered_join(&a, &b, &compile("1 < 2")).len(), 6);
    }

    #[test]
    fn test_project_offsets_right_columns() {
        let (a, b) = fixture();
        let rows = JoinEngine::cross_join(&a, &b);
        let z = ResolvedColumn {
            table: "B".into(),
            column: "z".into(),
            index: 1,
        };
        let x = ResolvedColumn {
            table: "A".into(),
            column: "x".into(),
            index: 0,
        };
        let projected = JoinEngine::project(&rows[..1], &[&z, &x], "A", a.width());
        assert_eq!(projected, strings(&[&["20", "1"]]));
    }
}
