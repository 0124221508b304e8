//! Filter condition tree
//!
//! A `where` clause compiles into one or two comparison leaves joined by at
//! most one combinator. Operands that name a column in scope are bound to
//! that column; everything else is a literal.

use std::cmp::Ordering;
use std::fmt;

use crate::errors::{QueryError, QueryResult};
use crate::schema::{ColumnRef, ResolvedColumn, SchemaCatalog};
use crate::storage::Value;
use crate::text::{find_unquoted, has_open_quote, keyword_positions, normalize, unquote};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Gt,
    Eq,
}

impl CompareOp {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(CompareOp::Lt),
            '>' => Some(CompareOp::Gt),
            '=' => Some(CompareOp::Eq),
            _ => None,
        }
    }

    /// Returns true if `ordering` (left vs right) satisfies the operator
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Eq => ordering == Ordering::Equal,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Eq => "=",
        }
    }
}

/// Logical connective between two leaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }
}

/// One side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Substituted with the row's value at evaluation time
    Column(ResolvedColumn),
    /// Compared as written (quotes stripped)
    Literal(String),
}

impl Operand {
    /// Binds a token to a column in scope, or keeps it as a literal.
    ///
    /// Quoted and numeric tokens are always literals. Dotted tokens must
    /// resolve as qualified columns.
    fn bind(token: &str, catalog: &SchemaCatalog, scope: &[String]) -> QueryResult<Self> {
        if let Some(inner) = unquote(token) {
            return Ok(Operand::Literal(inner.to_string()));
        }
        if Value::classify(token).is_numeric() {
            return Ok(Operand::Literal(token.to_string()));
        }

        let column_ref = ColumnRef::parse(token)?;
        match catalog.resolve(&column_ref, scope) {
            Ok(column) => Ok(Operand::Column(column)),
            Err(QueryError::UnknownColumn { .. }) if column_ref.table().is_none() => {
                Ok(Operand::Literal(token.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Table owning this operand, if it is a column
    pub fn table(&self) -> Option<&str> {
        match self {
            Operand::Column(c) => Some(&c.table),
            Operand::Literal(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Column(c) => write!(f, "{}", c),
            Operand::Literal(l) => write!(f, "'{}'", l),
        }
    }
}

/// A single `operand operator operand` leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Operand,
}

impl Comparison {
    fn parse(text: &str, catalog: &SchemaCatalog, scope: &[String]) -> QueryResult<Self> {
        let text = normalize(text);
        if text.is_empty() {
            return Err(QueryError::syntax("missing comparison in where clause"));
        }

        let (pos, symbol) = find_unquoted(&text, |c| CompareOp::from_char(c).is_some())
            .ok_or_else(|| {
                QueryError::syntax(format!("no comparison operator in '{}'", text))
            })?;
        let op = CompareOp::from_char(symbol)
            .ok_or_else(|| QueryError::syntax(format!("bad operator in '{}'", text)))?;

        let left = normalize(&text[..pos]);
        let right = normalize(&text[pos + symbol.len_utf8()..]);
        if left.is_empty() || right.is_empty() {
            return Err(QueryError::syntax(format!(
                "comparison '{}' needs two operands",
                text
            )));
        }
        if find_unquoted(&right, |c| CompareOp::from_char(c).is_some()).is_some() {
            return Err(QueryError::syntax(format!(
                "more than one operator in '{}'",
                text
            )));
        }

        Ok(Self {
            left: Operand::bind(&left, catalog, scope)?,
            op,
            right: Operand::bind(&right, catalog, scope)?,
        })
    }

    /// Distinct tables referenced by this leaf, left operand first
    pub fn tables(&self) -> Vec<&str> {
        let mut tables = Vec::new();
        for table in [self.left.table(), self.right.table()].into_iter().flatten() {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op.symbol(), self.right)
    }
}

/// A compiled filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Leaf(Comparison),
    Binary {
        left: Comparison,
        combinator: Combinator,
        right: Comparison,
    },
}

impl Condition {
    /// Compiles filter text against the tables in `scope`.
    pub fn compile(text: &str, catalog: &SchemaCatalog, scope: &[String]) -> QueryResult<Self> {
        let text = normalize(text);
        if has_open_quote(&text) {
            return Err(QueryError::syntax("unterminated quoted literal"));
        }
        let ands = keyword_positions(&text, "and");
        let ors = keyword_positions(&text, "or");
        if ands.len() + ors.len() > 1 {
            return Err(QueryError::syntax(
                "at most one combinator ('and'/'or') can be given",
            ));
        }

        let split = match (ands.first(), ors.first()) {
            (Some(&pos), _) => Some((pos, Combinator::And)),
            (None, Some(&pos)) => Some((pos, Combinator::Or)),
            (None, None) => None,
        };

        match split {
            None => Ok(Condition::Leaf(Comparison::parse(&text, catalog, scope)?)),
            Some((pos, combinator)) => {
                let keyword_len = combinator.as_str().len();
                Ok(Condition::Binary {
                    left: Comparison::parse(&text[..pos], catalog, scope)?,
                    combinator,
                    right: Comparison::parse(&text[pos + keyword_len..], catalog, scope)?,
                })
            }
        }
    }

    /// Leaves in written order
    pub fn leaves(&self) -> Vec<&Comparison> {
        match self {
            Condition::Leaf(c) => vec![c],
            Condition::Binary { left, right, .. } => vec![left, right],
        }
    }

    /// The combinator, if two leaves are present
    pub fn combinator(&self) -> Option<Combinator> {
        match self {
            Condition::Leaf(_) => None,
            Condition::Binary { combinator, .. } => Some(*combinator),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Leaf(c) => write!(f, "{}", c),
            Condition::Binary {
                left,
                combinator,
                right,
            } => write!(f, "({}) {} ({})", left, combinator.as_str(), right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableSchema;

    fn catalog() -> SchemaCatalog {
        let mut catalog = SchemaCatalog::new();
        catalog
            .register(TableSchema::new("table1", vec!["A".into(), "B".into()]))
            .unwrap();
        catalog
            .register(TableSchema::new("table2", vec!["B".into(), "D".into()]))
            .unwrap();
        catalog
    }

    fn scope(tables: &[&str]) -> Vec<String> {
        tables.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_single_leaf() {
        let cond = Condition::compile("A > 5", &catalog(), &scope(&["table1"])).unwrap();
        let Condition::Leaf(leaf) = cond else {
            panic!("expected a leaf");
        };
        assert_eq!(leaf.op, CompareOp::Gt);
        assert_eq!(leaf.left.table(), Some("table1"));
        assert_eq!(leaf.right, Operand::Literal("5".into()));
    }

    #[test]
    fn test_operator_without_spaces() {
        let cond = Condition::compile("A=10", &catalog(), &scope(&["table1"])).unwrap();
        assert_eq!(cond.leaves()[0].op, CompareOp::Eq);
        assert_eq!(cond.combinator(), None);
    }

    #[test]
    fn test_and_combinator() {
        let cond = Condition::compile(
            "table1.B = table2.B AND A > 5",
            &catalog(),
            &scope(&["table1", "table2"]),
        )
        .unwrap();
        assert_eq!(cond.combinator(), Some(Combinator::And));
        let leaves = cond.leaves();
        assert_eq!(leaves[0].tables(), vec!["table1", "table2"]);
        assert_eq!(leaves[1].tables(), vec!["table1"]);
    }

    #[test]
    fn test_or_combinator() {
        let cond = Condition::compile("A < 1 or A > 9", &catalog(), &scope(&["table1"])).unwrap();
        assert_eq!(cond.combinator(), Some(Combinator::Or));
    }

    #[test]
    fn test_two_combinators_rejected() {
        let err = Condition::compile("A=1 and B=2 or A=3", &catalog(), &scope(&["table1"]))
            .unwrap_err();
        assert_eq!(err.code(), "SYNTAX_ERROR");

        let err = Condition::compile("A=1 and B=2 and A=3", &catalog(), &scope(&["table1"]))
            .unwrap_err();
        assert_eq!(err.code(), "SYNTAX_ERROR");
    }

    #[test]
    fn test_malformed_leaf_rejected() {
        let s = scope(&["table1"]);
        assert!(Condition::compile("A", &catalog(), &s).is_err());
        assert!(Condition::compile("A >", &catalog(), &s).is_err());
        assert!(Condition::compile("A <= 3", &catalog(), &s).is_err());
        assert!(Condition::compile("A = 3 and", &catalog(), &s).is_err());
    }

    #[test]
    fn test_unknown_bare_word_is_literal() {
        let cond = Condition::compile("A = abc", &catalog(), &scope(&["table1"])).unwrap();
        assert_eq!(cond.leaves()[0].right, Operand::Literal("abc".into()));
    }

    #[test]
    fn test_quoted_literal() {
        let cond = Condition::compile("A = 'x or y'", &catalog(), &scope(&["table1"])).unwrap();
        assert_eq!(cond.combinator(), None);
        assert_eq!(cond.leaves()[0].right, Operand::Literal("x or y".into()));
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        let s = scope(&["table1"]);
        let err = Condition::compile("B = it's and A = 2", &catalog(), &s).unwrap_err();
        assert_eq!(err.code(), "SYNTAX_ERROR");
        assert!(err.to_string().contains("unterminated quoted literal"));

        let err = Condition::compile("B = \"abc or A = 2", &catalog(), &s).unwrap_err();
        assert_eq!(err.code(), "SYNTAX_ERROR");
    }

    #[test]
    fn test_qualified_errors_propagate() {
        let err = Condition::compile("table2.D = 1", &catalog(), &scope(&["table1"])).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_TABLE");

        let err = Condition::compile("table1.Z = 1", &catalog(), &scope(&["table1"])).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_COLUMN");
    }

    #[test]
    fn test_ambiguous_operand() {
        let err = Condition::compile("B = 1", &catalog(), &scope(&["table1", "table2"]))
            .unwrap_err();
        assert_eq!(err.code(), "AMBIGUOUS_COLUMN");
    }

    #[test]
    fn test_decimal_literal_not_a_column() {
        let cond = Condition::compile("A > 2.5", &catalog(), &scope(&["table1"])).unwrap();
        assert_eq!(cond.leaves()[0].right, Operand::Literal("2.5".into()));
    }
}
