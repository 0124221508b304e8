//! Statement parser
//!
//! Splits a statement by keyword, outermost first:
//! 1. `from` separates the select list from the remainder
//! 2. `where` separates the table list from the filter text
//! 3. `,` separates select items and tables
//!
//! Whitespace is normalized before every split. Keywords are matched as
//! whole words, case-insensitively.

use crate::errors::{QueryError, QueryResult};
use crate::schema::ColumnRef;
use crate::text::{
    find_unquoted, has_open_quote, keyword_positions, normalize, split_keyword, split_unquoted,
};

use super::ast::{AggregateCall, AggregateFunction, ParsedQuery, Projection};

/// One item of the select list before grouping
enum SelectItem {
    Wildcard,
    Column(ColumnRef),
    Aggregate(AggregateCall),
    Distinct(ColumnRef),
}

/// Parses statements into [`ParsedQuery`] values
pub struct QueryParser;

impl QueryParser {
    /// Splits a batch on `;`, dropping empty statements.
    pub fn split_statements(batch: &str) -> Vec<String> {
        split_unquoted(batch, ';')
            .into_iter()
            .map(normalize)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Parses and validates one statement.
    pub fn parse(statement: &str) -> QueryResult<ParsedQuery> {
        let text = normalize(statement);
        if has_open_quote(&text) {
            return Err(QueryError::syntax("unterminated quoted literal"));
        }

        let sections = split_keyword(&text, "from");
        if sections.len() < 2 {
            return Err(QueryError::syntax("no table selected"));
        }
        if sections.len() > 2 {
            return Err(QueryError::syntax("more than one 'from' statement given"));
        }

        let select_list = Self::select_list(&text, sections[0])?;
        let (tables, filter) = Self::split_where(sections[1])?;

        let query = ParsedQuery {
            projection: Self::parse_projection(&select_list)?,
            tables: Self::parse_tables(&tables)?,
            filter,
        };
        query.validate()?;
        Ok(query)
    }

    /// Extracts the text between `select` and `from`.
    fn select_list(statement: &str, head: &str) -> QueryResult<String> {
        match keyword_positions(statement, "select").len() {
            0 => return Err(QueryError::syntax("no select statement given")),
            1 => {}
            _ => return Err(QueryError::syntax("more than one select statement given")),
        }

        let head = normalize(head);
        if keyword_positions(&head, "select") != [0] {
            return Err(QueryError::syntax("'select' must come first, before 'from'"));
        }
        Ok(normalize(&head["select".len()..]))
    }

    /// Splits the text after `from` into the table list and the filter.
    fn split_where(remainder: &str) -> QueryResult<(String, Option<String>)> {
        let parts = split_keyword(remainder, "where");
        match parts.as_slice() {
            [tables] => Ok((normalize(tables), None)),
            [tables, filter] => {
                let filter = normalize(filter);
                if filter.is_empty() {
                    return Err(QueryError::syntax("empty where clause"));
                }
                Ok((normalize(tables), Some(filter)))
            }
            _ => Err(QueryError::syntax("more than one 'where' clause given")),
        }
    }

    fn parse_tables(list: &str) -> QueryResult<Vec<String>> {
        let mut tables: Vec<String> = Vec::new();
        for name in list.split(',').map(normalize) {
            if name.is_empty() {
                return Err(QueryError::syntax("empty table name in 'from'"));
            }
            if tables.contains(&name) {
                return Err(QueryError::syntax(format!(
                    "table '{}' given more than once",
                    name
                )));
            }
            tables.push(name);
        }
        Ok(tables)
    }

    fn parse_projection(list: &str) -> QueryResult<Projection> {
        let items = split_unquoted(list, ',')
            .into_iter()
            .map(normalize)
            .filter(|item| !item.is_empty())
            .map(|item| Self::parse_item(&item))
            .collect::<QueryResult<Vec<_>>>()?;

        if items.is_empty() {
            return Err(QueryError::syntax("nothing given to select"));
        }

        let mut columns = Vec::new();
        let mut aggregates = Vec::new();
        let mut distinct = Vec::new();
        let mut wildcard = false;
        for item in items {
            match item {
                SelectItem::Wildcard => wildcard = true,
                SelectItem::Column(c) => columns.push(c),
                SelectItem::Aggregate(a) => aggregates.push(a),
                SelectItem::Distinct(c) => distinct.push(c),
            }
        }

        let plain = wildcard || !columns.is_empty();
        if !aggregates.is_empty() && !distinct.is_empty() {
            return Err(QueryError::unsupported(
                "distinct and aggregate functions cannot be given at a time",
            ));
        }
        if plain && (!aggregates.is_empty() || !distinct.is_empty()) {
            return Err(QueryError::unsupported(
                "plain columns cannot be mixed with aggregate or distinct calls",
            ));
        }
        if wildcard && !columns.is_empty() {
            return Err(QueryError::syntax("'*' cannot be combined with other columns"));
        }

        Ok(if wildcard {
            Projection::All
        } else if !aggregates.is_empty() {
            Projection::Aggregates(aggregates)
        } else if !distinct.is_empty() {
            Projection::Distinct(distinct)
        } else {
            Projection::Columns(columns)
        })
    }

    fn parse_item(item: &str) -> QueryResult<SelectItem> {
        let Some((open, _)) = find_unquoted(item, |c| c == '(') else {
            if item.contains(')') {
                return Err(QueryError::syntax(format!("unmatched ')' in '{}'", item)));
            }
            if item == "*" {
                return Ok(SelectItem::Wildcard);
            }
            return Ok(SelectItem::Column(ColumnRef::parse(item)?));
        };

        if !item.ends_with(')') {
            return Err(QueryError::syntax(format!("')' expected in '{}'", item)));
        }
        let name = normalize(&item[..open]);
        let argument = normalize(&item[open + 1..item.len() - 1]);
        if argument.is_empty() {
            return Err(QueryError::syntax(format!("missing argument in '{}'", item)));
        }
        if argument.contains(|c| c == '(' || c == ')') {
            return Err(QueryError::syntax(format!("nested parentheses in '{}'", item)));
        }

        let column = ColumnRef::parse(&argument)?;
        if name.is_empty() {
            return Ok(SelectItem::Column(column));
        }
        if name.eq_ignore_ascii_case("distinct") {
            return Ok(SelectItem::Distinct(column));
        }
        match AggregateFunction::from_name(&name) {
            Some(function) => Ok(SelectItem::Aggregate(AggregateCall { function, column })),
            None => Err(QueryError::syntax(format!("unknown function '{}'", name))),
        }
    }
}
