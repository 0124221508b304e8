//! Text helpers shared by the metadata loader and the query parser
//!
//! Keyword matching is ASCII case-insensitive, whole-word, and never looks
//! inside single- or double-quoted literals.

/// Collapses runs of whitespace into single spaces and trims both edges.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Characters that may appear inside an identifier or a qualified reference.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Byte offsets of every whole-word, unquoted occurrence of `keyword`.
pub fn keyword_positions(text: &str, keyword: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut prev: Option<char> = None;
    let mut quote: Option<char> = None;

    for (i, c) in text.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {
                if prev.map_or(true, |p| !is_word_char(p)) && starts_keyword(text, i, keyword) {
                    positions.push(i);
                }
            }
        }
        prev = Some(c);
    }

    positions
}

fn starts_keyword(text: &str, at: usize, keyword: &str) -> bool {
    let end = at + keyword.len();
    match text.get(at..end) {
        Some(candidate) if candidate.eq_ignore_ascii_case(keyword) => text[end..]
            .chars()
            .next()
            .map_or(true, |next| !is_word_char(next)),
        _ => false,
    }
}

/// Splits `text` on every whole-word occurrence of `keyword`.
///
/// The keyword itself is dropped; the pieces are returned untrimmed.
pub fn split_keyword<'a>(text: &'a str, keyword: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for pos in keyword_positions(text, keyword) {
        pieces.push(&text[start..pos]);
        start = pos + keyword.len();
    }
    pieces.push(&text[start..]);
    pieces
}

/// Finds the first unquoted character satisfying `pred`.
pub fn find_unquoted(text: &str, pred: impl Fn(char) -> bool) -> Option<(usize, char)> {
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if pred(c) => return Some((i, c)),
            None => {}
        }
    }
    None
}

/// Returns true if a `'` or `"` opened in `text` is never closed.
pub fn has_open_quote(text: &str) -> bool {
    let mut quote: Option<char> = None;
    for c in text.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None => {}
        }
    }
    quote.is_some()
}

/// Splits on an unquoted separator character.
pub fn split_unquoted(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some((pos, c)) = find_unquoted(rest, |c| c == separator) {
        pieces.push(&rest[..pos]);
        rest = &rest[pos + c.len_utf8()..];
    }
    pieces.push(rest);
    pieces
}

/// Returns the contents of a single- or double-quoted literal.
pub fn unquote(token: &str) -> Option<&str> {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && (open == '\'' || open == '"') => {
            Some(&token[1..token.len() - 1])
        }
        _ => None,
    }
}
