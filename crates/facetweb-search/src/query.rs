//! Query string composition and parsing.
//!
//! Expansion queries are plain strings in Lucene-style full query syntax, so
//! any backend that speaks that syntax can serve them. This module builds
//! those strings and, for local backends, parses them back into required
//! phrases and terms.
//!
//! # Composite queries
//!
//! Expanding a facet value `t` found under root `r` queries `(r) AND "t"`.
//! The facet value is escaped and quoted as one phrase token, so its own
//! whitespace or operator characters never split it.
//!
//! ```
//! use facetweb_search::query::composite_query;
//!
//! assert_eq!(composite_query("aspirin", "headache"), r#"(aspirin) AND "headache""#);
//! assert_eq!(composite_query("*", r#"drug "x""#), r#""drug \"x\"""#);
//! ```

/// The query that matches every document.
pub const MATCH_ALL: &str = "*";

/// Return `term`, or `match_all` when `term` is blank.
pub fn or_match_all<'a>(term: &'a str, match_all: &'a str) -> &'a str {
    if term.trim().is_empty() {
        match_all
    } else {
        term
    }
}

/// Quote `text` as a single exact-phrase token.
///
/// Backslashes and double quotes inside the phrase are backslash-escaped.
pub fn quote_phrase(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Build the query that scopes `root` to documents containing `phrase`.
///
/// A match-all root adds nothing to the conjunction, so only the phrase is
/// sent.
pub fn composite_query(root: &str, phrase: &str) -> String {
    let root = root.trim();
    if root.is_empty() || root == MATCH_ALL {
        quote_phrase(phrase)
    } else {
        format!("({root}) AND {}", quote_phrase(phrase))
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// A query reduced to required phrases and required bare terms.
///
/// This is the conjunctive subset of the full syntax that
/// [`composite_query`] produces. `AND` / `&&` are treated as operators,
/// parentheses as grouping, and `*` as match-all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Quoted phrases, unescaped.
    pub phrases: Vec<String>,
    /// Bare terms.
    pub terms: Vec<String>,
}

impl ParsedQuery {
    /// Whether the query constrains nothing.
    pub fn is_match_all(&self) -> bool {
        self.phrases.is_empty() && self.terms.is_empty()
    }
}

/// Parse a query string into required phrases and terms.
///
/// An unterminated quote is treated as ordinary text.
pub fn parse_query(query: &str) -> ParsedQuery {
    let mut parsed = ParsedQuery::default();
    let mut token = String::new();
    let mut chars = query.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                flush_term(&mut token, &mut parsed.terms);
                let rest: String = chars.clone().collect();
                // Unterminated quotes fall through and the remainder is
                // scanned as terms.
                if let Some((phrase, consumed)) = read_phrase(&rest) {
                    let phrase = phrase.trim().to_string();
                    if !phrase.is_empty() {
                        parsed.phrases.push(phrase);
                    }
                    for _ in 0..consumed {
                        chars.next();
                    }
                }
            }
            '\\' => {
                if let Some(escaped) = chars.next() {
                    token.push(escaped);
                }
            }
            '(' | ')' => flush_term(&mut token, &mut parsed.terms),
            c if c.is_whitespace() => flush_term(&mut token, &mut parsed.terms),
            c => token.push(c),
        }
    }
    flush_term(&mut token, &mut parsed.terms);

    parsed
}

/// Read an escaped phrase body up to its closing quote.
///
/// Returns the unescaped phrase and the number of chars consumed, including
/// the closing quote.
fn read_phrase(rest: &str) -> Option<(String, usize)> {
    let mut phrase = String::new();
    let mut chars = rest.chars();
    let mut consumed = 0;

    while let Some(c) = chars.next() {
        consumed += 1;
        match c {
            '\\' => {
                let escaped = chars.next()?;
                consumed += 1;
                phrase.push(escaped);
            }
            '"' => return Some((phrase, consumed)),
            c => phrase.push(c),
        }
    }

    None
}

fn flush_term(token: &mut String, terms: &mut Vec<String>) {
    if token.is_empty() {
        return;
    }
    let term = std::mem::take(token);
    if !matches!(term.as_str(), "AND" | "&&" | MATCH_ALL) {
        terms.push(term);
    }
}

// ============================================================================
// Tests
// ============================================================================
