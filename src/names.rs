//! Performer-name parsing for the `@firstname` / `@lastname` tokens.
//!
//! The performer field on a record is free text and frequently carries more
//! than one name, or a native-script alias in parentheses:
//!
//! - `Yui Hatano (葉月ゆい)` → first `yui`, last `hatano`
//! - `Rei, Mio Kimijima` → first `rei`, last `rei` (only the first performer counts)
//! - `Aoi Tsukasa Jr.` → first `aoi`, last `jr.`
//!
//! Both ASCII and full-width parentheses are stripped, before the field is
//! split into performers, so an alias may itself contain a separator.

/// Result of parsing a performer field into URL-ready name parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformerName {
    /// First whitespace-separated part, lowercased.
    pub first: String,
    /// Last whitespace-separated part, lowercased. Equals `first` for
    /// single-part names.
    pub last: String,
}

/// Parse a performer field. Returns `None` when nothing name-like is left
/// after stripping aliases and separators.
pub fn parse_performer_name(raw: &str) -> Option<PerformerName> {
    let stripped = strip_parenthesized(raw);
    let primary = stripped.split([',', '、', '，']).next().unwrap_or("");
    let mut parts = primary.split_whitespace();
    let first = parts.next()?;
    let last = parts.last().unwrap_or(first);
    Some(PerformerName {
        first: first.to_lowercase(),
        last: last.to_lowercase(),
    })
}

/// Remove every parenthesized span, nesting-aware. An unbalanced `(` drops
/// the rest of the string.
fn strip_parenthesized(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' | '（' => depth += 1,
            ')' | '）' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
