use std::sync::OnceLock;

use regex::Regex;

use crate::error::GenedexError;

/// Search criteria accepted by the index backend.
///
/// Free text is routed to a field search over the index's search fields;
/// `chr:start-end` notation is routed to a range-overlap search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Text(String),
    Range { seqid: String, start: u64, end: u64 },
}

fn range_notation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:chr)?([0-9]{1,2}|X|Y|MT?):([0-9][0-9,]*)-([0-9][0-9,]*)$")
            .expect("valid regex")
    })
}

fn parse_coordinate(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

impl Query {
    /// Parses user input, recognizing genomic range notation.
    pub fn parse(raw: &str) -> Result<Self, GenedexError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(GenedexError::InvalidArgument(
                "Search query must not be empty. Example: genedex search PTPN22".into(),
            ));
        }

        if let Some(caps) = range_notation().captures(raw) {
            let seqid = caps[1].to_ascii_uppercase();
            let start = parse_coordinate(&caps[2]);
            let end = parse_coordinate(&caps[3]);
            let (Some(start), Some(end)) = (start, end) else {
                return Err(GenedexError::InvalidArgument(format!(
                    "Range coordinates in '{raw}' are out of range"
                )));
            };
            if start > end {
                return Err(GenedexError::InvalidArgument(format!(
                    "Range start {start} is past range end {end}"
                )));
            }
            return Ok(Query::Range { seqid, start, end });
        }

        Ok(Query::Text(raw.to_string()))
    }

    /// Path segment the backend routes on.
    ///
    /// Text queries are escaped so user input cannot change the
    /// server-side query-string semantics; range queries use the
    /// `seqid:start-end` form the range-overlap handler expects.
    pub fn path_segment(&self) -> String {
        match self {
            Query::Text(text) => escape_lucene_value(text),
            Query::Range { seqid, start, end } => format!("{seqid}:{start}-{end}"),
        }
    }

    /// Human-readable form for headers and log lines.
    pub fn label(&self) -> String {
        match self {
            Query::Text(text) => text.clone(),
            Query::Range { seqid, start, end } => format!("{seqid}:{start}-{end}"),
        }
    }
}

/// Escapes a user-provided value for Lucene-like query syntaxes.
///
/// This is intentionally conservative: all Lucene special characters are
/// escaped so user input cannot accidentally change query semantics.
pub(crate) fn escape_lucene_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '+' | '-' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~' | '*'
            | '?' | ':' | '/' | '&' | '|' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
