//! Header line codec
//!
//! Decides whether a header line needs a number inserted, an existing number
//! refreshed, or nothing, and rewrites the line accordingly. A numbered header
//! looks like `## 1.2<sep>Title`, where `<sep>` is the header separator.
//!
//! With a tab separator a header is numbered when its text contains a tab and
//! the number block is everything before it. With a space separator the first
//! space-delimited token must look like a numbering path (`1`, `1.2`, `3-1`).
//! Both families produce the same outcome for well-formed input.

use crate::header::header_level;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Separator placed between a generated number and the title text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderSeparator {
    #[default]
    Tab,
    Space,
}

impl HeaderSeparator {
    pub fn as_char(&self) -> char {
        match self {
            HeaderSeparator::Tab => '\t',
            HeaderSeparator::Space => ' ',
        }
    }

    /// Name used in settings files and terminal output
    pub fn name(&self) -> &'static str {
        match self {
            HeaderSeparator::Tab => "tab",
            HeaderSeparator::Space => "space",
        }
    }
}

fn number_token() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^-?\d+(?:[.,/-]-?\d+)*$").expect("number token pattern is valid")
    })
}

/// A header line split into markers, optional number block and title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderParts<'a> {
    pub level: usize,
    pub number: Option<&'a str>,
    pub title: &'a str,
}

impl<'a> HeaderParts<'a> {
    /// Split `line`; `None` when it does not start with `#` markers and a space
    pub fn split(line: &'a str, separator: HeaderSeparator) -> Option<Self> {
        let level = header_level(line);
        if level == 0 {
            return None;
        }
        let rest = line[level..].strip_prefix(' ')?;

        let (number, title) = match separator {
            HeaderSeparator::Tab => match rest.split_once('\t') {
                Some((number, title)) => (Some(number), title),
                None => (None, rest),
            },
            HeaderSeparator::Space => match rest.split_once(' ') {
                Some((token, title)) if number_token().is_match(token) => (Some(token), title),
                _ => (None, rest),
            },
        };

        Some(HeaderParts { level, number, title })
    }
}

/// Existing number block of a header line, if any
pub fn existing_number(line: &str, separator: HeaderSeparator) -> Option<&str> {
    HeaderParts::split(line, separator).and_then(|parts| parts.number)
}

/// True iff the header has no number yet
pub fn needs_insert(line: &str, separator: HeaderSeparator) -> bool {
    HeaderParts::split(line, separator).is_some_and(|parts| parts.number.is_none())
}

/// True iff the header has a number block that differs from `candidate`
pub fn needs_update(candidate: &str, line: &str, separator: HeaderSeparator) -> bool {
    existing_number(line, separator).is_some_and(|current| current != candidate)
}

/// Remove the number block, leaving `#`s, one space and the title
///
/// Lines without a number block are returned unchanged.
pub fn strip_number(line: &str, separator: HeaderSeparator) -> String {
    match HeaderParts::split(line, separator) {
        Some(HeaderParts { level, number: Some(_), title }) => compose(level, None, title, separator),
        _ => line.to_string(),
    }
}

/// `"#" * level + " " + number + separator + title`, keeping the whole title
pub fn compose_inserted(line: &str, level: usize, number: &str, separator: HeaderSeparator) -> String {
    let title = crate::header::heading_text(line);
    compose(level, Some(number), title, separator)
}

/// Replace only the number block, preserving the title text
pub fn compose_updated(line: &str, level: usize, number: &str, separator: HeaderSeparator) -> String {
    match HeaderParts::split(line, separator) {
        Some(parts) if parts.number.is_some() => compose(level, Some(number), parts.title, separator),
        _ => compose_inserted(line, level, number, separator),
    }
}

fn compose(level: usize, number: Option<&str>, title: &str, separator: HeaderSeparator) -> String {
    let mut line = "#".repeat(level);
    line.push(' ');
    if let Some(number) = number {
        line.push_str(number);
        line.push(separator.as_char());
    }
    line.push_str(title);
    line
}
