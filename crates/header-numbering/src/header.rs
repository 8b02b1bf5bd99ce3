//! Header line classification
//!
//! A header is a line made of 1 to 6 `#` characters, a space, and title text.
//! Classification never fails: anything that does not match is simply not a
//! header (level 0).

use regex::Regex;
use std::sync::OnceLock;

/// Deepest markdown header level
pub const MAX_HEADER_LEVEL: u8 = 6;

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#{1,6} .+").expect("header pattern is valid"))
}

/// True iff the trimmed line is `#{1,6}`, a space, then at least one character
pub fn is_header(line: &str) -> bool {
    header_pattern().is_match(line.trim())
}

/// Count of leading `#` characters, 0 if none
///
/// The count is taken on the untrimmed line, so an indented header has level 0
/// and is never numbered.
pub fn header_level(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b'#').count()
}

/// A header line as seen by one numbering pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Count of leading `#`
    pub raw_level: usize,
    /// `raw_level - start_level + 1`; zero or negative means out of range
    pub adjusted_level: isize,
    /// Text after the markers and the single space
    pub text: String,
}

impl Header {
    /// Classify `line` relative to a configured start level
    pub fn parse(line: &str, start_level: u8) -> Option<Self> {
        if !is_header(line) {
            return None;
        }
        let raw_level = header_level(line);
        let adjusted_level = raw_level as isize - start_level as isize + 1;
        Some(Header { raw_level, adjusted_level, text: heading_text(line).to_string() })
    }

    /// Whether this header takes part in numbering for `[start_level, end_level]`
    pub fn in_range(&self, end_level: u8) -> bool {
        self.adjusted_level > 0 && self.raw_level <= end_level as usize
    }
}

/// Plain heading text: everything after the leading `#`s and one space
///
/// Returns the whole line when it has no header markers.
pub fn heading_text(line: &str) -> &str {
    let level = header_level(line);
    let rest = &line[level..];
    if level == 0 {
        return line;
    }
    rest.strip_prefix(' ').unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_header() {
        assert!(is_header("# Title"));
        assert!(is_header("###### Deep"));
        assert!(is_header("  ## Indented"));
        assert!(!is_header("####### Seven"));
        assert!(!is_header("#NoSpace"));
        assert!(!is_header("# "));
        assert!(!is_header("plain text"));
        assert!(!is_header(""));
    }

    #[test]
    fn test_header_level() {
        assert_eq!(header_level("## Two"), 2);
        assert_eq!(header_level("plain"), 0);
        assert_eq!(header_level("  # indented"), 0);
    }

    #[test]
    fn test_parse_adjusts_level() {
        let header = Header::parse("### 1.1\tThree", 2).unwrap();
        assert_eq!(header.raw_level, 3);
        assert_eq!(header.adjusted_level, 2);
        assert_eq!(header.text, "1.1\tThree");

        let header = Header::parse("# Top", 2).unwrap();
        assert_eq!(header.adjusted_level, 0);
        assert!(!header.in_range(6));
    }

    #[test]
    fn test_in_range_respects_end_level() {
        let header = Header::parse("#### Four", 1).unwrap();
        assert!(header.in_range(4));
        assert!(!header.in_range(3));
    }

    #[test]
    fn test_heading_text() {
        assert_eq!(heading_text("## Hello World"), "Hello World");
        assert_eq!(heading_text("#\tTabbed"), "\tTabbed");
        assert_eq!(heading_text("not a header"), "not a header");
    }
}
