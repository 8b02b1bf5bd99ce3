//! Numbering driver
//!
//! One strict top-to-bottom pass over a document. The driver never touches the
//! document itself: it returns the ordered line edits, and the caller applies
//! them to whatever holds the text. Reordered or deleted headers are corrected
//! by running a fresh pass.

use crate::backlinks::HeadingRename;
use crate::codec::{compose_inserted, compose_updated, needs_insert, needs_update, strip_number};
use crate::config::NumberingConfig;
use crate::fence::CodeFenceTracker;
use crate::header::{heading_text, Header};
use crate::number::NumberPath;
use serde::Serialize;
use tracing::debug;

/// What a line edit does to its header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Insert,
    Update,
    Strip,
}

/// Replacement of one header line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineEdit {
    /// Zero-based line index
    pub line: usize,
    pub old_text: String,
    pub new_text: String,
    pub kind: EditKind,
    /// Plain heading text before the edit (no `#` markers)
    pub heading_before: String,
    /// Plain heading text after the edit
    pub heading_after: String,
}

impl LineEdit {
    fn new(line: usize, old_text: &str, new_text: String, kind: EditKind) -> Self {
        LineEdit {
            line,
            heading_before: heading_text(old_text).to_string(),
            heading_after: heading_text(&new_text).to_string(),
            old_text: old_text.to_string(),
            new_text,
            kind,
        }
    }

    /// Heading text change, for rewriting links that point at this header
    pub fn rename(&self) -> HeadingRename {
        HeadingRename::new(self.heading_before.clone(), self.heading_after.clone())
    }
}

/// Full-document numbering pass for one configuration
pub struct NumberingDriver<'a> {
    config: &'a NumberingConfig,
}

impl<'a> NumberingDriver<'a> {
    pub fn new(config: &'a NumberingConfig) -> Self {
        NumberingDriver { config }
    }

    /// Edits that add missing numbers and refresh stale ones
    ///
    /// Returns no edits when the configuration is disabled.
    pub fn number(&self, text: &str) -> Vec<LineEdit> {
        let config = self.config;
        let mut edits = Vec::new();
        if !config.enabled {
            return edits;
        }

        let mut path = NumberPath::seeded(config.start_number);
        let mut fence = CodeFenceTracker::new();
        let separator = config.header_separator;

        for (index, line) in text.split('\n').enumerate() {
            if fence.observe(line) {
                continue;
            }
            let Some(header) = Header::parse(line, config.start_level) else {
                continue;
            };
            if !header.in_range(config.end_level) {
                continue;
            }

            path = path.next(header.adjusted_level as usize);
            let number = path.format(config.number_separator);

            let edit = if needs_insert(line, separator) {
                let new_text = compose_inserted(line, header.raw_level, &number, separator);
                LineEdit::new(index, line, new_text, EditKind::Insert)
            } else if needs_update(&number, line, separator) {
                let new_text = compose_updated(line, header.raw_level, &number, separator);
                LineEdit::new(index, line, new_text, EditKind::Update)
            } else {
                continue;
            };

            debug!(line = index, number = %number, kind = ?edit.kind, "numbering header");
            edits.push(edit);
        }

        edits
    }

    /// Edits that strip the number of every in-range header
    ///
    /// Runs regardless of whether the configuration is enabled.
    pub fn remove(&self, text: &str) -> Vec<LineEdit> {
        let config = self.config;
        let mut edits = Vec::new();
        let mut fence = CodeFenceTracker::new();

        for (index, line) in text.split('\n').enumerate() {
            if fence.observe(line) {
                continue;
            }
            let Some(header) = Header::parse(line, config.start_level) else {
                continue;
            };
            if !header.in_range(config.end_level) {
                continue;
            }

            let stripped = strip_number(line, config.header_separator);
            if stripped != line {
                edits.push(LineEdit::new(index, line, stripped, EditKind::Strip));
            }
        }

        edits
    }
}

/// Numbering edits for `text`
pub fn number_document(text: &str, config: &NumberingConfig) -> Vec<LineEdit> {
    NumberingDriver::new(config).number(text)
}

/// Number-stripping edits for `text`
pub fn remove_numbering(text: &str, config: &NumberingConfig) -> Vec<LineEdit> {
    NumberingDriver::new(config).remove(text)
}

/// Line-addressed text surface that edits are applied to
pub trait LineBuffer {
    fn line_count(&self) -> usize;
    fn line(&self, index: usize) -> Option<&str>;
    fn set_line(&mut self, index: usize, text: &str);
}

/// Owned document text split on `\n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        TextBuffer { lines: text.split('\n').map(str::to_string).collect() }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl LineBuffer for TextBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    fn set_line(&mut self, index: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text.to_string();
        }
    }
}

/// Apply edits to a buffer, skipping any whose line no longer holds `old_text`
///
/// Returns the number of edits applied.
pub fn apply_to_buffer(buffer: &mut impl LineBuffer, edits: &[LineEdit]) -> usize {
    let mut applied = 0;
    for edit in edits {
        if buffer.line(edit.line) != Some(edit.old_text.as_str()) {
            debug!(line = edit.line, "skipping stale edit");
            continue;
        }
        buffer.set_line(edit.line, &edit.new_text);
        applied += 1;
    }
    applied
}

/// `text` with `edits` applied
pub fn apply_edits(text: &str, edits: &[LineEdit]) -> String {
    let mut buffer = TextBuffer::from_text(text);
    apply_to_buffer(&mut buffer, edits);
    buffer.text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HeaderSeparator;

    fn config(start_level: u8, end_level: u8) -> NumberingConfig {
        NumberingConfig {
            enabled: true,
            start_level,
            end_level,
            start_number: 1,
            number_separator: '.',
            header_separator: HeaderSeparator::Tab,
        }
    }

    fn numbered(text: &str, config: &NumberingConfig) -> String {
        apply_edits(text, &number_document(text, config))
    }

    #[test]
    fn test_basic_numbering() {
        let text = "# Intro\n## A\n## B\n# Next\n## C";
        assert_eq!(
            numbered(text, &config(1, 2)),
            "# 1\tIntro\n## 1.1\tA\n## 1.2\tB\n# 2\tNext\n## 2.1\tC"
        );
    }

    #[test]
    fn test_second_pass_is_noop() {
        let cfg = config(1, 6);
        let once = numbered("# A\n## B\n### C\n## D", &cfg);
        assert!(number_document(&once, &cfg).is_empty());
    }

    #[test]
    fn test_reorder_refreshes_numbers() {
        let cfg = config(1, 6);
        let text = "# 2\tSecond\n# 1\tFirst";
        let edits = number_document(text, &cfg);
        assert_eq!(edits.len(), 2);
        assert!(edits.iter().all(|e| e.kind == EditKind::Update));
        assert_eq!(apply_edits(text, &edits), "# 1\tSecond\n# 2\tFirst");
    }

    #[test]
    fn test_out_of_range_headers_skipped() {
        let text = "# Title\n## A\n### Deep\n## B";
        assert_eq!(numbered(text, &config(2, 2)), "# Title\n## 1\tA\n### Deep\n## 2\tB");
    }

    #[test]
    fn test_fenced_headers_untouched() {
        let text = "# A\n```\n# code comment\n```\n# B";
        assert_eq!(numbered(text, &config(1, 6)), "# 1\tA\n```\n# code comment\n```\n# 2\tB");
    }

    #[test]
    fn test_disabled_config_yields_nothing() {
        let cfg = NumberingConfig { enabled: false, ..config(1, 6) };
        assert!(number_document("# A", &cfg).is_empty());
    }

    #[test]
    fn test_start_number_and_separator() {
        let cfg = NumberingConfig { start_number: 0, number_separator: '-', ..config(1, 6) };
        assert_eq!(numbered("# A\n## B", &cfg), "# 0\tA\n## 0-1\tB");
    }

    #[test]
    fn test_space_header_separator() {
        let cfg = NumberingConfig { header_separator: HeaderSeparator::Space, ..config(1, 6) };
        let once = numbered("# Hello World\n## Sub Part", &cfg);
        assert_eq!(once, "# 1 Hello World\n## 1.1 Sub Part");
        assert!(number_document(&once, &cfg).is_empty());
    }

    #[test]
    fn test_edit_records_heading_text() {
        let edits = number_document("# A\n## Old Title", &config(1, 6));
        let rename = edits[1].rename();
        assert_eq!(rename.old_heading, "Old Title");
        assert_eq!(rename.new_heading, "1.1\tOld Title");
    }

    #[test]
    fn test_remove_numbering() {
        let cfg = NumberingConfig { enabled: false, ..config(1, 6) };
        let text = "# 1\tA\n```\n# 9\tcode\n```\n## 1.1\tB\nplain";
        let edits = remove_numbering(text, &cfg);
        assert_eq!(edits.len(), 2);
        assert!(edits.iter().all(|e| e.kind == EditKind::Strip));
        assert_eq!(edits[1].heading_before, "1.1\tB");
        assert_eq!(edits[1].heading_after, "B");
        assert_eq!(apply_edits(text, &edits), "# A\n```\n# 9\tcode\n```\n## B\nplain");
    }

    #[test]
    fn test_stale_edits_skipped() {
        let edits = number_document("# A", &config(1, 6));
        let mut buffer = TextBuffer::from_text("# Changed meanwhile");
        assert_eq!(apply_to_buffer(&mut buffer, &edits), 0);
        assert_eq!(buffer.text(), "# Changed meanwhile");
    }
}
