//! Per-document directive block
//!
//! Documents can carry numbering overrides in their YAML front matter:
//!
//! ```yaml
//! ---
//! header-auto-numbering:
//!   - state on
//!   - first-level h2
//!   - max 3
//!   - start-at 1
//!   - separator .
//! ---
//! ```
//!
//! Each item is `"<key> <value>"`. Unknown keys and malformed values are
//! ignored so the previously computed configuration stays in force.

use crate::header::MAX_HEADER_LEVEL;
use crate::settings::{is_valid_number_separator, Settings};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::ops::Range;
use std::sync::OnceLock;
use thiserror::Error;

/// Front matter key holding the directive list
pub const DIRECTIVE_KEY: &str = "header-auto-numbering";

#[derive(Debug, Error)]
pub enum DirectiveError {
    #[error("Invalid front matter: {0}")]
    InvalidFrontMatter(#[from] serde_yaml::Error),

    #[error("Front matter is not a key/value mapping")]
    NotAMapping,
}

/// One parsed directive item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `state on|off`
    State(bool),
    /// `first-level hN`
    FirstLevel(u8),
    /// `max K`: number of levels, not an absolute end level
    Max(u8),
    /// `start-at N`
    StartAt(u32),
    /// `separator C`
    Separator(char),
    /// Unrecognised key or malformed value
    Unknown(String),
}

/// Parse a single `"<key> <value>"` item
pub fn parse_directive(item: &str) -> Directive {
    let item = item.trim();
    let (key, value) = match item.split_once(' ') {
        Some((key, value)) => (key, value.trim()),
        None => (item, ""),
    };
    let unknown = || Directive::Unknown(item.to_string());

    match key {
        "state" => match value {
            "on" => Directive::State(true),
            "off" => Directive::State(false),
            _ => unknown(),
        },
        "first-level" => value
            .strip_prefix(['h', 'H'])
            .and_then(|level| level.parse::<u8>().ok())
            .filter(|level| (1..=MAX_HEADER_LEVEL).contains(level))
            .map(Directive::FirstLevel)
            .unwrap_or_else(unknown),
        "max" => value
            .parse::<u8>()
            .ok()
            .filter(|count| *count >= 1)
            .map(Directive::Max)
            .unwrap_or_else(unknown),
        "start-at" => value.parse::<u32>().map(Directive::StartAt).unwrap_or_else(|_| unknown()),
        "separator" => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if is_valid_number_separator(c) => Directive::Separator(c),
                _ => unknown(),
            }
        }
        _ => unknown(),
    }
}

/// Location of the leading front matter block
struct FrontMatter<'a> {
    body: &'a str,
    range: Range<usize>,
}

fn front_matter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\A---\n(?:([\s\S]*?)\n)?---(?:\n|\z)").expect("front matter pattern is valid")
    })
}

fn locate(text: &str) -> Option<FrontMatter<'_>> {
    let caps = front_matter_pattern().captures(text)?;
    let whole = caps.get(0)?;
    let body = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    Some(FrontMatter { body, range: whole.range() })
}

fn parse_mapping(body: &str) -> Result<Mapping, DirectiveError> {
    if body.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml::from_str::<Value>(body)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(DirectiveError::NotAMapping),
    }
}

fn render_block(mapping: &Mapping) -> Result<String, DirectiveError> {
    let yaml = serde_yaml::to_string(mapping)?;
    Ok(format!("---\n{}---\n", yaml))
}

/// Directive items of `text`, or `None` when the document carries none
///
/// A missing block, a missing key, a non-list value and unparsable YAML all
/// read as "no directives".
pub fn read_directives(text: &str) -> Option<Vec<String>> {
    let front_matter = locate(text)?;
    let mapping = parse_mapping(front_matter.body).ok()?;
    let items = mapping.get(DIRECTIVE_KEY)?.as_sequence()?;
    Some(items.iter().filter_map(|item| item.as_str().map(str::to_string)).collect())
}

/// Directive list describing the static settings
pub fn default_directives(settings: &Settings) -> Vec<String> {
    let levels = settings.end_level.saturating_sub(settings.start_level) + 1;
    vec![
        "state on".to_string(),
        format!("first-level h{}", settings.start_level),
        format!("max {}", levels),
        format!("start-at {}", settings.start_number),
        format!("separator {}", settings.number_separator),
    ]
}

/// Insert or replace the directive list, keeping every other front matter key
///
/// A document without front matter gets a new block at the top.
pub fn set_directive_block(text: &str, items: &[String]) -> Result<String, DirectiveError> {
    let sequence = Value::Sequence(items.iter().cloned().map(Value::String).collect());

    match locate(text) {
        Some(front_matter) => {
            let mut mapping = parse_mapping(front_matter.body)?;
            mapping.insert(Value::String(DIRECTIVE_KEY.to_string()), sequence);
            let block = render_block(&mapping)?;
            let mut updated = String::with_capacity(text.len() + block.len());
            updated.push_str(&block);
            updated.push_str(&text[front_matter.range.end..]);
            Ok(updated)
        }
        None => {
            let mut mapping = Mapping::new();
            mapping.insert(Value::String(DIRECTIVE_KEY.to_string()), sequence);
            Ok(render_block(&mapping)? + text)
        }
    }
}

/// Remove the directive list; an emptied front matter block is removed too
pub fn remove_directive_block(text: &str) -> Result<String, DirectiveError> {
    let Some(front_matter) = locate(text) else {
        return Ok(text.to_string());
    };

    let mut mapping = parse_mapping(front_matter.body)?;
    if mapping.remove(DIRECTIVE_KEY).is_none() {
        return Ok(text.to_string());
    }

    let rest = &text[front_matter.range.end..];
    if mapping.is_empty() {
        return Ok(rest.to_string());
    }
    Ok(render_block(&mapping)? + rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_directives() {
        assert_eq!(parse_directive("state on"), Directive::State(true));
        assert_eq!(parse_directive("state off"), Directive::State(false));
        assert_eq!(parse_directive("first-level h2"), Directive::FirstLevel(2));
        assert_eq!(parse_directive("max 3"), Directive::Max(3));
        assert_eq!(parse_directive("start-at 0"), Directive::StartAt(0));
        assert_eq!(parse_directive("separator -"), Directive::Separator('-'));
    }

    #[test]
    fn test_parse_malformed_directives() {
        assert!(matches!(parse_directive("state maybe"), Directive::Unknown(_)));
        assert!(matches!(parse_directive("first-level 2"), Directive::Unknown(_)));
        assert!(matches!(parse_directive("first-level h9"), Directive::Unknown(_)));
        assert!(matches!(parse_directive("max zero"), Directive::Unknown(_)));
        assert!(matches!(parse_directive("max 0"), Directive::Unknown(_)));
        assert!(matches!(parse_directive("start-at x"), Directive::Unknown(_)));
        assert!(matches!(parse_directive("separator :"), Directive::Unknown(_)));
        assert!(matches!(parse_directive("colour red"), Directive::Unknown(_)));
    }

    #[test]
    fn test_read_directives() {
        let text = "---\ntitle: Doc\nheader-auto-numbering:\n  - state on\n  - max 2\n---\n# A\n";
        let items = read_directives(text).unwrap();
        assert_eq!(items, vec!["state on", "max 2"]);
    }

    #[test]
    fn test_read_directives_absent() {
        assert!(read_directives("# No front matter").is_none());
        assert!(read_directives("---\ntitle: Doc\n---\n# A").is_none());
        assert!(read_directives("---\nheader-auto-numbering: on\n---\n").is_none());
        assert!(read_directives("---\n: [broken\n---\n").is_none());
    }

    #[test]
    fn test_set_directive_block_preserves_other_keys() {
        let text = "---\ntitle: Doc\n---\n# A\n";
        let items = vec!["state off".to_string()];
        let updated = set_directive_block(text, &items).unwrap();

        assert!(updated.starts_with("---\ntitle: Doc\n"));
        assert!(updated.ends_with("---\n# A\n"));
        assert_eq!(read_directives(&updated).unwrap(), items);
    }

    #[test]
    fn test_set_directive_block_creates_front_matter() {
        let items = vec!["state on".to_string(), "max 2".to_string()];
        let updated = set_directive_block("# A\n", &items).unwrap();
        assert!(updated.starts_with("---\n"));
        assert!(updated.ends_with("---\n# A\n"));
        assert_eq!(read_directives(&updated).unwrap(), items);
    }

    #[test]
    fn test_set_directive_block_replaces_existing() {
        let text = "---\nheader-auto-numbering:\n- state on\ntags: [a]\n---\nbody";
        let updated = set_directive_block(text, &["state off".to_string()]).unwrap();
        assert_eq!(read_directives(&updated).unwrap(), vec!["state off"]);
        assert!(updated.contains("tags:"));
        assert!(updated.ends_with("---\nbody"));
    }

    #[test]
    fn test_remove_directive_block() {
        let text = "---\ntitle: Doc\nheader-auto-numbering:\n- state on\n---\n# A\n";
        let updated = remove_directive_block(text).unwrap();
        assert_eq!(updated, "---\ntitle: Doc\n---\n# A\n");
    }

    #[test]
    fn test_remove_directive_block_drops_empty_front_matter() {
        let text = "---\nheader-auto-numbering:\n- state on\n---\n# A\n";
        assert_eq!(remove_directive_block(text).unwrap(), "# A\n");
        assert_eq!(remove_directive_block("# A\n").unwrap(), "# A\n");
    }

    #[test]
    fn test_invalid_front_matter_is_an_error() {
        let text = "---\n- just\n- a list\n---\n# A\n";
        assert!(matches!(
            set_directive_block(text, &["state on".to_string()]),
            Err(DirectiveError::NotAMapping)
        ));
    }

    #[test]
    fn test_default_directives() {
        let settings = Settings { start_level: 2, end_level: 4, ..Default::default() };
        assert_eq!(
            default_directives(&settings),
            vec!["state on", "first-level h2", "max 3", "start-at 1", "separator ."]
        );
    }
}
