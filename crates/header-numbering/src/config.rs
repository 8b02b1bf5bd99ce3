//! Effective numbering configuration
//!
//! Three sources compete for a document's configuration: the static settings,
//! the document's directive block, and automatic level detection. Precedence,
//! highest first, each step short-circuiting the rest:
//!
//! 1. global switch off: disabled
//! 2. document explicitly disabled: disabled
//! 3. YAML mode: directives applied over the static settings
//! 4. ON mode with auto-detection: detected level range over the static settings
//! 5. static settings unchanged
//!
//! Resolution never fails; malformed directives are skipped.

use crate::analysis::{analyze_header_levels, AnalysisCache, Clock, HeaderLevelAnalysis};
use crate::codec::HeaderSeparator;
use crate::directive::{parse_directive, read_directives, Directive};
use crate::header::MAX_HEADER_LEVEL;
use crate::settings::{NumberingMode, Settings};
use serde::Serialize;
use tracing::debug;

/// Configuration of one numbering operation, produced fresh each time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberingConfig {
    pub enabled: bool,
    pub start_level: u8,
    pub end_level: u8,
    pub start_number: u32,
    pub number_separator: char,
    pub header_separator: HeaderSeparator,
}

impl NumberingConfig {
    /// The static settings, enabled when the global switch and mode allow it
    pub fn from_settings(settings: &Settings) -> Self {
        NumberingConfig {
            enabled: settings.numbering_active(),
            start_level: settings.start_level,
            end_level: settings.end_level,
            start_number: settings.start_number,
            number_separator: settings.number_separator,
            header_separator: settings.header_separator,
        }
    }

    /// Apply one directive; `max` counts levels from the current start level
    pub fn apply_directive(&mut self, directive: &Directive) {
        match directive {
            Directive::State(on) => self.enabled = *on,
            Directive::FirstLevel(level) => self.start_level = *level,
            Directive::Max(count) => {
                self.end_level =
                    self.start_level.saturating_add(count.saturating_sub(1)).min(MAX_HEADER_LEVEL)
            }
            Directive::StartAt(number) => self.start_number = *number,
            Directive::Separator(separator) => self.number_separator = *separator,
            Directive::Unknown(item) => debug!(item = %item, "ignoring numbering directive"),
        }
    }

    /// Human-readable sample of the format, e.g. `1.1.1`
    pub fn sample(&self) -> String {
        let depth = usize::from(self.end_level.saturating_sub(self.start_level)) + 1;
        let mut parts = vec!["1".to_string(); depth.min(3)];
        parts[0] = self.start_number.to_string();
        parts.join(&self.number_separator.to_string())
    }
}

/// Resolve a document's configuration without caching level analysis
pub fn resolve_config(settings: &Settings, document: &str, text: &str) -> NumberingConfig {
    resolve_with(settings, document, text, analyze_header_levels)
}

/// Resolve a document's configuration, reusing a cached level analysis
pub fn resolve_config_cached<C: Clock>(
    settings: &Settings,
    document: &str,
    text: &str,
    cache: &mut AnalysisCache<C>,
) -> NumberingConfig {
    resolve_with(settings, document, text, |text| cache.get_or_analyze(document, text))
}

fn resolve_with(
    settings: &Settings,
    document: &str,
    text: &str,
    analyze: impl FnOnce(&str) -> HeaderLevelAnalysis,
) -> NumberingConfig {
    let mut config = NumberingConfig::from_settings(settings);

    if !settings.global_enabled {
        config.enabled = false;
        return config;
    }

    if settings.document_state(document) == Some(false) {
        debug!(document, "numbering disabled for document");
        config.enabled = false;
        return config;
    }

    match settings.mode {
        NumberingMode::Yaml => {
            if let Some(items) = read_directives(text) {
                for item in &items {
                    config.apply_directive(&parse_directive(item));
                }
            }
        }
        NumberingMode::On if settings.auto_detect_levels => {
            let analysis = analyze(text);
            if !analysis.is_empty {
                config.start_level = analysis.min_level;
                config.end_level = analysis.max_level;
            }
        }
        _ => {}
    }

    config
}
