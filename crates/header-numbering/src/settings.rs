//! Persisted numbering settings
//!
//! Settings live in `<vault>/.hnum/settings.toml`. Loading layers the file over
//! the defaults; every field in the file is optional.

use crate::codec::HeaderSeparator;
use crate::header::MAX_HEADER_LEVEL;
use crate::i18n::Language;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding the settings file, relative to the vault root
pub const SETTINGS_DIR: &str = ".hnum";

/// Settings file name inside [`SETTINGS_DIR`]
pub const SETTINGS_FILE: &str = "settings.toml";

/// Characters accepted between numbering path components
pub const NUMBER_SEPARATORS: [char; 4] = ['.', ',', '/', '-'];

pub fn is_valid_number_separator(c: char) -> bool {
    NUMBER_SEPARATORS.contains(&c)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{name} must be between 1 and 6, got {value}")]
    LevelOutOfRange { name: &'static str, value: u8 },

    #[error("Start level ({start}) must not exceed end level ({end})")]
    InvertedLevels { start: u8, end: u8 },

    #[error("Number separator must be one of '. , / -', got '{0}'")]
    InvalidNumberSeparator(char),

    #[error("Header separator cannot change while numbering is enabled")]
    HeaderSeparatorLocked,

    #[error("Bulk batch size must be at least 1")]
    EmptyBatch,
}

/// How numbering is switched on for documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingMode {
    Off,
    #[default]
    On,
    /// Each document's directive block decides
    Yaml,
}

impl NumberingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberingMode::Off => "off",
            NumberingMode::On => "on",
            NumberingMode::Yaml => "yaml",
        }
    }
}

/// Pacing for collection-wide passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkSettings {
    /// Documents per batch
    pub batch_size: usize,
    /// Pause after every document
    pub file_delay_ms: u64,
    /// Extra pause after a document was rewritten
    pub modified_delay_ms: u64,
    /// Pause after every batch
    pub batch_delay_ms: u64,
}

impl Default for BulkSettings {
    fn default() -> Self {
        Self { batch_size: 5, file_delay_ms: 5, modified_delay_ms: 10, batch_delay_ms: 50 }
    }
}

/// Static numbering settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Language of user-facing notices
    pub language: Language,

    /// Master switch; off disables numbering everywhere
    pub global_enabled: bool,

    /// Numbering mode
    pub mode: NumberingMode,

    /// Derive the level range from the headers a document uses
    pub auto_detect_levels: bool,

    /// First header level that gets a number
    pub start_level: u8,

    /// Last header level that gets a number
    pub end_level: u8,

    /// Number given to the first top-level header
    pub start_number: u32,

    /// Character between path components (`1.2.3`)
    pub number_separator: char,

    /// Separator between the number and the title
    pub header_separator: HeaderSeparator,

    /// Rewrite links in other documents when numbering changes a heading
    pub update_backlinks: bool,

    /// Explicit per-document enablement keyed by document id
    pub per_document: BTreeMap<String, bool>,

    /// Pacing for bulk passes
    pub bulk: BulkSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::En,
            global_enabled: true,
            mode: NumberingMode::On,
            auto_detect_levels: false,
            start_level: 1,
            end_level: MAX_HEADER_LEVEL,
            start_number: 1,
            number_separator: '.',
            header_separator: HeaderSeparator::Tab,
            update_backlinks: false,
            per_document: BTreeMap::new(),
            bulk: BulkSettings::default(),
        }
    }
}

impl Settings {
    /// Path of the settings file for a vault
    pub fn path(vault_root: impl AsRef<Path>) -> PathBuf {
        vault_root.as_ref().join(SETTINGS_DIR).join(SETTINGS_FILE)
    }

    /// Load settings for a vault: defaults, then the settings file if present
    pub fn load(vault_root: impl AsRef<Path>) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(file_settings) = Self::load_from_file(vault_root.as_ref())? {
            settings.merge(file_settings);
        }

        Ok(settings)
    }

    fn load_from_file(vault_root: &Path) -> Result<Option<PartialSettings>> {
        let path = Self::path(vault_root);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let partial: PartialSettings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(partial))
    }

    /// Save settings atomically (temp file, then rename)
    pub fn save(&self, vault_root: impl AsRef<Path>) -> Result<()> {
        let dir = vault_root.as_ref().join(SETTINGS_DIR);
        fs::create_dir_all(&dir).context("Failed to create settings directory")?;

        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;

        let path = dir.join(SETTINGS_FILE);
        let temp = dir.join(format!("{}.tmp", SETTINGS_FILE));
        fs::write(&temp, content).context("Failed to write temp settings file")?;
        fs::rename(&temp, &path).context("Failed to rename settings file")?;

        Ok(())
    }

    /// Merge partial settings into these (partial takes precedence for specified fields)
    fn merge(&mut self, other: PartialSettings) {
        if let Some(val) = other.language {
            self.language = val;
        }
        if let Some(val) = other.global_enabled {
            self.global_enabled = val;
        }
        if let Some(val) = other.mode {
            self.mode = val;
        }
        if let Some(val) = other.auto_detect_levels {
            self.auto_detect_levels = val;
        }
        if let Some(val) = other.start_level {
            self.start_level = val;
        }
        if let Some(val) = other.end_level {
            self.end_level = val;
        }
        if let Some(val) = other.start_number {
            self.start_number = val;
        }
        if let Some(val) = other.number_separator {
            self.number_separator = val;
        }
        if let Some(val) = other.header_separator {
            self.header_separator = val;
        }
        if let Some(val) = other.update_backlinks {
            self.update_backlinks = val;
        }
        if let Some(val) = other.per_document {
            self.per_document = val;
        }
        if let Some(val) = other.bulk {
            self.bulk = val;
        }
    }

    /// Check values entered by the user; the engine itself never rejects settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [("Start level", self.start_level), ("End level", self.end_level)] {
            if !(1..=MAX_HEADER_LEVEL).contains(&value) {
                return Err(SettingsError::LevelOutOfRange { name, value });
            }
        }
        if self.start_level > self.end_level {
            return Err(SettingsError::InvertedLevels {
                start: self.start_level,
                end: self.end_level,
            });
        }
        if !is_valid_number_separator(self.number_separator) {
            return Err(SettingsError::InvalidNumberSeparator(self.number_separator));
        }
        if self.bulk.batch_size == 0 {
            return Err(SettingsError::EmptyBatch);
        }
        Ok(())
    }

    /// Whether numbering is switched on at all (global switch and mode)
    pub fn numbering_active(&self) -> bool {
        self.global_enabled && self.mode != NumberingMode::Off
    }

    /// Change the header separator
    ///
    /// Refused while numbering is active: numbers written with the old
    /// separator would no longer be recognised.
    pub fn set_header_separator(&mut self, separator: HeaderSeparator) -> Result<(), SettingsError> {
        if separator != self.header_separator && self.numbering_active() {
            return Err(SettingsError::HeaderSeparatorLocked);
        }
        self.header_separator = separator;
        Ok(())
    }

    /// Flip the global switch, returning the new state
    pub fn toggle_global(&mut self) -> bool {
        self.global_enabled = !self.global_enabled;
        self.global_enabled
    }

    /// Explicit per-document state, if one was recorded
    pub fn document_state(&self, document: &str) -> Option<bool> {
        self.per_document.get(document).copied()
    }

    /// Flip a document's state (absent counts as enabled), returning the new state
    pub fn toggle_document(&mut self, document: &str) -> bool {
        let enabled = !self.document_state(document).unwrap_or(true);
        self.per_document.insert(document.to_string(), enabled);
        enabled
    }
}

/// Partial settings for deserializing from TOML with optional fields
#[derive(Debug, Deserialize)]
struct PartialSettings {
    language: Option<Language>,
    global_enabled: Option<bool>,
    mode: Option<NumberingMode>,
    auto_detect_levels: Option<bool>,
    start_level: Option<u8>,
    end_level: Option<u8>,
    start_number: Option<u32>,
    number_separator: Option<char>,
    header_separator: Option<HeaderSeparator>,
    update_backlinks: Option<bool>,
    per_document: Option<BTreeMap<String, bool>>,
    bulk: Option<BulkSettings>,
}
