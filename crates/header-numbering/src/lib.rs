//! Hierarchical header numbering for markdown documents
//!
//! The engine (`header`, `fence`, `number`, `codec`, `analysis`, `config`,
//! `driver`) is pure: it reads text and returns line edits. Persistence,
//! link propagation and collection-wide passes sit on top of it.

pub mod analysis;
pub mod backlinks;
pub mod bulk;
pub mod codec;
pub mod config;
pub mod directive;
pub mod driver;
pub mod errors;
pub mod fence;
pub mod header;
pub mod i18n;
pub mod number;
pub mod settings;
pub mod vault;

pub use analysis::{analyze_header_levels, AnalysisCache, Clock, HeaderLevelAnalysis, SystemClock};
pub use backlinks::{
    BacklinkError, BacklinkSynchronizer, DocumentId, DocumentStore, DocumentTransaction,
    HeaderLinkUpdate, HeadingRename, Reference, ReferenceIndex, StoreError, SyncOutcome,
};
pub use bulk::{BulkReport, BulkRunner};
pub use codec::HeaderSeparator;
pub use config::{resolve_config, resolve_config_cached, NumberingConfig};
pub use directive::{Directive, DirectiveError};
pub use driver::{
    apply_edits, apply_to_buffer, number_document, remove_numbering, EditKind, LineBuffer,
    LineEdit, NumberingDriver, TextBuffer,
};
pub use i18n::{Language, Translator};
pub use settings::{NumberingMode, Settings, SettingsError};
pub use vault::Vault;

/// Re-export common error types
pub use anyhow::{Error, Result};
