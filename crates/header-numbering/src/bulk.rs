//! Collection-wide numbering passes
//!
//! Documents are processed one at a time in batches, pausing between
//! documents and batches so a host that watches the files is not flooded with
//! change events. A failing document is counted and skipped.

use crate::analysis::{AnalysisCache, SystemClock};
use crate::backlinks::{DocumentId, DocumentStore, StoreError};
use crate::config::{resolve_config, resolve_config_cached};
use crate::driver::{apply_edits, number_document, remove_numbering, LineEdit};
use crate::settings::{BulkSettings, Settings};
use crate::vault::Vault;
use serde::Serialize;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Counts from one bulk pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub processed: usize,
    pub modified: usize,
    pub failed: usize,
}

pub struct BulkRunner<'a> {
    vault: &'a Vault,
    settings: &'a Settings,
}

impl<'a> BulkRunner<'a> {
    pub fn new(vault: &'a Vault, settings: &'a Settings) -> Self {
        BulkRunner { vault, settings }
    }

    /// Strip numbering from every document
    ///
    /// Each document's level range comes from its resolved configuration;
    /// removal runs whether or not numbering is enabled for it.
    pub fn remove_all(&self) -> BulkReport {
        self.run("remove", |id, text| {
            let config = resolve_config(self.settings, id.as_str(), text);
            remove_numbering(text, &config)
        })
    }

    /// Number every document that has numbering enabled
    pub fn number_all(&self) -> BulkReport {
        let mut cache = AnalysisCache::new(SystemClock);
        self.run("number", |id, text| {
            let config = resolve_config_cached(self.settings, id.as_str(), text, &mut cache);
            number_document(text, &config)
        })
    }

    fn run(
        &self,
        operation: &str,
        mut edits_for: impl FnMut(&DocumentId, &str) -> Vec<LineEdit>,
    ) -> BulkReport {
        let pacing = &self.settings.bulk;
        let documents = self.vault.documents();
        let mut report = BulkReport::default();

        for batch in documents.chunks(pacing.batch_size.max(1)) {
            for id in batch {
                report.processed += 1;
                match self.process(id, &mut edits_for) {
                    Ok(true) => {
                        report.modified += 1;
                        pause(pacing.modified_delay_ms);
                    }
                    Ok(false) => {}
                    Err(err) => {
                        warn!(document = %id, error = %err, "{} failed", operation);
                        report.failed += 1;
                    }
                }
                pause(pacing.file_delay_ms);
            }
            pause(pacing.batch_delay_ms);
        }

        info!(
            operation,
            processed = report.processed,
            modified = report.modified,
            failed = report.failed,
            "bulk pass finished"
        );
        report
    }

    fn process(
        &self,
        id: &DocumentId,
        edits_for: &mut impl FnMut(&DocumentId, &str) -> Vec<LineEdit>,
    ) -> Result<bool, StoreError> {
        let text = self.vault.read(id)?;
        let edits = edits_for(id, &text);
        if edits.is_empty() {
            return Ok(false);
        }
        debug!(document = %id, headers = edits.len(), "rewriting document");
        self.vault.write(id, &apply_edits(&text, &edits))?;
        Ok(true)
    }
}

/// No pacing at all; for callers that do not share the files with a watcher
pub fn unpaced() -> BulkSettings {
    BulkSettings { batch_size: usize::MAX, file_delay_ms: 0, modified_delay_ms: 0, batch_delay_ms: 0 }
}

fn pause(ms: u64) {
    if ms > 0 {
        thread::sleep(Duration::from_millis(ms));
    }
}
