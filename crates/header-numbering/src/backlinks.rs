//! Heading backlink synchronization
//!
//! When numbering changes a heading's text, links in other documents that
//! point at the old heading are rewritten. All writes of one rename go through
//! a [`DocumentTransaction`]: either every document is updated, or every
//! document already written is restored from its snapshot.

use crate::driver::{apply_edits, LineEdit};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Identity of a document: its path relative to the vault root
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id without a trailing `.md`
    pub fn without_extension(&self) -> &str {
        self.0.strip_suffix(".md").unwrap_or(&self.0)
    }

    /// File name without directory or `.md` extension
    pub fn basename(&self) -> &str {
        let stem = self.without_extension();
        stem.rsplit('/').next().unwrap_or(stem)
    }

    /// Whether a link target (`Note` or `dir/Note`) points at this document
    pub fn matches_link_target(&self, target: &str) -> bool {
        let target = target.trim();
        let target = target.strip_suffix(".md").unwrap_or(target);
        target == self.basename() || target == self.without_extension()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Line/column location inside a document (both zero-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextPosition {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkSpan {
    pub start: TextPosition,
    pub end: TextPosition,
}

/// A link from one document to another, normalized from the reference index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub source_document: DocumentId,
    /// Link destination as written, e.g. `Note#Heading`
    pub link_text: String,
    /// Full link markup, e.g. `[[Note#Heading|alias]]`
    pub original_text: String,
    pub position: LinkSpan,
}

/// One reference that must be rewritten for a rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderLinkUpdate {
    pub source_document: DocumentId,
    pub old_link_text: String,
    pub new_link_text: String,
    pub position: LinkSpan,
}

/// Heading text before and after numbering touched it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRename {
    pub old_heading: String,
    pub new_heading: String,
}

impl HeadingRename {
    pub fn new(old_heading: impl Into<String>, new_heading: impl Into<String>) -> Self {
        HeadingRename { old_heading: old_heading.into(), new_heading: new_heading.into() }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("I/O error on {document}")]
    Io {
        document: DocumentId,
        #[source]
        source: std::io::Error,
    },

    #[error("Write to {document} rejected: {reason}")]
    Rejected { document: DocumentId, reason: String },
}

/// Document text storage (read and overwrite whole documents)
pub trait DocumentStore {
    fn read(&self, document: &DocumentId) -> Result<String, StoreError>;
    fn write(&self, document: &DocumentId, text: &str) -> Result<(), StoreError>;
}

/// Source of the links pointing at a document
pub trait ReferenceIndex {
    /// References in other documents whose link targets `target`
    fn backlinks(&self, target: &DocumentId) -> Result<Vec<Reference>, StoreError>;
}

#[derive(Debug, Error)]
pub enum BacklinkError {
    #[error("Failed to look up links to {target}")]
    Index {
        target: DocumentId,
        #[source]
        source: StoreError,
    },

    #[error("Failed to read {document}; nothing was written")]
    Snapshot {
        document: DocumentId,
        #[source]
        source: StoreError,
    },

    #[error("Failed to write {document}; all changes were rolled back")]
    RolledBack {
        document: DocumentId,
        #[source]
        source: StoreError,
    },

    #[error(
        "Failed to write {document} and could not restore {} document(s): {}",
        .unrestored.len(),
        join_ids(.unrestored)
    )]
    RollbackFailed {
        document: DocumentId,
        #[source]
        source: StoreError,
        unrestored: Vec<DocumentId>,
    },
}

impl BacklinkError {
    /// True when documents may have been left partially updated
    pub fn is_fatal(&self) -> bool {
        matches!(self, BacklinkError::RollbackFailed { .. })
    }
}

fn join_ids(ids: &[DocumentId]) -> String {
    ids.iter().map(DocumentId::as_str).collect::<Vec<_>>().join(", ")
}

/// All-or-nothing batch of document writes
///
/// `begin` → `stage` writes (each document is snapshotted on first touch) →
/// `commit`, which restores every written document if any write fails.
pub struct DocumentTransaction<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
    order: Vec<DocumentId>,
    snapshots: HashMap<DocumentId, String>,
    staged: HashMap<DocumentId, String>,
}

impl<'s, S: DocumentStore + ?Sized> DocumentTransaction<'s, S> {
    pub fn begin(store: &'s S) -> Self {
        DocumentTransaction {
            store,
            order: Vec::new(),
            snapshots: HashMap::new(),
            staged: HashMap::new(),
        }
    }

    fn snapshot(&mut self, document: &DocumentId) -> Result<(), BacklinkError> {
        if self.snapshots.contains_key(document) {
            return Ok(());
        }
        let text = self.store.read(document).map_err(|source| BacklinkError::Snapshot {
            document: document.clone(),
            source,
        })?;
        self.order.push(document.clone());
        self.snapshots.insert(document.clone(), text);
        Ok(())
    }

    /// Text of `document` as this transaction would leave it
    pub fn current(&mut self, document: &DocumentId) -> Result<&str, BacklinkError> {
        self.snapshot(document)?;
        let text = self.staged.get(document).or_else(|| self.snapshots.get(document));
        Ok(text.map(String::as_str).unwrap_or_default())
    }

    /// Replace the pending text of `document`
    pub fn stage(&mut self, document: &DocumentId, text: String) -> Result<(), BacklinkError> {
        self.snapshot(document)?;
        self.staged.insert(document.clone(), text);
        Ok(())
    }

    /// Documents whose staged text differs from their snapshot
    pub fn changed(&self) -> Vec<&DocumentId> {
        self.order
            .iter()
            .filter(|id| self.staged.get(*id).is_some_and(|text| self.snapshots.get(*id) != Some(text)))
            .collect()
    }

    /// Write every changed document, or restore the written ones on failure
    pub fn commit(self) -> Result<Vec<DocumentId>, BacklinkError> {
        let changed: Vec<DocumentId> = self.changed().into_iter().cloned().collect();
        let mut written: Vec<DocumentId> = Vec::new();

        for document in changed {
            let text = &self.staged[&document];
            match self.store.write(&document, text) {
                Ok(()) => {
                    debug!(document = %document, "staged document written");
                    written.push(document);
                }
                Err(source) => return Err(self.rollback(document, source, &written)),
            }
        }

        Ok(written)
    }

    fn rollback(&self, failed: DocumentId, source: StoreError, written: &[DocumentId]) -> BacklinkError {
        warn!(document = %failed, error = %source, "write failed, rolling back {} document(s)", written.len());

        let mut unrestored = Vec::new();
        for document in written {
            let snapshot = &self.snapshots[document];
            if let Err(err) = self.store.write(document, snapshot) {
                error!(document = %document, error = %err, "failed to restore document");
                unrestored.push(document.clone());
            }
        }

        if unrestored.is_empty() {
            BacklinkError::RolledBack { document: failed, source }
        } else {
            BacklinkError::RollbackFailed { document: failed, source, unrestored }
        }
    }
}

/// Collapse every whitespace run (tabs included) into one space and trim
pub fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Exact match after normalization
fn heading_equals(fragment: &str, heading: &str) -> bool {
    normalize_spaces(fragment) == normalize_spaces(heading)
}

/// Exact or substring match in either direction, tolerating partial numbering
pub fn heading_matches(fragment: &str, heading: &str) -> bool {
    let fragment = normalize_spaces(fragment);
    let heading = normalize_spaces(heading);
    if fragment.is_empty() || heading.is_empty() {
        return false;
    }
    fragment == heading || fragment.contains(&heading) || heading.contains(&fragment)
}

/// Heading fragment of a reference that targets `target`
fn heading_fragment<'r>(target: &DocumentId, reference: &'r Reference) -> Option<&'r str> {
    let (path, fragment) = reference.link_text.split_once('#')?;
    target.matches_link_target(path).then_some(fragment)
}

/// Link markup with its `#fragment` replaced by the normalized new heading
fn rewrite_link(original: &str, fragment: &str, new_heading: &str) -> String {
    let old = format!("#{}", fragment);
    let new = format!("#{}", normalize_spaces(new_heading));
    original.replacen(&old, &new, 1)
}

/// Apply one update to the line it points at; `None` if nothing changes
pub fn apply_update(text: &str, update: &HeaderLinkUpdate) -> Option<String> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let line = *lines.get(update.position.start.line)?;
    let rewritten = line.replacen(&update.old_link_text, &update.new_link_text, 1);
    if rewritten == line {
        return None;
    }
    lines[update.position.start.line] = &rewritten;
    Some(lines.join("\n"))
}

/// Outcome of rewriting a document together with its backlinks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub headers_changed: usize,
    pub links_updated: usize,
    pub documents_written: Vec<DocumentId>,
}

/// Finds and rewrites links to renamed headings
pub struct BacklinkSynchronizer<'a, I: ReferenceIndex + ?Sized, S: DocumentStore + ?Sized> {
    index: &'a I,
    store: &'a S,
}

impl<'a, I: ReferenceIndex + ?Sized, S: DocumentStore + ?Sized> BacklinkSynchronizer<'a, I, S> {
    pub fn new(index: &'a I, store: &'a S) -> Self {
        BacklinkSynchronizer { index, store }
    }

    fn references(&self, target: &DocumentId) -> Result<Vec<Reference>, BacklinkError> {
        self.index
            .backlinks(target)
            .map_err(|source| BacklinkError::Index { target: target.clone(), source })
    }

    /// References to `old_heading` in `target`, link text left unchanged
    pub fn find_heading_backlinks(
        &self,
        target: &DocumentId,
        old_heading: &str,
    ) -> Result<Vec<HeaderLinkUpdate>, BacklinkError> {
        let updates: Vec<_> = self
            .references(target)?
            .into_iter()
            .filter(|reference| {
                heading_fragment(target, reference)
                    .is_some_and(|fragment| heading_matches(fragment, old_heading))
            })
            .map(|reference| HeaderLinkUpdate {
                source_document: reference.source_document,
                new_link_text: reference.original_text.clone(),
                old_link_text: reference.original_text,
                position: reference.position,
            })
            .collect();

        debug!(document = %target, heading = old_heading, found = updates.len(), "heading backlinks");
        Ok(updates)
    }

    /// Link rewrites for a set of heading renames in `target`
    ///
    /// Each reference is matched once: an exact heading match wins over a
    /// partial one, then the first rename in document order.
    pub fn plan(
        &self,
        target: &DocumentId,
        renames: &[HeadingRename],
    ) -> Result<Vec<HeaderLinkUpdate>, BacklinkError> {
        if renames.is_empty() {
            return Ok(Vec::new());
        }

        let mut updates = Vec::new();
        for reference in self.references(target)? {
            let Some(fragment) = heading_fragment(target, &reference) else {
                continue;
            };
            let rename = renames
                .iter()
                .find(|r| heading_equals(fragment, &r.old_heading))
                .or_else(|| renames.iter().find(|r| heading_matches(fragment, &r.old_heading)));
            let Some(rename) = rename else {
                continue;
            };

            let new_link_text = rewrite_link(&reference.original_text, fragment, &rename.new_heading);
            if new_link_text == reference.original_text {
                continue;
            }
            updates.push(HeaderLinkUpdate {
                source_document: reference.source_document,
                old_link_text: reference.original_text,
                new_link_text,
                position: reference.position,
            });
        }

        Ok(updates)
    }

    /// Apply link rewrites as one all-or-nothing batch
    ///
    /// Returns the number of documents written. Applying the same updates a
    /// second time writes nothing: the old link text is no longer present.
    pub fn update_backlinks(&self, updates: &[HeaderLinkUpdate]) -> Result<usize, BacklinkError> {
        if updates.is_empty() {
            return Ok(0);
        }
        let mut transaction = DocumentTransaction::begin(self.store);
        stage_updates(&mut transaction, updates)?;
        let written = transaction.commit()?;
        info!(documents = written.len(), links = updates.len(), "backlinks updated");
        Ok(written.len())
    }

    /// Write `target`'s new text and its link rewrites in one batch
    pub fn rename_with_document(
        &self,
        target: &DocumentId,
        new_target_text: String,
        updates: &[HeaderLinkUpdate],
    ) -> Result<Vec<DocumentId>, BacklinkError> {
        let mut transaction = DocumentTransaction::begin(self.store);
        transaction.stage(target, new_target_text)?;
        stage_updates(&mut transaction, updates)?;
        let written = transaction.commit()?;
        info!(document = %target, documents = written.len(), links = updates.len(), "renamed headings synchronized");
        Ok(written)
    }

    /// Apply numbering edits to `target` and propagate the heading changes
    pub fn sync_edits(
        &self,
        target: &DocumentId,
        original_text: &str,
        edits: &[LineEdit],
    ) -> Result<SyncOutcome, BacklinkError> {
        let renames: Vec<HeadingRename> = edits.iter().map(LineEdit::rename).collect();
        let updates = self.plan(target, &renames)?;
        let new_text = apply_edits(original_text, edits);
        let documents_written = self.rename_with_document(target, new_text, &updates)?;
        Ok(SyncOutcome { headers_changed: edits.len(), links_updated: updates.len(), documents_written })
    }
}

fn stage_updates<S: DocumentStore + ?Sized>(
    transaction: &mut DocumentTransaction<'_, S>,
    updates: &[HeaderLinkUpdate],
) -> Result<(), BacklinkError> {
    for update in updates {
        let current = transaction.current(&update.source_document)?;
        if let Some(next) = apply_update(current, update) {
            transaction.stage(&update.source_document, next)?;
        }
    }
    Ok(())
}
