mod common;

use common::VaultBuilder;
use header_numbering::{
    number_document, BacklinkError, BacklinkSynchronizer, DocumentId, DocumentStore,
    NumberingConfig, Settings, StoreError, Vault,
};
use std::cell::Cell;

#[test]
fn test_numbering_rewrites_links_in_other_documents() {
    let test = VaultBuilder::new()
        .document("A.md", "# Intro\n## Old Title\nbody")
        .document("B.md", "see [[A#Old Title]] and [[A#Intro|start]]")
        .document("notes/C.md", "unrelated [[B]]")
        .build();
    let vault = test.vault();
    let target = DocumentId::new("A.md");

    let text = vault.read(&target).unwrap();
    let edits = number_document(&text, &NumberingConfig::from_settings(&Settings::default()));
    let sync = BacklinkSynchronizer::new(&vault, &vault);
    let outcome = sync.sync_edits(&target, &text, &edits).unwrap();

    assert_eq!(outcome.headers_changed, 2);
    assert_eq!(outcome.links_updated, 2);
    assert_eq!(test.read("A.md"), "# 1\tIntro\n## 1.1\tOld Title\nbody");
    assert_eq!(test.read("B.md"), "see [[A#1.1 Old Title]] and [[A#1 Intro|start]]");
    assert_eq!(test.read("notes/C.md"), "unrelated [[B]]");
}

#[test]
fn test_renumbering_follows_existing_links() {
    let test = VaultBuilder::new()
        .document("A.md", "# 2\tSecond\n# 1\tFirst")
        .document("B.md", "[[A#1 First]]")
        .build();
    let vault = test.vault();
    let target = DocumentId::new("A.md");

    let text = vault.read(&target).unwrap();
    let edits = number_document(&text, &NumberingConfig::from_settings(&Settings::default()));
    BacklinkSynchronizer::new(&vault, &vault).sync_edits(&target, &text, &edits).unwrap();

    assert_eq!(test.read("A.md"), "# 1\tSecond\n# 2\tFirst");
    assert_eq!(test.read("B.md"), "[[A#2 First]]");
}

/// Vault wrapper whose writes to one document fail
struct FailingStore<'a> {
    inner: &'a Vault,
    fail_on: DocumentId,
    writes: Cell<usize>,
}

impl DocumentStore for FailingStore<'_> {
    fn read(&self, document: &DocumentId) -> Result<String, StoreError> {
        self.inner.read(document)
    }

    fn write(&self, document: &DocumentId, text: &str) -> Result<(), StoreError> {
        self.writes.set(self.writes.get() + 1);
        if document == &self.fail_on {
            return Err(StoreError::Rejected {
                document: document.clone(),
                reason: "read-only".to_string(),
            });
        }
        self.inner.write(document, text)
    }
}

#[test]
fn test_failed_backlink_write_restores_all_documents() {
    let test = VaultBuilder::new()
        .document("A.md", "## Old Title")
        .document("B.md", "[[A#Old Title]]")
        .document("C.md", "[[A#Old Title]] again")
        .build();
    let vault = test.vault();
    let store = FailingStore { inner: &vault, fail_on: DocumentId::new("C.md"), writes: Cell::new(0) };
    let target = DocumentId::new("A.md");

    let text = vault.read(&target).unwrap();
    let edits = number_document(&text, &NumberingConfig::from_settings(&Settings::default()));
    let err = BacklinkSynchronizer::new(&vault, &store).sync_edits(&target, &text, &edits).unwrap_err();

    assert!(matches!(err, BacklinkError::RolledBack { .. }));
    assert_eq!(test.read("A.md"), "## Old Title");
    assert_eq!(test.read("B.md"), "[[A#Old Title]]");
    assert_eq!(test.read("C.md"), "[[A#Old Title]] again");
    assert!(store.writes.get() > 3);
}

#[test]
fn test_backlink_update_is_idempotent_on_disk() {
    let test = VaultBuilder::new()
        .document("A.md", "# Heading")
        .document("B.md", "[[A#Heading]]")
        .build();
    let vault = test.vault();
    let sync = BacklinkSynchronizer::new(&vault, &vault);
    let target = DocumentId::new("A.md");

    let renames = vec![header_numbering::HeadingRename::new("Heading", "1\tHeading")];
    let updates = sync.plan(&target, &renames).unwrap();
    assert_eq!(sync.update_backlinks(&updates).unwrap(), 1);
    assert_eq!(sync.update_backlinks(&updates).unwrap(), 0);
    assert_eq!(test.read("B.md"), "[[A#1 Heading]]");
}
