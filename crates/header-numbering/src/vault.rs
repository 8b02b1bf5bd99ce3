//! Directory of markdown documents
//!
//! The filesystem rendition of the host collaborators: documents are `*.md`
//! files under the vault root, identified by their relative path, and links
//! are Obsidian-style wiki links (`[[Note#Heading|alias]]`).

use crate::backlinks::{
    DocumentId, DocumentStore, LinkSpan, Reference, ReferenceIndex, StoreError, TextPosition,
};
use crate::fence::CodeFenceTracker;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

fn wiki_link_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[\[([^\[\]|]+?)(?:\|[^\[\]]*)?\]\]").expect("wiki link pattern is valid")
    })
}

/// Wiki links on one line as (link text, full markup, byte column)
pub fn wiki_links(line: &str) -> impl Iterator<Item = (&str, &str, usize)> {
    wiki_link_regex().captures_iter(line).filter_map(|caps| {
        let whole = caps.get(0)?;
        let target = caps.get(1)?;
        Some((target.as_str(), whole.as_str(), whole.start()))
    })
}

/// A vault rooted at a directory
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Vault { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of a document
    pub fn path_of(&self, document: &DocumentId) -> PathBuf {
        self.root.join(document.as_str())
    }

    /// Document id for a user-supplied path, relative to the vault root
    ///
    /// Absolute paths inside the vault are made relative; anything else is
    /// taken as already relative.
    pub fn document_id(&self, path: &str) -> DocumentId {
        let candidate = Path::new(path);
        let relative = candidate.strip_prefix(&self.root).unwrap_or(candidate);
        let relative = relative.strip_prefix("./").unwrap_or(relative);
        DocumentId::new(relative.to_string_lossy())
    }

    /// Every markdown document, sorted by id
    ///
    /// Hidden directories (including the settings directory) are skipped.
    pub fn documents(&self) -> Vec<DocumentId> {
        let mut documents: Vec<DocumentId> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()))
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"))
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                Some(DocumentId::new(relative.to_string_lossy()))
            })
            .collect();
        documents.sort();
        documents
    }

    /// Wiki links in `text`, skipping fenced code
    fn references_in(source: &DocumentId, text: &str) -> Vec<Reference> {
        let mut fence = CodeFenceTracker::new();
        let mut references = Vec::new();

        for (line_index, line) in text.split('\n').enumerate() {
            if fence.observe(line) {
                continue;
            }
            for (link_text, markup, col) in wiki_links(line) {
                references.push(Reference {
                    source_document: source.clone(),
                    link_text: link_text.to_string(),
                    original_text: markup.to_string(),
                    position: LinkSpan {
                        start: TextPosition { line: line_index, col },
                        end: TextPosition { line: line_index, col: col + markup.len() },
                    },
                });
            }
        }

        references
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|name| name.starts_with('.'))
}

impl DocumentStore for Vault {
    fn read(&self, document: &DocumentId) -> Result<String, StoreError> {
        fs::read_to_string(self.path_of(document)).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(document.clone()),
            _ => StoreError::Io { document: document.clone(), source },
        })
    }

    /// Atomic write: temp file next to the document, then rename
    fn write(&self, document: &DocumentId, text: &str) -> Result<(), StoreError> {
        let path = self.path_of(document);
        let io_error = |source| StoreError::Io { document: document.clone(), source };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| StoreError::Rejected {
                document: document.clone(),
                reason: "not a file path".to_string(),
            })?;
        let temp = path.with_file_name(format!(".{}.tmp", file_name));

        fs::write(&temp, text).map_err(io_error)?;
        if let Err(source) = fs::rename(&temp, &path) {
            let _ = fs::remove_file(&temp);
            return Err(io_error(source));
        }
        debug!(document = %document, bytes = text.len(), "document written");
        Ok(())
    }
}

impl ReferenceIndex for Vault {
    fn backlinks(&self, target: &DocumentId) -> Result<Vec<Reference>, StoreError> {
        let mut references = Vec::new();

        for source in self.documents() {
            if &source == target {
                continue;
            }
            let text = match self.read(&source) {
                Ok(text) => text,
                Err(err) => {
                    warn!(document = %source, error = %err, "skipping unreadable document");
                    continue;
                }
            };
            references.extend(Vault::references_in(&source, &text).into_iter().filter(|r| {
                let path = r.link_text.split_once('#').map_or(r.link_text.as_str(), |(p, _)| p);
                target.matches_link_target(path)
            }));
        }

        debug!(document = %target, found = references.len(), "backlinks collected");
        Ok(references)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault_with(files: &[(&str, &str)]) -> (TempDir, Vault) {
        let temp = TempDir::new().unwrap();
        for (path, content) in files {
            let full = temp.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let vault = Vault::new(temp.path());
        (temp, vault)
    }

    #[test]
    fn test_wiki_links() {
        let links: Vec<_> = wiki_links("see [[A#Intro]] and [[B|alias]]").collect();
        assert_eq!(links, vec![("A#Intro", "[[A#Intro]]", 4), ("B", "[[B|alias]]", 20)]);
        assert_eq!(wiki_links("no [links] here").count(), 0);
    }

    #[test]
    fn test_documents_skip_hidden_and_non_markdown() {
        let (_temp, vault) = vault_with(&[
            ("b.md", ""),
            ("sub/a.md", ""),
            ("notes.txt", ""),
            (".hnum/settings.toml", ""),
            (".trash/old.md", ""),
        ]);
        let ids: Vec<_> = vault.documents().iter().map(|d| d.as_str().to_string()).collect();
        assert_eq!(ids, vec!["b.md", "sub/a.md"]);
    }

    #[test]
    fn test_read_write() {
        let (temp, vault) = vault_with(&[("a.md", "old")]);
        let id = DocumentId::new("a.md");
        vault.write(&id, "new").unwrap();
        assert_eq!(vault.read(&id).unwrap(), "new");
        assert!(!temp.path().join(".a.md.tmp").exists());

        let missing = vault.read(&DocumentId::new("missing.md")).unwrap_err();
        assert!(matches!(missing, StoreError::NotFound(_)));
    }

    #[test]
    fn test_backlinks() {
        let (_temp, vault) = vault_with(&[
            ("A.md", "# Title\n[[A#Title]] self link"),
            ("B.md", "x\n  see [[A#Title|here]]\n[[Other#Title]]"),
            ("dir/C.md", "[[dir/A#Title]] [[A]]"),
            ("D.md", "```\n[[A#Title]]\n```"),
        ]);

        let refs = vault.backlinks(&DocumentId::new("A.md")).unwrap();
        let found: Vec<_> =
            refs.iter().map(|r| (r.source_document.as_str(), r.link_text.as_str())).collect();
        assert_eq!(found, vec![("B.md", "A#Title"), ("dir/C.md", "A")]);

        let b = &refs[0];
        assert_eq!(b.original_text, "[[A#Title|here]]");
        assert_eq!(b.position.start, TextPosition { line: 1, col: 6 });
    }

    #[test]
    fn test_document_id_from_path() {
        let vault = Vault::new("/tmp/vault");
        assert_eq!(vault.document_id("/tmp/vault/notes/a.md").as_str(), "notes/a.md");
        assert_eq!(vault.document_id("./a.md").as_str(), "a.md");
        assert_eq!(vault.document_id("a.md").as_str(), "a.md");
    }
}
