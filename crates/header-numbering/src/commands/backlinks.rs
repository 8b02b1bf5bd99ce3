//! Backlinks command implementation

use anyhow::{Context, Result};
use colored::*;
use header_numbering::{BacklinkSynchronizer, DocumentStore, Settings, Translator, Vault};

pub fn backlinks(vault: &Vault, settings: &Settings, doc: &str, heading: &str) -> Result<()> {
    let id = vault.document_id(doc);
    vault.read(&id).with_context(|| format!("Failed to read {}", id))?;

    let sync = BacklinkSynchronizer::new(vault, vault);
    let links = sync.find_heading_backlinks(&id, heading)?;

    let t = Translator::new(settings.language);
    if links.is_empty() {
        println!("{}", t.t("backlinks.none", &[]));
        return Ok(());
    }

    for link in &links {
        let start = link.position.start;
        println!(
            "{}:{}:{}  {}",
            link.source_document.as_str().cyan(),
            start.line + 1,
            start.col + 1,
            link.old_link_text
        );
    }
    println!();
    let count = links.len().to_string();
    println!("{}", t.t("backlinks.count", &[("count", &count)]));
    Ok(())
}
