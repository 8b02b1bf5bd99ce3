//! Toggle commands: global switch and per-document state

use anyhow::{Context, Result};
use colored::*;
use header_numbering::{DocumentStore, Settings, Translator, Vault};

pub fn toggle_global(vault: &Vault, settings: &mut Settings) -> Result<()> {
    let enabled = settings.toggle_global();
    settings.save(vault.root())?;

    let t = Translator::new(settings.language);
    let key = if enabled { "toggle.global.on" } else { "toggle.global.off" };
    println!("{} {}", "✓".green(), t.t(key, &[]));
    Ok(())
}

pub fn toggle_document(vault: &Vault, settings: &mut Settings, doc: &str) -> Result<()> {
    let id = vault.document_id(doc);
    vault.read(&id).with_context(|| format!("Failed to read {}", id))?;

    let enabled = settings.toggle_document(id.as_str());
    settings.save(vault.root())?;

    let t = Translator::new(settings.language);
    let key = if enabled { "toggle.document.on" } else { "toggle.document.off" };
    println!("{} {}", "✓".green(), t.t(key, &[("document", id.as_str())]));
    Ok(())
}
