//! Remove command implementation

use super::number::{commit_edits, print_edits};
use anyhow::{Context, Result};
use colored::*;
use header_numbering::{remove_numbering, resolve_config, DocumentStore, Settings, Translator, Vault};

pub fn remove(vault: &Vault, settings: &Settings, doc: &str, dry_run: bool) -> Result<()> {
    let t = Translator::new(settings.language);
    let id = vault.document_id(doc);
    let text = vault.read(&id).with_context(|| format!("Failed to read {}", id))?;

    // removal uses the document's level range even when numbering is off
    let config = resolve_config(settings, id.as_str(), &text);
    let edits = remove_numbering(&text, &config);
    if edits.is_empty() {
        println!("{}", t.t("bulk.nothing", &[]));
        return Ok(());
    }

    if dry_run {
        print_edits(&t, &edits);
        return Ok(());
    }

    commit_edits(vault, settings, &t, &id, &text, &edits)?;
    let count = edits.len().to_string();
    println!(
        "{} {}",
        "✓".green(),
        t.t("numbering.removed", &[("count", &count), ("document", id.as_str())])
    );
    Ok(())
}
