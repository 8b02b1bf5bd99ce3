//! Number command implementation

use anyhow::{Context, Result};
use colored::*;
use header_numbering::errors::print_backlink_failure;
use header_numbering::{
    apply_edits, number_document, resolve_config, BacklinkSynchronizer, DocumentId,
    DocumentStore, LineEdit, Settings, Translator, Vault,
};

pub fn number(vault: &Vault, settings: &Settings, doc: &str, dry_run: bool) -> Result<()> {
    let t = Translator::new(settings.language);
    let id = vault.document_id(doc);
    let text = vault.read(&id).with_context(|| format!("Failed to read {}", id))?;

    let config = resolve_config(settings, id.as_str(), &text);
    if !config.enabled {
        println!("{}", t.t("numbering.disabled", &[("document", id.as_str())]).yellow());
        return Ok(());
    }

    let edits = number_document(&text, &config);
    if edits.is_empty() {
        println!("{}", t.t("numbering.unchanged", &[("document", id.as_str())]));
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
        t.t("numbering.applied", &[("count", &count), ("document", id.as_str())])
    );
    Ok(())
}

/// Show pending edits as a line diff
pub fn print_edits(t: &Translator, edits: &[LineEdit]) {
    for edit in edits {
        println!("{}", format!("line {}:", edit.line + 1).dimmed());
        println!("  {} {}", "-".red(), edit.old_text.red());
        println!("  {} {}", "+".green(), edit.new_text.green());
    }
    println!();
    println!("{}", t.t("numbering.dry_run", &[]).yellow());
}

/// Write the edited document, propagating heading renames when enabled
///
/// With backlink propagation the document and every referencing document are
/// written as one batch; a failed batch leaves all of them unchanged.
pub fn commit_edits(
    vault: &Vault,
    settings: &Settings,
    t: &Translator,
    id: &DocumentId,
    text: &str,
    edits: &[LineEdit],
) -> Result<()> {
    if !settings.update_backlinks {
        vault
            .write(id, &apply_edits(text, edits))
            .with_context(|| format!("Failed to write {}", id))?;
        return Ok(());
    }

    let sync = BacklinkSynchronizer::new(vault, vault);
    match sync.sync_edits(id, text, edits) {
        Ok(outcome) => {
            if outcome.links_updated > 0 {
                let count = outcome.links_updated.to_string();
                println!("{} {}", "✓".green(), t.t("backlinks.updated", &[("count", &count)]));
            }
            Ok(())
        }
        Err(err) => {
            let key = if err.is_fatal() { "backlinks.rollback_failed" } else { "backlinks.rolled_back" };
            print_backlink_failure(&t.t(key, &[("error", &err.to_string())]), &err);
            Err(anyhow::Error::new(err).context(format!("Failed to update {}", id)))
        }
    }
}
