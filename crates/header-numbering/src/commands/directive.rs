//! Directive commands: manage a document's numbering directive block

use anyhow::{bail, Context, Result};
use colored::*;
use header_numbering::directive::{
    default_directives, read_directives, remove_directive_block, set_directive_block,
};
use header_numbering::errors::print_warning;
use header_numbering::{DocumentId, DocumentStore, Settings, Translator, Vault};

fn read(vault: &Vault, doc: &str) -> Result<(DocumentId, String)> {
    let id = vault.document_id(doc);
    let text = vault.read(&id).with_context(|| format!("Failed to read {}", id))?;
    Ok((id, text))
}

fn write(vault: &Vault, id: &DocumentId, text: &str) -> Result<()> {
    vault.write(id, text).with_context(|| format!("Failed to write {}", id))
}

pub fn directive_add(vault: &Vault, settings: &Settings, doc: &str) -> Result<()> {
    let (id, text) = read(vault, doc)?;
    if read_directives(&text).is_some() {
        bail!("{} already has numbering directives (use 'hnum directive reset')", id);
    }

    let updated = set_directive_block(&text, &default_directives(settings))
        .with_context(|| format!("Failed to update front matter of {}", id))?;
    write(vault, &id, &updated)?;

    let t = Translator::new(settings.language);
    println!("{} {}", "✓".green(), t.t("directive.added", &[("document", id.as_str())]));
    Ok(())
}

pub fn directive_reset(vault: &Vault, settings: &Settings, doc: &str) -> Result<()> {
    let (id, text) = read(vault, doc)?;
    let updated = set_directive_block(&text, &default_directives(settings))
        .with_context(|| format!("Failed to update front matter of {}", id))?;
    write(vault, &id, &updated)?;

    let t = Translator::new(settings.language);
    println!("{} {}", "✓".green(), t.t("directive.reset", &[("document", id.as_str())]));
    Ok(())
}

pub fn directive_remove(vault: &Vault, settings: &Settings, doc: &str) -> Result<()> {
    let (id, text) = read(vault, doc)?;
    if read_directives(&text).is_none() {
        let t = Translator::new(settings.language);
        print_warning(&t.t("directive.none", &[("document", id.as_str())]));
        return Ok(());
    }

    let updated = remove_directive_block(&text)
        .with_context(|| format!("Failed to update front matter of {}", id))?;
    write(vault, &id, &updated)?;

    let t = Translator::new(settings.language);
    println!("{} {}", "✓".green(), t.t("directive.removed", &[("document", id.as_str())]));
    Ok(())
}
