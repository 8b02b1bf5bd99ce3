//! Separator command: switch between tab and space after the number

use anyhow::{Context, Result};
use colored::*;
use header_numbering::{HeaderSeparator, Settings, Translator, Vault};

pub fn set_separator(vault: &Vault, settings: &mut Settings, name: &str) -> Result<()> {
    let separator = match name {
        "space" => HeaderSeparator::Space,
        _ => HeaderSeparator::Tab,
    };

    settings
        .set_header_separator(separator)
        .context("Failed to change the header separator (run 'hnum toggle' to switch numbering off first)")?;
    settings.save(vault.root())?;

    let t = Translator::new(settings.language);
    println!("{} {}", "✓".green(), t.t("separator.changed", &[("separator", separator.name())]));
    Ok(())
}
