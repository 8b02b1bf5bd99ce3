//! Resolve command implementation

use anyhow::{Context, Result};
use colored::*;
use header_numbering::{resolve_config, DocumentStore, Settings, Vault};

pub fn resolve(vault: &Vault, settings: &Settings, doc: &str, json: bool) -> Result<()> {
    let id = vault.document_id(doc);
    let text = vault.read(&id).with_context(|| format!("Failed to read {}", id))?;
    let config = resolve_config(settings, id.as_str(), &text);

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let state = if config.enabled { "enabled".green() } else { "disabled".red() };
    println!("\n{}", id.as_str().bold().underline());
    println!();
    println!("{}: {}", "Numbering".bold(), state);
    println!("{}: {}", "Mode".bold(), settings.mode.as_str());
    println!("{}: h{} to h{}", "Levels".bold(), config.start_level, config.end_level);
    println!("{}: {}", "Start number".bold(), config.start_number);
    println!("{}: '{}'", "Number separator".bold(), config.number_separator);
    println!("{}: {}", "Header separator".bold(), config.header_separator.name());
    println!("{}: {}", "Format".bold(), config.sample().cyan());
    println!();
    Ok(())
}
