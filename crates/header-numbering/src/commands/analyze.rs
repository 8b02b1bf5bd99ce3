//! Analyze command implementation

use anyhow::{Context, Result};
use colored::*;
use header_numbering::{analyze_header_levels, DocumentStore, Settings, Translator, Vault};

pub fn analyze(vault: &Vault, settings: &Settings, doc: &str) -> Result<()> {
    let id = vault.document_id(doc);
    let text = vault.read(&id).with_context(|| format!("Failed to read {}", id))?;
    let analysis = analyze_header_levels(&text);

    println!("\n{}", id.as_str().bold().underline());
    println!();
    if analysis.is_empty {
        let t = Translator::new(settings.language);
        println!("{}", t.t("analyze.empty", &[]).yellow());
        return Ok(());
    }

    let used: Vec<String> = analysis.used_levels.iter().map(|l| format!("h{}", l)).collect();
    println!("{}: {}", "Headers".bold(), analysis.header_count);
    println!("{}: {}", "Levels used".bold(), used.join(", "));
    println!("{}: h{} to h{}", "Numbering range".bold(), analysis.min_level, analysis.max_level);
    println!();
    Ok(())
}
