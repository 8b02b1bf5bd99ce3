//! Bulk commands: vault-wide numbering passes

use anyhow::Result;
use colored::*;
use header_numbering::errors::print_warning;
use header_numbering::{BulkReport, BulkRunner, Settings, Translator, Vault};

pub fn bulk_number(vault: &Vault, settings: &Settings) -> Result<()> {
    let t = Translator::new(settings.language);
    println!("{}", t.t("bulk.numbering", &[]).cyan().bold());
    let report = BulkRunner::new(vault, settings).number_all();
    print_report(&t, &report);
    Ok(())
}

pub fn bulk_remove(vault: &Vault, settings: &Settings) -> Result<()> {
    let t = Translator::new(settings.language);
    println!("{}", t.t("bulk.removing", &[]).cyan().bold());
    let report = BulkRunner::new(vault, settings).remove_all();
    if report.modified == 0 && report.failed == 0 {
        println!("{}", t.t("bulk.nothing", &[]));
        return Ok(());
    }
    print_report(&t, &report);
    Ok(())
}

fn print_report(t: &Translator, report: &BulkReport) {
    let processed = report.processed.to_string();
    let modified = report.modified.to_string();
    let failed = report.failed.to_string();
    println!(
        "{} {}",
        "✓".green(),
        t.t(
            "bulk.completed",
            &[("processed", &processed), ("modified", &modified), ("failed", &failed)]
        )
    );
    if report.failed > 0 {
        print_warning(&t.t("bulk.failures", &[]));
    }
}
