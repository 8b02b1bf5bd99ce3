//! Header numbering CLI tool

use anyhow::Result;
use clap::Parser;
use header_numbering::errors::print_error_with_suggestion;
use header_numbering::{Settings, Vault};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{BulkCommands, Cli, Commands, DirectiveCommands};
use commands::*;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("header_numbering=debug")
    } else {
        EnvFilter::try_from_env("HNUM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let vault = Vault::new(&cli.vault);
    let mut settings = match Settings::load(vault.root()) {
        Ok(settings) => settings,
        Err(e) => {
            print_error_with_suggestion(
                "Failed to load settings",
                &e,
                &format!("Check {}", Settings::path(vault.root()).display()),
            );
            std::process::exit(1);
        }
    };

    if let Err(e) = settings.validate() {
        print_error_with_suggestion(
            "Invalid settings",
            &anyhow::Error::new(e),
            &format!("Fix the value in {}", Settings::path(vault.root()).display()),
        );
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Number { doc, dry_run } => number(&vault, &settings, &doc, dry_run),
        Commands::Remove { doc, dry_run } => remove(&vault, &settings, &doc, dry_run),
        Commands::Analyze { doc } => analyze(&vault, &settings, &doc),
        Commands::Resolve { doc, json } => resolve(&vault, &settings, &doc, json),
        Commands::Toggle => toggle_global(&vault, &mut settings),
        Commands::Separator { separator } => set_separator(&vault, &mut settings, &separator),
        Commands::ToggleDoc { doc } => toggle_document(&vault, &mut settings, &doc),
        Commands::Directive(directive_cmd) => match directive_cmd {
            DirectiveCommands::Add { doc } => directive_add(&vault, &settings, &doc),
            DirectiveCommands::Reset { doc } => directive_reset(&vault, &settings, &doc),
            DirectiveCommands::Remove { doc } => directive_remove(&vault, &settings, &doc),
        },
        Commands::Bulk(bulk_cmd) => match bulk_cmd {
            BulkCommands::Number => bulk_number(&vault, &settings),
            BulkCommands::Remove => bulk_remove(&vault, &settings),
        },
        Commands::Backlinks { doc, heading } => backlinks(&vault, &settings, &doc, &heading),
    };

    if let Err(e) = result {
        header_numbering::errors::print_error("Command failed", &e);
        std::process::exit(1);
    }

    Ok(())
}
