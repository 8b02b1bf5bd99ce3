//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hnum")]
#[command(version, about = "Hierarchical header numbering for markdown vaults", long_about = None)]
#[command(after_help = "Use 'hnum <command> --help' for more information about a command.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the vault directory
    #[arg(short = 'd', long, global = true, default_value = ".")]
    pub vault: String,

    /// Log numbering decisions to stderr (overrides HNUM_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add or refresh header numbers in a document
    #[command(visible_alias = "n")]
    Number {
        /// Path to document
        doc: String,

        /// Show the changes without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Strip header numbers from a document
    #[command(visible_alias = "rm")]
    Remove {
        /// Path to document
        doc: String,

        /// Show the changes without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show which header levels a document uses
    Analyze {
        /// Path to document
        doc: String,
    },

    /// Show the effective numbering configuration of a document
    #[command(visible_alias = "config")]
    Resolve {
        /// Path to document
        doc: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle header numbering for the whole vault
    Toggle,

    /// Set the separator between a header's number and its title
    Separator {
        /// Separator name
        #[arg(value_parser = ["tab", "space"])]
        separator: String,
    },

    /// Toggle header numbering for one document
    ToggleDoc {
        /// Path to document
        doc: String,
    },

    /// Manage a document's numbering directives
    #[command(subcommand)]
    Directive(DirectiveCommands),

    /// Run a pass over every document in the vault
    #[command(subcommand)]
    Bulk(BulkCommands),

    /// List links in other documents that point at a heading
    #[command(visible_alias = "links")]
    Backlinks {
        /// Path to document
        doc: String,

        /// Heading text
        heading: String,
    },
}

#[derive(Subcommand)]
pub enum DirectiveCommands {
    /// Add a directive block describing the current settings
    Add {
        /// Path to document
        doc: String,
    },

    /// Replace the directive block with one describing the current settings
    Reset {
        /// Path to document
        doc: String,
    },

    /// Delete the directive block
    #[command(visible_alias = "rm")]
    Remove {
        /// Path to document
        doc: String,
    },
}

#[derive(Subcommand)]
pub enum BulkCommands {
    /// Number every document with numbering enabled
    Number,

    /// Strip numbering from every document
    Remove,
}
