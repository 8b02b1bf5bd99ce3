//! Failure reporting for `hnum`
//!
//! Everything here writes to stderr. Notices that succeed go to stdout from
//! the command modules instead.

use crate::backlinks::BacklinkError;
use colored::*;

/// `Error: <context>` followed by the error and each of its causes
pub fn print_error(context: &str, error: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), context);
    eprintln!("  {}", error.to_string().red());
    for cause in error.chain().skip(1) {
        eprintln!("  {} {}", "Caused by:".dimmed(), cause.to_string().dimmed());
    }
}

/// [`print_error`] plus a hint on what to fix
pub fn print_error_with_suggestion(context: &str, error: &anyhow::Error, suggestion: &str) {
    print_error(context, error);
    eprintln!("\n{} {}", "Hint:".cyan().bold(), suggestion);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Notice for a backlink batch that did not commit
///
/// Rolled back batches are a warning. A failed rollback is critical since
/// documents may now disagree with each other.
pub fn print_backlink_failure(notice: &str, error: &BacklinkError) {
    if error.is_fatal() {
        eprintln!("{} {}", "Critical:".red().bold().underline(), notice.red());
    } else {
        print_warning(notice);
    }
}
