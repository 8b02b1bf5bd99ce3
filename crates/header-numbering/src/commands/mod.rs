//! Command implementations

pub mod analyze;
pub mod backlinks;
pub mod bulk;
pub mod directive;
pub mod number;
pub mod remove;
pub mod resolve;
pub mod separator;
pub mod toggle;

pub use analyze::analyze;
pub use backlinks::backlinks;
pub use bulk::{bulk_number, bulk_remove};
pub use directive::{directive_add, directive_remove, directive_reset};
pub use number::number;
pub use remove::remove;
pub use resolve::resolve;
pub use separator::set_separator;
pub use toggle::{toggle_document, toggle_global};
