//! User interface module - terminal status output and version rendering.
//!
//! - `formatter` - Pure rendering of versions and version variables
//! - This module - Styled messages on stderr, keeping stdout for the version

use console::style;

pub mod formatter;

pub use formatter::{render, show_variable, VersionVariables};

/// Print an error message to stderr
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Print a progress message to stderr
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}
