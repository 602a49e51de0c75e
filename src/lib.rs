pub mod analyzer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod ui;

pub use analyzer::find_version;
pub use error::{FlowVersionError, Result};
