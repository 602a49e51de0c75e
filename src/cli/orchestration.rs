//! Main workflow orchestration logic
//!
//! Opens the repository, picks the branch to version, resolves the version
//! and renders it. Kept free of clap so it can be called programmatically.

use anyhow::{Context, Result};

use crate::analyzer;
use crate::analyzer::preconditions::require_local_branch;
use crate::config::OutputFormat;
use crate::domain::SemanticVersion;
use crate::git::Git2Repository;
use crate::ui::formatter;

/// Arguments for the version workflow
#[derive(Debug, Clone, PartialEq)]
pub struct VersionWorkflowArgs {
    /// Any path inside the repository
    pub repo_path: String,

    /// Branch to version; `HEAD` when absent
    pub branch: Option<String>,

    /// Output format
    pub format: OutputFormat,

    /// Print only this variable instead of the formatted version
    pub show_variable: Option<String>,
}

/// Result of a successful version workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The branch that was versioned
    pub branch: String,

    /// The computed version
    pub version: SemanticVersion,

    /// Rendered output for stdout
    pub output: String,
}

/// Compute and render the version of a branch
pub fn run_version_workflow(args: &VersionWorkflowArgs) -> Result<WorkflowResult> {
    let repo = Git2Repository::open(&args.repo_path)
        .with_context(|| format!("Cannot open git repository at '{}'", args.repo_path))?;

    let current = match &args.branch {
        Some(name) => require_local_branch(&repo, name)?,
        None => repo.head_branch().context("Cannot resolve HEAD")?,
    };
    log::debug!("Versioning branch '{}' at {}", current.name, current.tip);

    let version = analyzer::find_version(&repo, &current)?;

    let output = match &args.show_variable {
        Some(name) => formatter::show_variable(&version, name)?,
        None => formatter::render(&version, args.format)?,
    };

    Ok(WorkflowResult {
        branch: current.name,
        version,
        output,
    })
}
