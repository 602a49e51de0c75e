use crate::domain::branch::{DEVELOP, MASTER};
use crate::error::{FlowVersionError, Result};
use crate::git::{BranchRef, Repository};

/// Verify that the long-lived `master` and `develop` branches exist locally
pub fn ensure_main_topology<R: Repository + ?Sized>(repo: &R) -> Result<()> {
    require_local_branch(repo, MASTER)?;
    require_local_branch(repo, DEVELOP)?;
    Ok(())
}

/// Look up a local branch, failing with a topology error that lists every existing branch
pub fn require_local_branch<R: Repository + ?Sized>(repo: &R, name: &str) -> Result<BranchRef> {
    if let Some(branch) = repo.find_branch(name)? {
        return Ok(branch);
    }

    let existing = repo
        .list_branches()?
        .into_iter()
        .map(|b| b.canonical_name)
        .collect();
    Err(FlowVersionError::topology(name, existing))
}
