//! Pure queries over the repository facade: owning branches and divergence points

use crate::domain::branch::{DEVELOP, MASTER};
use crate::error::{FlowVersionError, Result};
use crate::git::{BranchRef, Repository};
use git2::Oid;
use std::collections::HashSet;

/// `develop` first, then `master`, then everything else in listing order
fn preference(branch: &BranchRef) -> u8 {
    match branch.name.as_str() {
        DEVELOP => 0,
        MASTER => 1,
        _ => 2,
    }
}

fn pick_preferred(candidates: Vec<BranchRef>) -> Option<BranchRef> {
    // min_by_key keeps the first of equally preferred branches
    candidates.into_iter().min_by_key(preference)
}

/// Find the local branch that owns `commit`
///
/// A branch whose tip is `commit` wins outright. Otherwise the local
/// branches containing `commit` are considered. In both cases `develop` is
/// preferred over `master`, and remaining ties go to the first branch in
/// facade order.
///
/// # Errors
/// `NoOwningBranch` when no local branch contains the commit.
pub fn find_owning_branch_for_commit<R: Repository + ?Sized>(
    repo: &R,
    commit: Oid,
) -> Result<BranchRef> {
    let branches = repo.list_local_branches()?;

    let at_tip: Vec<BranchRef> = branches.iter().filter(|b| b.tip == commit).cloned().collect();
    if let Some(branch) = pick_preferred(at_tip) {
        log::debug!("Commit {} is the tip of '{}'", commit, branch.name);
        return Ok(branch);
    }

    let mut containing = Vec::new();
    for branch in branches {
        if repo.contains_commit(branch.tip, commit)? {
            containing.push(branch);
        }
    }

    let owner = pick_preferred(containing)
        .ok_or_else(|| FlowVersionError::NoOwningBranch(commit.to_string()))?;
    log::debug!("Commit {} is owned by '{}'", commit, owner.name);
    Ok(owner)
}

/// Find the named branch that owns `branch`
///
/// A listed local branch owns itself. Anything else (a detached `HEAD`, a
/// remote-tracking branch) is resolved from its tip commit.
pub fn find_owning_branch<R: Repository + ?Sized>(
    repo: &R,
    branch: &BranchRef,
) -> Result<BranchRef> {
    let is_listed = !branch.is_remote
        && repo
            .list_local_branches()?
            .iter()
            .any(|b| b.canonical_name == branch.canonical_name);

    if is_listed {
        return Ok(branch.clone());
    }
    find_owning_branch_for_commit(repo, branch.tip)
}

/// Oldest commit of `history` (newest first) that is not in `excluded`
fn earliest_commit_not_in(history: &[Oid], excluded: &HashSet<Oid>) -> Option<Oid> {
    history.iter().rev().find(|c| !excluded.contains(*c)).copied()
}

/// Oldest commit of `history` that is not reachable from `other`
///
/// `history` is the newest-first walk of the branch under evaluation, as
/// returned by [Repository::commits_reachable_from]. Returns `None` when all
/// of it is contained in the history of `other`.
pub fn find_earliest_divergent_commit<R: Repository + ?Sized>(
    repo: &R,
    history: &[Oid],
    other: Oid,
) -> Result<Option<Oid>> {
    let excluded: HashSet<Oid> = repo.commits_reachable_from(other)?.into_iter().collect();
    Ok(earliest_commit_not_in(history, &excluded))
}

/// Number of commits in `history` (newest first) before `stop`
///
/// Counts the whole history when `stop` is `None` or not part of it.
pub fn count_commits_until(history: &[Oid], stop: Option<Oid>) -> u32 {
    let count = history.iter().take_while(|c| Some(**c) != stop).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
