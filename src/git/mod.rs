//! Git access abstraction layer
//!
//! The version resolution core only reads repository state through the
//! [Repository] trait. Two implementations exist:
//!
//! - [repository::Git2Repository]: a real repository opened with the `git2` crate
//! - [mock::MockRepository]: an in-memory commit graph for tests
//!
//! ```rust
//! # use flow_version::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> flow_version::Result<()> {
//! if let Some(develop) = repo.find_branch("develop")? {
//!     let history = repo.commits_reachable_from(develop.tip)?;
//!     println!("develop has {} commits", history.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use chrono::{DateTime, Utc};
use git2::Oid;

/// Read-only view of a branch at query time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Short name, e.g. `feature/login` or `origin/develop`
    pub name: String,
    /// Full reference name, e.g. `refs/heads/feature/login`
    pub canonical_name: String,
    /// Whether this is a remote-tracking branch
    pub is_remote: bool,
    /// Commit at the tip of the branch
    pub tip: Oid,
}

impl BranchRef {
    /// A local branch `refs/heads/<name>`
    pub fn local(name: impl Into<String>, tip: Oid) -> Self {
        let name = name.into();
        BranchRef {
            canonical_name: format!("refs/heads/{}", name),
            name,
            is_remote: false,
            tip,
        }
    }

    /// A remote-tracking branch `refs/remotes/<name>`
    pub fn remote(name: impl Into<String>, tip: Oid) -> Self {
        let name = name.into();
        BranchRef {
            canonical_name: format!("refs/remotes/{}", name),
            name,
            is_remote: true,
            tip,
        }
    }
}

/// A tag and the commit it peels to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    /// `None` when the tag does not point (through annotations) at a commit
    pub target: Option<Oid>,
}

/// Repository queries needed by version resolution
///
/// All implementors must be `Send + Sync`. Methods return
/// [crate::error::Result<T>]; backends map their own failures to
/// [crate::error::FlowVersionError] variants.
pub trait Repository: Send + Sync {
    /// All branches, local and remote-tracking, in a stable order
    fn list_branches(&self) -> Result<Vec<BranchRef>>;

    /// Local branches only, in the same order as [Repository::list_branches]
    fn list_local_branches(&self) -> Result<Vec<BranchRef>> {
        Ok(self
            .list_branches()?
            .into_iter()
            .filter(|b| !b.is_remote)
            .collect())
    }

    /// Find a local branch by its short name
    ///
    /// # Returns
    /// * `Ok(Some(BranchRef))` - The branch exists
    /// * `Ok(None)` - No local branch has that name
    fn find_branch(&self, name: &str) -> Result<Option<BranchRef>>;

    /// All tags with their peeled commit targets
    fn list_tags(&self) -> Result<Vec<TagRef>>;

    /// Best common ancestor of two commits, `None` for unrelated histories
    fn merge_base(&self, a: Oid, b: Oid) -> Result<Option<Oid>>;

    /// Every commit reachable from `tip`, including `tip`, newest first
    ///
    /// Children always come before their parents; otherwise commits are
    /// ordered by commit time, newest first.
    fn commits_reachable_from(&self, tip: Oid) -> Result<Vec<Oid>>;

    /// Committer timestamp of a commit
    fn commit_time(&self, commit: Oid) -> Result<DateTime<Utc>>;

    /// Whether `commit` is part of the history of `tip`
    fn contains_commit(&self, tip: Oid, commit: Oid) -> Result<bool> {
        if tip == commit {
            return Ok(true);
        }
        Ok(self.commits_reachable_from(tip)?.contains(&commit))
    }
}
