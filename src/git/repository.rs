use crate::error::{FlowVersionError, Result};
use crate::git::{BranchRef, TagRef};
use chrono::{DateTime, Utc};
use git2::{BranchType, ErrorCode, ObjectType, Oid, Repository as Git2Repo, Sort};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// The branch `HEAD` points at
    ///
    /// A detached `HEAD` becomes an unlisted branch named `(no branch)`, so
    /// owning-branch resolution walks from its commit.
    pub fn head_branch(&self) -> Result<BranchRef> {
        let head = self.repo.head()?;
        let tip = head.peel_to_commit()?.id();

        if head.is_branch() {
            let name = head
                .shorthand()
                .ok_or_else(|| FlowVersionError::repository("HEAD branch name is not UTF-8"))?;
            Ok(BranchRef::local(name, tip))
        } else {
            Ok(BranchRef {
                name: "(no branch)".to_string(),
                canonical_name: "HEAD".to_string(),
                is_remote: false,
                tip,
            })
        }
    }
}

impl super::Repository for Git2Repository {
    fn list_branches(&self) -> Result<Vec<BranchRef>> {
        let mut branches = Vec::new();

        for entry in self.repo.branches(None)? {
            let (branch, branch_type) = entry?;

            let name = match branch.name()? {
                Some(name) => name.to_string(),
                None => continue,
            };

            let reference = branch.get();
            let canonical_name = match reference.name() {
                Some(name) => name.to_string(),
                None => continue,
            };

            // origin/HEAD and similar symbolic refs resolve to their target
            let tip = match reference.resolve()?.target() {
                Some(oid) => oid,
                None => continue,
            };

            branches.push(BranchRef {
                name,
                canonical_name,
                is_remote: branch_type == BranchType::Remote,
                tip,
            });
        }

        Ok(branches)
    }

    fn find_branch(&self, name: &str) -> Result<Option<BranchRef>> {
        let branch = match self.repo.find_branch(name, BranchType::Local) {
            Ok(branch) => branch,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let tip = branch.get().peel_to_commit()?.id();
        Ok(Some(BranchRef::local(name, tip)))
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            // Annotated tags peel through the tag object; tags on trees or blobs have no commit
            let target = reference.peel(ObjectType::Commit).ok().map(|obj| obj.id());

            tags.push(TagRef {
                name: name.to_string(),
                target,
            });
        }

        Ok(tags)
    }

    fn merge_base(&self, a: Oid, b: Oid) -> Result<Option<Oid>> {
        match self.repo.merge_base(a, b) {
            Ok(oid) => Ok(Some(oid)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn commits_reachable_from(&self, tip: Oid) -> Result<Vec<Oid>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(tip)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            commits.push(oid?);
        }

        Ok(commits)
    }

    fn commit_time(&self, commit: Oid) -> Result<DateTime<Utc>> {
        let seconds = self.repo.find_commit(commit)?.committer().when().seconds();

        DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
            FlowVersionError::repository(format!(
                "Commit {} has an out-of-range timestamp {}",
                commit, seconds
            ))
        })
    }

    fn contains_commit(&self, tip: Oid, commit: Oid) -> Result<bool> {
        if tip == commit {
            return Ok(true);
        }
        Ok(self.repo.graph_descendant_of(tip, commit)?)
    }
}

// SAFETY: Git2Repository only issues read queries. libgit2 is built thread-safe
// and every query borrows the repository immutably.
unsafe impl Sync for Git2Repository {}
