use crate::analyzer::last_release::{planned_releases_only, LastReleaseFinder};
use crate::analyzer::preconditions::require_local_branch;
use crate::analyzer::topology::{count_commits_until, find_owning_branch};
use crate::domain::branch::{DEVELOP, MASTER};
use crate::domain::{BranchKind, BuildMetaData, PreReleaseTag, SemanticVersion, VersionTaggedCommit};
use crate::error::{FlowVersionError, Result};
use crate::git::{BranchRef, Repository};
use std::cmp::Ordering;

/// Computes the version of a branch tip from git-flow topology
pub struct VersionFinder<'r, R: Repository + ?Sized> {
    repo: &'r R,
}

impl<'r, R: Repository + ?Sized> VersionFinder<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        VersionFinder { repo }
    }

    /// Version of the tip of `current`
    ///
    /// A version tag on the tip is returned as-is. Otherwise the owning
    /// named branch decides the rule:
    ///
    /// | Owner         | Version                          | Pre-release           |
    /// |---------------|----------------------------------|-----------------------|
    /// | `develop`     | last planned release, minor + 1  | `beta.<n>`            |
    /// | `feature/<t>` | last planned release, minor + 1  | `alpha/<t>.<n>`       |
    /// | `release/<v>` | `<v>` with patch 0               | `rc.<n>`              |
    /// | `hotfix/<v>`  | `<v>`                            | `patch.<n>`           |
    /// | anything else | last planned release, minor + 1  | `alpha/unknown.<n>`   |
    ///
    /// # Errors
    /// `Parse` when a release or hotfix branch name has no version suffix.
    pub fn find_version(&self, current: &BranchRef) -> Result<SemanticVersion> {
        if let Some(tagged) = self.tagged_version(current)? {
            log::info!("Tip of '{}' is tagged {}", current.name, tagged);
            return Ok(tagged);
        }

        let owner = find_owning_branch(self.repo, current)?;
        log::debug!("'{}' is owned by '{}'", current.name, owner.name);

        let version = match BranchKind::classify(&owner.name) {
            BranchKind::Develop => {
                let (source, commits) = self.version_source(current)?;
                self.build_version(
                    next_minor(&source.version)?,
                    PreReleaseTag::new("beta", Some(commits)),
                    DEVELOP,
                    commits,
                    current,
                )?
            }
            BranchKind::Feature { topic } => {
                let (source, commits) = self.version_source(current)?;
                self.build_version(
                    next_minor(&source.version)?,
                    PreReleaseTag::new(format!("alpha/{}", topic), Some(commits)),
                    &owner.name,
                    commits,
                    current,
                )?
            }
            BranchKind::Release { version } => {
                let planned = self.branch_version(&owner.name, version)?;
                let commits = self.commits_since_merge_base(current, DEVELOP)?;
                self.build_version(
                    SemanticVersion::new(planned.major, planned.minor, 0),
                    PreReleaseTag::new("rc", Some(commits)),
                    &owner.name,
                    commits,
                    current,
                )?
            }
            BranchKind::Hotfix { version } => {
                let planned = self.branch_version(&owner.name, version)?;
                let commits = self.commits_since_merge_base(current, MASTER)?;
                self.build_version(
                    SemanticVersion::new(planned.major, planned.minor, planned.patch),
                    PreReleaseTag::new("patch", Some(commits)),
                    &owner.name,
                    commits,
                    current,
                )?
            }
            BranchKind::Unknown => {
                let (source, commits) = self.version_source(current)?;
                self.build_version(
                    next_minor(&source.version)?,
                    PreReleaseTag::new("alpha/unknown", Some(commits)),
                    &owner.name,
                    commits,
                    current,
                )?
            }
        };

        log::info!("Resolved '{}' to {}", current.name, version.full_semver());
        Ok(version)
    }

    /// Highest version tag pointing exactly at the tip
    ///
    /// Build metadata always names `master`, whichever branch carries the tag.
    fn tagged_version(&self, current: &BranchRef) -> Result<Option<SemanticVersion>> {
        let mut best: Option<SemanticVersion> = None;

        for tag in self.repo.list_tags()? {
            if tag.target != Some(current.tip) {
                continue;
            }
            let version = match SemanticVersion::try_parse(&tag.name) {
                Some(version) => version,
                None => {
                    log::debug!("Tag '{}' on the tip is not a version", tag.name);
                    continue;
                }
            };

            let is_better = best
                .as_ref()
                .map_or(true, |b| version.cmp_precedence(b) == Ordering::Greater);
            if is_better {
                best = Some(version);
            }
        }

        match best {
            Some(version) => {
                let date = self.repo.commit_time(current.tip)?;
                Ok(Some(version.with_build_metadata(BuildMetaData::for_commit(
                    MASTER,
                    0,
                    current.tip,
                    date,
                ))))
            }
            None => Ok(None),
        }
    }

    /// Last planned release visible from `branch` and the number of commits made since
    ///
    /// Without any release, the source is `0.0.0` at the oldest commit.
    fn version_source(&self, branch: &BranchRef) -> Result<(VersionTaggedCommit, u32)> {
        let history = self.repo.commits_reachable_from(branch.tip)?;

        let source = match LastReleaseFinder::new(self.repo)
            .find_last_version_before_branch(branch, planned_releases_only)?
        {
            Some(source) => source,
            None => {
                let root = history.last().copied().ok_or_else(|| {
                    FlowVersionError::repository(format!("Branch '{}' has no commits", branch.name))
                })?;
                VersionTaggedCommit::fallback(root)
            }
        };

        let mut commits = count_commits_until(&history, Some(source.commit));
        if source.counts_anchor_commit() && history.contains(&source.commit) {
            commits += 1;
        }

        log::debug!(
            "Version source for '{}' is {} at {}, {} commits since",
            branch.name,
            source.version,
            source.commit,
            commits
        );
        Ok((source, commits))
    }

    /// Commits on `current` made after it forked from `base`
    fn commits_since_merge_base(&self, current: &BranchRef, base: &str) -> Result<u32> {
        let base = require_local_branch(self.repo, base)?;
        let start = self.repo.merge_base(current.tip, base.tip)?;
        let history = self.repo.commits_reachable_from(current.tip)?;
        Ok(count_commits_until(&history, start))
    }

    fn branch_version(&self, branch_name: &str, suffix: &str) -> Result<SemanticVersion> {
        SemanticVersion::parse(suffix).map_err(|_| {
            FlowVersionError::parse(format!(
                "Branch '{}' does not end with a version, '{}' is not a semantic version",
                branch_name, suffix
            ))
        })
    }

    fn build_version(
        &self,
        version: SemanticVersion,
        tag: PreReleaseTag,
        branch_name: &str,
        commits: u32,
        current: &BranchRef,
    ) -> Result<SemanticVersion> {
        let date = self.repo.commit_time(current.tip)?;
        Ok(version
            .with_pre_release(tag)
            .with_build_metadata(BuildMetaData::for_commit(
                branch_name,
                commits,
                current.tip,
                date,
            )))
    }
}

/// `major.(minor + 1).0` after a planned release
fn next_minor(released: &SemanticVersion) -> Result<SemanticVersion> {
    let minor = released.minor.checked_add(1).ok_or_else(|| {
        FlowVersionError::parse(format!(
            "Release {} has no next minor version",
            released.major_minor_patch()
        ))
    })?;
    Ok(SemanticVersion::new(released.major, minor, 0))
}
