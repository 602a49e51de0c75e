//! Last planned release lookup
//!
//! A release is "planned" once a `release/<version>` branch has been opened
//! from `develop`, and stays known after it is finished and tagged. Both
//! sources are merged so that work on `develop` and feature branches always
//! builds on the newest release, finished or not.

use crate::analyzer::preconditions::require_local_branch;
use crate::analyzer::topology::find_earliest_divergent_commit;
use crate::domain::branch::{version_suffix, DEVELOP, RELEASE_PREFIX};
use crate::domain::{ReleaseSource, SemanticVersion, VersionTaggedCommit};
use crate::error::Result;
use crate::git::{BranchRef, Repository};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Keep only releases with patch 0; hotfix versions never plan the next minor
pub fn planned_releases_only(candidate: &VersionTaggedCommit) -> bool {
    candidate.version.patch == 0
}

/// Keep every release candidate
pub fn any_release(_candidate: &VersionTaggedCommit) -> bool {
    true
}

/// Finds the newest release visible from a branch
pub struct LastReleaseFinder<'r, R: Repository + ?Sized> {
    repo: &'r R,
}

impl<'r, R: Repository + ?Sized> LastReleaseFinder<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        LastReleaseFinder { repo }
    }

    /// Highest-ranked release committed strictly before the tip of `branch`
    ///
    /// Candidates come from open release branches, then from version tags.
    /// `filter` drops candidates before ranking; among versions of equal
    /// precedence the first candidate found wins.
    pub fn find_last_version_before_branch<F>(
        &self,
        branch: &BranchRef,
        filter: F,
    ) -> Result<Option<VersionTaggedCommit>>
    where
        F: Fn(&VersionTaggedCommit) -> bool,
    {
        let tip_time = self.repo.commit_time(branch.tip)?;

        let mut candidates = self.opened_releases(tip_time)?;
        candidates.extend(self.finished_releases(branch, tip_time)?);

        let mut best: Option<VersionTaggedCommit> = None;
        for candidate in candidates.into_iter().filter(|c| filter(c)) {
            log::debug!(
                "Release candidate {} at {} ({:?})",
                candidate.version,
                candidate.commit,
                candidate.source
            );

            let is_better = best.as_ref().map_or(true, |current| {
                candidate.version.cmp_precedence(&current.version) == Ordering::Greater
            });
            if is_better {
                best = Some(candidate);
            }
        }

        Ok(best)
    }

    /// Merge-bases of `release/*` branches with `develop`
    fn opened_releases(&self, tip_time: DateTime<Utc>) -> Result<Vec<VersionTaggedCommit>> {
        let develop = require_local_branch(self.repo, DEVELOP)?;
        let mut releases = Vec::new();

        for release in self.repo.list_local_branches()? {
            if !release.name.starts_with(RELEASE_PREFIX) {
                continue;
            }

            let version = match SemanticVersion::try_parse(version_suffix(&release.name)) {
                Some(version) => version,
                None => {
                    log::debug!("Ignoring release branch '{}' without a version", release.name);
                    continue;
                }
            };

            let start = match self.repo.merge_base(release.tip, develop.tip)? {
                Some(start) => start,
                None => continue,
            };

            if self.is_before(start, tip_time)? {
                releases.push(VersionTaggedCommit::new(
                    start,
                    version,
                    ReleaseSource::OpenedRelease,
                ));
            }
        }

        Ok(releases)
    }

    /// Version tags, anchored at the first commit of `branch` made after the tagged commit
    fn finished_releases(
        &self,
        branch: &BranchRef,
        tip_time: DateTime<Utc>,
    ) -> Result<Vec<VersionTaggedCommit>> {
        let history = self.repo.commits_reachable_from(branch.tip)?;
        let mut releases = Vec::new();

        for tag in self.repo.list_tags()? {
            let version = match SemanticVersion::try_parse(&tag.name) {
                Some(version) => version,
                None => continue,
            };
            let tagged = match tag.target {
                Some(tagged) => tagged,
                None => continue,
            };

            let start = match find_earliest_divergent_commit(self.repo, &history, tagged)? {
                Some(start) => start,
                None => continue,
            };

            if self.is_before(start, tip_time)? {
                releases.push(VersionTaggedCommit::new(
                    start,
                    version,
                    ReleaseSource::FinishedRelease,
                ));
            }
        }

        Ok(releases)
    }

    fn is_before(&self, commit: git2::Oid, tip_time: DateTime<Utc>) -> Result<bool> {
        Ok(self.repo.commit_time(commit)? < tip_time)
    }
}
