use crate::domain::SemanticVersion;
use git2::Oid;

/// Where a version source was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseSource {
    /// Merge-base of an open `release/*` branch with `develop`
    OpenedRelease,
    /// First commit on the branch that is not part of a tagged commit's history
    FinishedRelease,
    /// Synthetic `0.0.0` anchored at the oldest commit of a branch
    Fallback,
}

/// A commit paired with the version it represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTaggedCommit {
    pub commit: Oid,
    pub version: SemanticVersion,
    pub source: ReleaseSource,
}

impl VersionTaggedCommit {
    pub fn new(commit: Oid, version: SemanticVersion, source: ReleaseSource) -> Self {
        VersionTaggedCommit {
            commit,
            version,
            source,
        }
    }

    /// `0.0.0` anchored at `root`
    pub fn fallback(root: Oid) -> Self {
        Self::new(root, SemanticVersion::default(), ReleaseSource::Fallback)
    }

    /// Whether the anchor commit itself is counted as a commit since the source.
    ///
    /// A finished release is anchored on the first commit made after the tag,
    /// which is new work. Merge-bases and the root fallback are not.
    pub fn counts_anchor_commit(&self) -> bool {
        self.source == ReleaseSource::FinishedRelease
    }
}
