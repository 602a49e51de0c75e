use chrono::{DateTime, Utc};
use git2::Oid;
use std::fmt;

/// Commit/date pairs describing when a version was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDate {
    pub original_commit_sha: String,
    pub original_date: DateTime<Utc>,
    pub commit_sha: String,
    pub date: DateTime<Utc>,
}

impl ReleaseDate {
    /// Release date where the original and current commit are the same
    pub fn at(sha: impl Into<String>, date: DateTime<Utc>) -> Self {
        let sha = sha.into();
        ReleaseDate {
            original_commit_sha: sha.clone(),
            original_date: date,
            commit_sha: sha,
            date,
        }
    }
}

/// Build metadata attached to a semantic version
///
/// Every version produced by the finder carries `sha` and `release_date`
/// for the branch tip. Versions parsed from text only keep the raw
/// metadata they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMetaData {
    pub commits_since_tag: Option<u32>,
    pub branch: Option<String>,
    pub sha: Option<String>,
    pub release_date: Option<ReleaseDate>,
    pub other_metadata: Option<String>,
}

impl BuildMetaData {
    /// Metadata for a version computed at `tip`
    pub fn for_commit(
        branch: impl Into<String>,
        commits_since_tag: u32,
        tip: Oid,
        date: DateTime<Utc>,
    ) -> Self {
        let sha = tip.to_string();
        BuildMetaData {
            commits_since_tag: Some(commits_since_tag),
            branch: Some(branch.into()),
            sha: Some(sha.clone()),
            release_date: Some(ReleaseDate::at(sha, date)),
            other_metadata: None,
        }
    }

    /// Interpret the text after `+` in a version string
    pub fn from_text(text: &str) -> Self {
        if let Ok(commits) = text.parse::<u32>() {
            return BuildMetaData {
                commits_since_tag: Some(commits),
                ..BuildMetaData::default()
            };
        }

        BuildMetaData {
            other_metadata: Some(text.to_string()),
            ..BuildMetaData::default()
        }
    }

    /// Short form: only the number of commits since the version source
    pub fn short(&self) -> Option<String> {
        self.commits_since_tag.map(|n| n.to_string())
    }
}

/// Full form: `<commits>.Branch.<branch>.Sha.<sha>[.<other>]`, absent parts omitted
impl fmt::Display for BuildMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(commits) = self.commits_since_tag {
            parts.push(commits.to_string());
        }
        if let Some(branch) = &self.branch {
            parts.push(format!("Branch.{}", branch));
        }
        if let Some(sha) = &self.sha {
            parts.push(format!("Sha.{}", sha));
        }
        if let Some(other) = &self.other_metadata {
            parts.push(other.clone());
        }
        write!(f, "{}", parts.join("."))
    }
}
