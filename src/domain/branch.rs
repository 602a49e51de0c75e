/// Long-lived integration branch
pub const DEVELOP: &str = "develop";
/// Long-lived production branch
pub const MASTER: &str = "master";

pub const FEATURE_PREFIX: &str = "feature/";
pub const RELEASE_PREFIX: &str = "release/";
pub const HOTFIX_PREFIX: &str = "hotfix/";

/// Branch kinds of the git-flow convention, classified from a branch name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind<'a> {
    Develop,
    Feature { topic: &'a str },
    Release { version: &'a str },
    Hotfix { version: &'a str },
    Unknown,
}

impl<'a> BranchKind<'a> {
    /// Classify a local branch name
    ///
    /// Release and hotfix versions are the text after the last `/`.
    pub fn classify(name: &'a str) -> Self {
        if name == DEVELOP {
            BranchKind::Develop
        } else if let Some(topic) = name.strip_prefix(FEATURE_PREFIX) {
            BranchKind::Feature { topic }
        } else if name.starts_with(RELEASE_PREFIX) {
            BranchKind::Release {
                version: version_suffix(name),
            }
        } else if name.starts_with(HOTFIX_PREFIX) {
            BranchKind::Hotfix {
                version: version_suffix(name),
            }
        } else {
            BranchKind::Unknown
        }
    }
}

/// Text after the last `/` of a branch name
pub fn version_suffix(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
