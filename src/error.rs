use thiserror::Error;

/// Unified error type for flow-version operations
#[derive(Error, Debug)]
pub enum FlowVersionError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error(
        "This repository doesn't contain a branch named '{branch}'. Please create one. Existing branches: {}",
        quote_all(.existing)
    )]
    Topology { branch: String, existing: Vec<String> },

    #[error("Version parsing error: {0}")]
    Parse(String),

    #[error("No local branch contains commit {0}")]
    NoOwningBranch(String),

    #[error("Repository data error: {0}")]
    Repository(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in flow-version
pub type Result<T> = std::result::Result<T, FlowVersionError>;

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect::<Vec<_>>()
        .join(", ")
}

impl FlowVersionError {
    /// Create a topology error for a missing base branch
    pub fn topology(branch: impl Into<String>, existing: Vec<String>) -> Self {
        FlowVersionError::Topology {
            branch: branch.into(),
            existing,
        }
    }

    /// Create a version parsing error with context
    pub fn parse(msg: impl Into<String>) -> Self {
        FlowVersionError::Parse(msg.into())
    }

    /// Create a repository data error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        FlowVersionError::Repository(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        FlowVersionError::Config(msg.into())
    }
}
