//! Version resolution engine
//!
//! - [topology]: owning branches and divergence points
//! - [last_release]: newest planned release visible from a branch
//! - [version_finder]: per-branch-kind version rules
//! - [preconditions]: required `master`/`develop` branches

pub mod last_release;
pub mod preconditions;
pub mod topology;
pub mod version_finder;

pub use last_release::LastReleaseFinder;
pub use version_finder::VersionFinder;

use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::git::{BranchRef, Repository};

/// Compute the version of `current` after checking the repository topology
///
/// # Errors
/// * `Topology` - `master` or `develop` is missing
/// * `Parse` - a `release/*` or `hotfix/*` branch name has no version suffix
pub fn find_version<R: Repository + ?Sized>(
    repo: &R,
    current: &BranchRef,
) -> Result<SemanticVersion> {
    preconditions::ensure_main_topology(repo)?;

    log::info!("git-flow version strategy will be used");
    VersionFinder::new(repo).find_version(current)
}
