//! Domain logic - version value objects and branch naming rules, independent of git access

pub mod branch;
pub mod build_metadata;
pub mod prerelease;
pub mod tagged_commit;
pub mod version;

pub use branch::BranchKind;
pub use build_metadata::{BuildMetaData, ReleaseDate};
pub use prerelease::PreReleaseTag;
pub use tagged_commit::{ReleaseSource, VersionTaggedCommit};
pub use version::SemanticVersion;
