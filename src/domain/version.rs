use crate::domain::{BuildMetaData, PreReleaseTag};
use crate::error::{FlowVersionError, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version with optional pre-release tag and build metadata
///
/// Precedence (see [`SemanticVersion::cmp_precedence`]) follows
/// major/minor/patch, then a release outranks any pre-release, then the
/// pre-release tags are compared. Build metadata never affects precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre_release_tag: Option<PreReleaseTag>,
    pub build_metadata: Option<BuildMetaData>,
}

impl SemanticVersion {
    /// Create a release version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            pre_release_tag: None,
            build_metadata: None,
        }
    }

    /// Attach a pre-release tag
    pub fn with_pre_release(mut self, tag: PreReleaseTag) -> Self {
        self.pre_release_tag = Some(tag);
        self
    }

    /// Attach build metadata
    pub fn with_build_metadata(mut self, metadata: BuildMetaData) -> Self {
        self.build_metadata = Some(metadata);
        self
    }

    /// Parse a tag name or branch suffix, returning `None` for anything that is not a version
    ///
    /// Accepts `[v]major.minor[.patch][-prerelease][+build]`; a missing
    /// patch is read as 0.
    pub fn try_parse(text: &str) -> Option<Self> {
        let re = Regex::new(r"^[vV]?(\d+)\.(\d+)(?:\.(\d+))?(?:-([^+]+))?(?:\+(.+))?$").ok()?;
        let captures = re.captures(text.trim())?;

        let major = captures.get(1)?.as_str().parse::<u32>().ok()?;
        let minor = captures.get(2)?.as_str().parse::<u32>().ok()?;
        let patch = match captures.get(3) {
            Some(m) => m.as_str().parse::<u32>().ok()?,
            None => 0,
        };

        Some(SemanticVersion {
            major,
            minor,
            patch,
            pre_release_tag: captures
                .get(4)
                .map(|m| PreReleaseTag::from_text(m.as_str())),
            build_metadata: captures
                .get(5)
                .map(|m| BuildMetaData::from_text(m.as_str())),
        })
    }

    /// Parse a version, failing with a parse error on malformed input
    pub fn parse(text: &str) -> Result<Self> {
        Self::try_parse(text).ok_or_else(|| {
            FlowVersionError::parse(format!(
                "'{}' is not a semantic version - expected major.minor[.patch][-tag][+meta]",
                text
            ))
        })
    }

    /// True when there is no pre-release tag
    pub fn is_release(&self) -> bool {
        self.pre_release_tag.is_none()
    }

    /// Compare two versions by precedence, ignoring build metadata
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre_release_tag, &other.pre_release_tag) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp_precedence(b),
            })
    }

    /// `major.minor.patch`
    pub fn major_minor_patch(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }

    /// Version with the commit count appended as build metadata, e.g. `1.1.0-beta.3+3`
    pub fn full_semver(&self) -> String {
        match self.build_metadata.as_ref().and_then(|m| m.short()) {
            Some(short) => format!("{}+{}", self, short),
            None => self.to_string(),
        }
    }

    /// Version with the complete build metadata appended
    pub fn informational_version(&self) -> String {
        match &self.build_metadata {
            Some(metadata) => {
                let full = metadata.to_string();
                if full.is_empty() {
                    self.to_string()
                } else {
                    format!("{}+{}", self, full)
                }
            }
            None => self.to_string(),
        }
    }

    /// Convert to a strict semver.org version
    ///
    /// The label becomes a single identifier: characters other than ASCII
    /// alphanumerics and `-` are replaced by `-`, so `alpha/login.2` becomes
    /// `alpha-login.2` and `alpha/1.02.1` becomes `alpha-1-02.1`.
    pub fn to_semver(&self) -> Result<semver::Version> {
        let mut version = semver::Version::new(
            u64::from(self.major),
            u64::from(self.minor),
            u64::from(self.patch),
        );

        if let Some(tag) = &self.pre_release_tag {
            let label: String = tag
                .label
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' {
                        c
                    } else {
                        '-'
                    }
                })
                .collect();
            let text = match tag.number {
                Some(number) => format!("{}.{}", label, number),
                None => label,
            };
            version.pre = semver::Prerelease::new(&text).map_err(|e| {
                FlowVersionError::parse(format!("Invalid pre-release '{}': {}", text, e))
            })?;
        }

        if let Some(short) = self.build_metadata.as_ref().and_then(|m| m.short()) {
            version.build = semver::BuildMetadata::new(&short).map_err(|e| {
                FlowVersionError::parse(format!("Invalid build metadata '{}': {}", short, e))
            })?;
        }

        Ok(version)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(tag) = &self.pre_release_tag {
            write!(f, "-{}", tag)?;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = FlowVersionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let v = SemanticVersion::parse("1.2.3").unwrap();
        assert_eq!(v, SemanticVersion::new(1, 2, 3));
        assert!(v.is_release());
    }

    #[test]
    fn test_parse_with_v_prefix() {
        assert_eq!(
            SemanticVersion::parse("v1.2.3").unwrap(),
            SemanticVersion::new(1, 2, 3)
        );
        assert_eq!(
            SemanticVersion::parse("V0.1.0").unwrap(),
            SemanticVersion::new(0, 1, 0)
        );
    }

    #[test]
    fn test_parse_without_patch() {
        assert_eq!(
            SemanticVersion::parse("1.2").unwrap(),
            SemanticVersion::new(1, 2, 0)
        );
    }

    #[test]
    fn test_parse_pre_release_and_metadata() {
        let v = SemanticVersion::parse("1.2.3-beta.4+7").unwrap();
        assert_eq!(v.pre_release_tag, Some(PreReleaseTag::new("beta", Some(4))));
        assert_eq!(v.build_metadata.unwrap().commits_since_tag, Some(7));
    }

    #[test]
    fn test_try_parse_rejects_non_versions() {
        for text in [
            "", "foo", "1", "1.x", "release-1.0", "1.2.3.4", "1.2.3-", "1.2.3+", "latest",
        ] {
            assert!(
                SemanticVersion::try_parse(text).is_none(),
                "'{}' should not parse",
                text
            );
        }
    }

    #[test]
    fn test_try_parse_rejects_overflow() {
        assert!(SemanticVersion::try_parse("99999999999.0.0").is_none());
    }

    #[test]
    fn test_parse_error_is_parse_variant() {
        let err = SemanticVersion::parse("next").unwrap_err();
        assert!(matches!(err, FlowVersionError::Parse(_)));
        assert!(err.to_string().contains("'next'"));
    }

    #[test]
    fn test_from_str() {
        let v: SemanticVersion = "2.0.1".parse().unwrap();
        assert_eq!(v, SemanticVersion::new(2, 0, 1));
    }

    #[test]
    fn test_precedence_numeric_parts() {
        let a = SemanticVersion::new(1, 2, 3);
        let b = SemanticVersion::new(1, 10, 0);
        assert_eq!(a.cmp_precedence(&b), Ordering::Less);
        assert_eq!(b.cmp_precedence(&a), Ordering::Greater);
    }

    #[test]
    fn test_release_outranks_pre_release() {
        let release = SemanticVersion::new(1, 2, 0);
        let rc = SemanticVersion::parse("1.2.0-rc.9").unwrap();
        assert_eq!(release.cmp_precedence(&rc), Ordering::Greater);
        assert_eq!(rc.cmp_precedence(&release), Ordering::Less);
    }

    #[test]
    fn test_pre_release_precedence() {
        let beta = SemanticVersion::parse("1.2.0-beta.2").unwrap();
        let rc = SemanticVersion::parse("1.2.0-rc.1").unwrap();
        assert_eq!(beta.cmp_precedence(&rc), Ordering::Less);
    }

    #[test]
    fn test_precedence_ignores_build_metadata() {
        let a = SemanticVersion::parse("1.0.0+1").unwrap();
        let b = SemanticVersion::parse("1.0.0+exp").unwrap();
        assert_eq!(a.cmp_precedence(&b), Ordering::Equal);
    }

    #[test]
    fn test_display_forms() {
        let v = SemanticVersion::new(1, 1, 0)
            .with_pre_release(PreReleaseTag::new("alpha/login", Some(2)))
            .with_build_metadata(BuildMetaData::from_text("2"));
        assert_eq!(v.to_string(), "1.1.0-alpha/login.2");
        assert_eq!(v.major_minor_patch(), "1.1.0");
        assert_eq!(v.full_semver(), "1.1.0-alpha/login.2+2");
        assert_eq!(v.informational_version(), "1.1.0-alpha/login.2+2");
    }

    #[test]
    fn test_full_semver_without_metadata() {
        let v = SemanticVersion::new(3, 0, 0);
        assert_eq!(v.full_semver(), "3.0.0");
        assert_eq!(v.informational_version(), "3.0.0");
    }

    #[test]
    fn test_to_semver_sanitizes_label() {
        let v = SemanticVersion::new(1, 1, 0)
            .with_pre_release(PreReleaseTag::new("alpha/login", Some(2)))
            .with_build_metadata(BuildMetaData::from_text("2"));
        let strict = v.to_semver().unwrap();
        assert_eq!(strict.to_string(), "1.1.0-alpha-login.2+2");
        assert!(strict < semver::Version::new(1, 1, 0));
    }

    #[test]
    fn test_to_semver_dotted_topic_keeps_leading_zeros_inside_label() {
        let v = SemanticVersion::new(0, 1, 0)
            .with_pre_release(PreReleaseTag::new("alpha/1.02", Some(3)));
        let strict = v.to_semver().unwrap();
        assert_eq!(strict.to_string(), "0.1.0-alpha-1-02.3");
    }

    #[test]
    fn test_to_semver_release() {
        let strict = SemanticVersion::new(2, 3, 4).to_semver().unwrap();
        assert_eq!(strict, semver::Version::new(2, 3, 4));
    }
}
