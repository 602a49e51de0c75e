//! Pre-release tag handling
//!
//! A pre-release tag is a free-form label plus an optional number, rendered as
//! `label.number` (e.g. `beta.5`, `alpha/login.2`, `rc`).

use std::cmp::Ordering;
use std::fmt;

/// Pre-release tag with optional number
///
/// # Examples
/// - "rc" -> PreReleaseTag { label: "rc", number: None }
/// - "beta.5" -> PreReleaseTag { label: "beta", number: Some(5) }
/// - "alpha/login.2" -> PreReleaseTag { label: "alpha/login", number: Some(2) }
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreReleaseTag {
    /// The pre-release label (beta, rc, alpha/<topic>, ...)
    pub label: String,
    /// Number appended after the last dot
    pub number: Option<u32>,
}

impl PreReleaseTag {
    /// Create a new pre-release tag
    pub fn new(label: impl Into<String>, number: Option<u32>) -> Self {
        PreReleaseTag {
            label: label.into(),
            number,
        }
    }

    /// Split pre-release text into label and number
    ///
    /// The text is split at its last dot when the part after it is numeric,
    /// otherwise the whole text is the label.
    pub fn from_text(text: &str) -> Self {
        if let Some((label, number)) = text.rsplit_once('.') {
            if let Ok(number) = number.parse::<u32>() {
                return PreReleaseTag::new(label, Some(number));
            }
        }

        PreReleaseTag::new(text, None)
    }

    /// Compare by label first, then number; a missing number ranks lowest
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.label
            .cmp(&other.label)
            .then_with(|| self.number.cmp(&other.number))
    }
}

impl fmt::Display for PreReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(number) = self.number {
            write!(f, ".{}", number)?;
        }
        Ok(())
    }
}
