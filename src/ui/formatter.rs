//! Rendering of a computed version for build pipelines

use crate::config::OutputFormat;
use crate::domain::SemanticVersion;
use crate::error::{FlowVersionError, Result};
use serde::Serialize;

/// Version variables exposed to build scripts
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct VersionVariables {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub major_minor_patch: String,
    pub pre_release_tag: String,
    pub pre_release_label: String,
    pub pre_release_number: Option<u32>,
    pub build_meta_data: Option<u32>,
    pub full_build_meta_data: String,
    pub sem_ver: String,
    pub full_sem_ver: String,
    pub informational_version: String,
    pub branch_name: String,
    pub sha: String,
    pub commits_since_version_source: Option<u32>,
    pub commit_date: String,
}

impl VersionVariables {
    pub fn from_version(version: &SemanticVersion) -> Self {
        let metadata = version.build_metadata.clone().unwrap_or_default();
        let tag = version.pre_release_tag.as_ref();

        VersionVariables {
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            major_minor_patch: version.major_minor_patch(),
            pre_release_tag: tag.map(|t| t.to_string()).unwrap_or_default(),
            pre_release_label: tag.map(|t| t.label.clone()).unwrap_or_default(),
            pre_release_number: tag.and_then(|t| t.number),
            build_meta_data: metadata.commits_since_tag,
            full_build_meta_data: metadata.to_string(),
            sem_ver: version.to_string(),
            full_sem_ver: version.full_semver(),
            informational_version: version.informational_version(),
            branch_name: metadata.branch.clone().unwrap_or_default(),
            sha: metadata.sha.clone().unwrap_or_default(),
            commits_since_version_source: metadata.commits_since_tag,
            commit_date: metadata
                .release_date
                .as_ref()
                .map(|d| d.date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Render a version in the requested format
pub fn render(version: &SemanticVersion, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(
            &VersionVariables::from_version(version),
        )?),
        OutputFormat::Semver => Ok(version.to_semver()?.to_string()),
        OutputFormat::Full => Ok(version.full_semver()),
        OutputFormat::Informational => Ok(version.informational_version()),
    }
}

/// Value of a single variable such as `FullSemVer`; missing values print as empty
pub fn show_variable(version: &SemanticVersion, name: &str) -> Result<String> {
    let value = serde_json::to_value(VersionVariables::from_version(version))?;
    let variables = value
        .as_object()
        .ok_or_else(|| FlowVersionError::config("Version variables are not an object"))?;

    match variables.get(name) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Null) => Ok(String::new()),
        Some(other) => Ok(other.to_string()),
        None => {
            let names: Vec<&str> = variables.keys().map(|k| k.as_str()).collect();
            Err(FlowVersionError::config(format!(
                "Unknown variable '{}'. Available variables: {}",
                name,
                names.join(", ")
            )))
        }
    }
}
