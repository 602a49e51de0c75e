use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Represents the complete configuration for flow-version.
///
/// Branch naming is fixed by the git-flow convention; only presentation and
/// diagnostics are configurable.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the computed version is printed
#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// All version variables as JSON
    #[default]
    Json,
    /// Strict semver.org version
    Semver,
    /// Version with commit count metadata, e.g. 1.1.0-beta.3+3
    Full,
    /// Version with branch and sha metadata
    Informational,
}

/// Output settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Returns the default log filter.
fn default_log_level() -> String {
    "warn".to_string()
}

/// Logging settings, used when `RUST_LOG` is not set.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `flowversion.toml` in current directory
/// 3. `.flowversion.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./flowversion.toml").exists() {
        fs::read_to_string("./flowversion.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".flowversion.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_parse_full_file() {
        let config: Config = toml::from_str(
            r#"
[output]
format = "informational"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.output.format, OutputFormat::Informational);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[output]\nformat = \"semver\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Semver);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(toml::from_str::<Config>("[output]\nformat = \"xml\"\n").is_err());
    }
}
