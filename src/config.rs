//! # Analysis Configuration
//!
//! Settings for the command-line analysis: which part to analyse and which
//! discovered patterns are worth reporting. They can come from a YAML file;
//! command-line flags override file values.
//!
//! ## YAML Format
//! ```yaml
//! part: 1
//! min-pattern-size: 3
//! min-translators: 1
//! format: json        # text | json
//! show-score: false
//! ```
//!
//! Every key is optional. Unknown keys are rejected so that typos do not
//! silently fall back to defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::OstinatoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// 1-based part number.
    pub part: usize,
    pub min_pattern_size: usize,
    pub min_translators: usize,
    pub format: OutputFormat,
    pub show_score: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            part: 1,
            min_pattern_size: 3,
            min_translators: 1,
            format: OutputFormat::Text,
            show_score: false,
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    part: Option<usize>,
    min_pattern_size: Option<usize>,
    min_translators: Option<usize>,
    format: Option<String>,
    show_score: Option<bool>,
}

impl AnalysisConfig {
    /// Parse YAML configuration; missing keys keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, OstinatoError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| OstinatoError::ConfigError(e.to_string()))?;

        let defaults = Self::default();
        let format = match raw.format {
            Some(ref f) => OutputFormat::from_str(f).ok_or_else(|| {
                OstinatoError::ConfigError(format!("Unknown output format: {}", f))
            })?,
            None => defaults.format,
        };

        let config = Self {
            part: raw.part.unwrap_or(defaults.part),
            min_pattern_size: raw.min_pattern_size.unwrap_or(defaults.min_pattern_size),
            min_translators: raw.min_translators.unwrap_or(defaults.min_translators),
            format,
            show_score: raw.show_score.unwrap_or(defaults.show_score),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OstinatoError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| OstinatoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<(), OstinatoError> {
        if self.part == 0 {
            return Err(OstinatoError::ConfigError(
                "part numbers start at 1".to_string(),
            ));
        }
        if self.min_pattern_size == 0 {
            return Err(OstinatoError::ConfigError(
                "min-pattern-size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(AnalysisConfig::from_yaml("").unwrap(), AnalysisConfig::default());
        assert_eq!(AnalysisConfig::from_yaml("  \n").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = AnalysisConfig::from_yaml("part: 2\nmin-translators: 3\n").unwrap();
        assert_eq!(config.part, 2);
        assert_eq!(config.min_translators, 3);
        assert_eq!(config.min_pattern_size, 3);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_full_config() {
        let config = AnalysisConfig::from_yaml(
            "part: 1\nmin-pattern-size: 4\nmin-translators: 2\nformat: JSON\nshow-score: true\n",
        )
        .unwrap();
        assert_eq!(
            config,
            AnalysisConfig {
                part: 1,
                min_pattern_size: 4,
                min_translators: 2,
                format: OutputFormat::Json,
                show_score: true,
            }
        );
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = AnalysisConfig::from_yaml("min-patern-size: 4\n");
        assert!(matches!(result, Err(OstinatoError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_unknown_format() {
        let err = AnalysisConfig::from_yaml("format: xml\n").unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: Unknown output format: xml");
    }

    #[test]
    fn test_rejects_part_zero() {
        let result = AnalysisConfig::from_yaml("part: 0\n");
        assert!(matches!(result, Err(OstinatoError::ConfigError(_))));
    }
}
