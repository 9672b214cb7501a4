//! Discovery configuration.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{DiscoveryError, Result};
use crate::core::filter::PatternConfig;

/// Marker modules matched when no list is configured.
pub const DEFAULT_MARKERS: &[&str] = &["@builder.io/qwik", "@builder.io/qwik-react"];

/// What discovery does with a file whose syntax tree contains errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseFailurePolicy {
    /// Abort the whole discovery with a parse error.
    #[default]
    Fail,
    /// Log a warning, record the file as skipped and continue.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub include: Option<PatternConfig>,
    pub exclude: Option<PatternConfig>,
    pub markers: Vec<String>,
    pub on_parse_error: ParseFailurePolicy,
    /// Sort the final entrypoint list instead of keeping discovery order.
    pub sort: bool,
    /// Directory that relative include/exclude globs are anchored at.
    pub base_dir: Option<PathBuf>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include: None,
            exclude: None,
            markers: DEFAULT_MARKERS.iter().map(|m| m.to_string()).collect(),
            on_parse_error: ParseFailurePolicy::default(),
            sort: false,
            base_dir: None,
        }
    }
}

impl DiscoveryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| DiscoveryError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| DiscoveryError::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn with_include(mut self, include: PatternConfig) -> Self {
        self.include = Some(include);
        self
    }

    pub fn with_exclude(mut self, exclude: PatternConfig) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parse_failure_policy(mut self, policy: ParseFailurePolicy) -> Self {
        self.on_parse_error = policy;
        self
    }

    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.markers.is_empty() {
            return Err(DiscoveryError::Config {
                message: "at least one marker module is required".to_string(),
            });
        }
        if let Some(blank) = self.markers.iter().find(|m| m.trim().is_empty()) {
            return Err(DiscoveryError::Config {
                message: format!("marker module name cannot be blank: {blank:?}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_builtin_markers() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.markers, vec!["@builder.io/qwik", "@builder.io/qwik-react"]);
        assert_eq!(config.on_parse_error, ParseFailurePolicy::Fail);
        assert!(config.include.is_none());
        assert!(!config.sort);
    }

    #[test]
    fn json_config_accepts_null_patterns() {
        let config = DiscoveryConfig::from_json_str(
            r#"{
                "include": null,
                "exclude": ["**/*.test.ts", {"regex": "stories"}],
                "on_parse_error": "skip",
                "sort": true
            }"#,
        )
        .unwrap();

        assert!(config.include.is_none());
        assert_eq!(config.exclude.unwrap().patterns.len(), 2);
        assert_eq!(config.on_parse_error, ParseFailurePolicy::Skip);
        assert!(config.sort);
        assert_eq!(config.markers.len(), 2);
    }

    #[test]
    fn unknown_fields_and_empty_markers_are_rejected() {
        assert!(DiscoveryConfig::from_json_str(r#"{"incude": "*.ts"}"#).is_err());
        assert!(DiscoveryConfig::from_json_str(r#"{"markers": []}"#).is_err());
        assert!(DiscoveryConfig::from_json_str(r#"{"markers": ["  "]}"#).is_err());
    }
}
