//! Settings configuration types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Severity;

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where the text report is written (relative to the project root)
    #[serde(default = "default_report")]
    pub report: PathBuf,

    /// Optional JSON copy of the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_report: Option<PathBuf>,

    /// Run analyzers concurrently; report order stays the configured order
    #[serde(default)]
    pub parallel: bool,

    /// Timeout for analyzers that do not set their own
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,

    #[serde(default)]
    pub artifacts: ArtifactSettings,

    #[serde(default)]
    pub fail_on: FailPolicy,
}

/// Where source artifacts are discovered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSettings {
    /// Directory below the project root holding the artifacts
    #[serde(default = "default_artifact_root")]
    pub root: PathBuf,

    /// Glob patterns relative to `root`
    #[serde(default = "default_artifact_include")]
    pub include: Vec<String>,
}

/// Which results fail the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailPolicy {
    /// Any finding with one of these severities fails the run
    #[serde(default = "default_fail_severities")]
    pub severities: Vec<Severity>,

    /// Any analyzer execution error fails the run
    #[serde(default = "default_fail_on_errors")]
    pub errors: bool,
}

fn default_report() -> PathBuf {
    PathBuf::from("security-report.txt")
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_artifact_root() -> PathBuf {
    PathBuf::from("contracts")
}

fn default_artifact_include() -> Vec<String> {
    vec!["**/*.sol".to_string()]
}

fn default_fail_severities() -> Vec<Severity> {
    vec![Severity::High, Severity::Medium]
}

fn default_fail_on_errors() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report: default_report(),
            json_report: None,
            parallel: false,
            default_timeout_secs: default_timeout_secs(),
            artifacts: ArtifactSettings::default(),
            fail_on: FailPolicy::default(),
        }
    }
}

impl Settings {
    /// JSON report destination; an empty path disables it
    pub fn json_report_path(&self) -> Option<&Path> {
        self.json_report
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl Default for ArtifactSettings {
    fn default() -> Self {
        Self {
            root: default_artifact_root(),
            include: default_artifact_include(),
        }
    }
}

impl Default for FailPolicy {
    fn default() -> Self {
        Self {
            severities: default_fail_severities(),
            errors: default_fail_on_errors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_defaults() {
        let s: Settings = toml::from_str("").unwrap();
        assert_eq!(s.report, PathBuf::from("security-report.txt"));
        assert_eq!(s.default_timeout_secs, 300);
        assert!(!s.parallel);
        assert_eq!(s.artifacts.root, PathBuf::from("contracts"));
        assert_eq!(s.fail_on.severities, vec![Severity::High, Severity::Medium]);
        assert!(s.fail_on.errors);
    }

    #[test]
    fn test_fail_policy_override() {
        let s: Settings = toml::from_str(
            r#"
            [fail_on]
            severities = ["high", "low"]
            errors = false
            "#,
        )
        .unwrap();
        assert_eq!(s.fail_on.severities, vec![Severity::High, Severity::Low]);
        assert!(!s.fail_on.errors);
    }

    #[test]
    fn test_empty_json_report_is_disabled() {
        let s: Settings = toml::from_str("json_report = \"\"").unwrap();
        assert!(s.json_report_path().is_none());
        let s: Settings = toml::from_str("json_report = \"out/report.json\"").unwrap();
        assert_eq!(s.json_report_path(), Some(Path::new("out/report.json")));
    }
}
