//! Configuration loading and management

mod analyzer;
mod classifier;
mod settings;

pub use analyzer::{AnalyzerConfig, LauncherConfig, NonZeroExit};
pub use classifier::{ClassifierConfig, RuleConfig};
pub use settings::{ArtifactSettings, FailPolicy, Settings};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::parser::ParserKind;

/// Config locations tried in order, relative to the project directory
pub const CONFIG_CANDIDATES: &[&str] = &[".auditpipe/config.toml", "auditpipe.toml"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configurations keyed by tool id
    #[serde(default)]
    pub analyzer: HashMap<String, AnalyzerConfig>,

    /// Extra severity rules
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// General settings
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for: .auditpipe/config.toml (preferred) or auditpipe.toml
    pub fn from_dir(dir: &Path) -> Result<Self> {
        match Self::find_in_dir(dir) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::with_defaults()),
        }
    }

    /// First existing config file in `dir`, if any
    pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
        CONFIG_CANDIDATES
            .iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.exists())
    }

    /// Create a config with the analyzers of a typical Solidity CI job
    pub fn with_defaults() -> Self {
        let mut config = Self::default();
        let npx_launcher = LauncherConfig {
            windows: vec!["cmd".to_string(), "/C".to_string()],
            unix: vec![],
        };

        let mut solhint = AnalyzerConfig::new("npx")
            .with_args(["solhint", "{root}/contracts/**/*.sol"])
            .with_structured_args(["-f", "json"])
            .with_parser(ParserKind::Solhint)
            .with_order(1);
        solhint.launcher = npx_launcher.clone();
        config.analyzer.insert("solhint".to_string(), solhint);

        config.analyzer.insert(
            "slither".to_string(),
            AnalyzerConfig::new("slither")
                .with_args(["{root}"])
                .with_structured_args(["--json", "-"])
                .with_parser(ParserKind::Slither)
                .with_order(2),
        );

        let mut hardhat = AnalyzerConfig::new("npx")
            .with_args(["hardhat", "compile"])
            .with_parser(ParserKind::Compiler)
            .with_nonzero_exit(NonZeroExit::Failure)
            .with_order(3);
        hardhat.launcher = npx_launcher;
        config.analyzer.insert("hardhat".to_string(), hardhat);

        config
    }

    /// Enabled analyzers in run order (`order`, then name)
    pub fn analyzers(&self) -> Vec<(&str, &AnalyzerConfig)> {
        let mut list: Vec<_> = self
            .analyzer
            .iter()
            .filter(|(_, cfg)| cfg.enabled)
            .map(|(name, cfg)| (name.as_str(), cfg))
            .collect();
        list.sort_by(|(a_name, a), (b_name, b)| {
            a.order
                .unwrap_or(u32::MAX)
                .cmp(&b.order.unwrap_or(u32::MAX))
                .then_with(|| a_name.cmp(b_name))
        });
        list
    }

    /// Effective timeout for an analyzer
    pub fn timeout_for(&self, analyzer: &AnalyzerConfig) -> Duration {
        Duration::from_secs(
            analyzer
                .timeout_secs
                .unwrap_or(self.settings.default_timeout_secs),
        )
    }

    /// Reject configs that can never run
    pub fn validate(&self) -> Result<()> {
        for (name, analyzer) in &self.analyzer {
            if name.trim().is_empty() {
                bail!("Analyzer with an empty name");
            }
            if analyzer.binary.trim().is_empty() {
                bail!("Analyzer '{}' has an empty binary", name);
            }
            if analyzer.timeout_secs == Some(0) {
                bail!("Analyzer '{}' has a zero timeout", name);
            }
        }
        for rule in &self.classifier.rules {
            if rule.contains.iter().all(|p| p.trim().is_empty()) {
                bail!("Classifier rule for '{}' has no phrases", rule.severity.as_str());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_run_in_ci_order() {
        let config = Config::with_defaults();
        let names: Vec<_> = config.analyzers().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["solhint", "slither", "hardhat"]);
        assert_eq!(
            config.analyzer["hardhat"].on_nonzero_exit,
            NonZeroExit::Failure
        );
    }

    #[test]
    fn test_analyzers_skip_disabled_and_sort_unordered_by_name() {
        let config: Config = toml::from_str(
            r#"
            [analyzer.zeta]
            binary = "zeta"

            [analyzer.alpha]
            binary = "alpha"

            [analyzer.first]
            binary = "first"
            order = 0

            [analyzer.off]
            binary = "off"
            enabled = false
            "#,
        )
        .unwrap();
        let names: Vec<_> = config.analyzers().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["first", "alpha", "zeta"]);
    }

    #[test]
    fn test_timeout_falls_back_to_default() {
        let mut config = Config::default();
        config.settings.default_timeout_secs = 42;
        let plain = AnalyzerConfig::new("x");
        let custom = AnalyzerConfig::new("x").with_timeout_secs(5);
        assert_eq!(config.timeout_for(&plain), Duration::from_secs(42));
        assert_eq!(config.timeout_for(&custom), Duration::from_secs(5));
    }

    #[test]
    fn test_from_dir_prefers_dot_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".auditpipe")).unwrap();
        std::fs::write(
            dir.path().join(".auditpipe/config.toml"),
            "[analyzer.a]\nbinary = \"a\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("auditpipe.toml"), "[analyzer.b]\nbinary = \"b\"\n").unwrap();

        let config = Config::from_dir(dir.path()).unwrap();
        assert!(config.analyzer.contains_key("a"));
        assert!(!config.analyzer.contains_key("b"));
    }

    #[test]
    fn test_from_dir_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_dir(dir.path()).unwrap();
        assert_eq!(config.analyzer.len(), 3);
    }

    #[test]
    fn test_validate_rejects_empty_binary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auditpipe.toml");
        std::fs::write(&path, "[analyzer.a]\nbinary = \"\"\n").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("empty binary"));
    }

    #[test]
    fn test_classifier_rules_parse() {
        let config: Config = toml::from_str(
            r#"
            [[classifier.rule]]
            severity = "high"
            contains = ["oracle manipulation"]
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.rules.len(), 1);
        assert_eq!(config.classifier.rules[0].severity, crate::Severity::High);
    }
}
