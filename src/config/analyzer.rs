//! Analyzer configuration types

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::parser::ParserKind;

/// How a non-zero exit status from the analyzer is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonZeroExit {
    /// Non-zero means "issues found"; only an empty result counts as an error
    #[default]
    Findings,
    /// Non-zero always counts as an execution error (findings are still kept)
    Failure,
}

/// Launcher prefixes per OS family, e.g. `windows = ["cmd", "/C"]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub windows: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unix: Vec<String>,
}

impl LauncherConfig {
    /// Prefix for the platform we are running on
    pub fn for_current_os(&self) -> &[String] {
        if cfg!(windows) { &self.windows } else { &self.unix }
    }
}

/// One external analyzer in TOML format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Binary name (looked up on PATH) or path
    pub binary: String,

    /// Arguments; `{root}` is replaced by the project directory and a lone
    /// `{artifacts}` argument expands to one argument per artifact path
    #[serde(default)]
    pub args: Vec<String>,

    /// Request machine-readable output and parse it before falling back to text
    #[serde(default)]
    pub structured: bool,

    /// Extra arguments appended when `structured = true` (e.g. `["-f", "json"]`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structured_args: Vec<String>,

    /// Per-analyzer timeout; falls back to `settings.default_timeout_secs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Output parser family; inferred from the analyzer name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<ParserKind>,

    #[serde(default)]
    pub on_nonzero_exit: NonZeroExit,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Position in the run; lower runs first, ties broken by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,

    #[serde(default)]
    pub launcher: LauncherConfig,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Working directory relative to the project root (defaults to the root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

fn default_enabled() -> bool {
    true
}

impl AnalyzerConfig {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            args: Vec::new(),
            structured: false,
            structured_args: Vec::new(),
            timeout_secs: None,
            parser: None,
            on_nonzero_exit: NonZeroExit::default(),
            enabled: true,
            order: None,
            launcher: LauncherConfig::default(),
            env: HashMap::new(),
            working_dir: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_structured_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.structured = true;
        self.structured_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_nonzero_exit(mut self, policy: NonZeroExit) -> Self {
        self.on_nonzero_exit = policy;
        self
    }

    /// Parser family, inferring from the analyzer name when not configured
    pub fn parser_kind(&self, name: &str) -> ParserKind {
        self.parser
            .unwrap_or_else(|| ParserKind::infer(name, &self.binary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let cfg: AnalyzerConfig = toml::from_str(r#"binary = "slither""#).unwrap();
        assert!(cfg.enabled);
        assert!(!cfg.structured);
        assert_eq!(cfg.on_nonzero_exit, NonZeroExit::Findings);
        assert_eq!(cfg.parser_kind("slither"), ParserKind::Slither);
        assert_eq!(cfg.parser_kind("custom"), ParserKind::Slither);
    }

    #[test]
    fn test_full_toml() {
        let cfg: AnalyzerConfig = toml::from_str(
            r#"
            binary = "npx"
            args = ["solhint", "{artifacts}"]
            structured = true
            structured_args = ["-f", "json"]
            timeout_secs = 60
            parser = "solhint"
            on_nonzero_exit = "failure"
            order = 1

            [launcher]
            windows = ["cmd", "/C"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.args, vec!["solhint", "{artifacts}"]);
        assert_eq!(cfg.structured_args, vec!["-f", "json"]);
        assert_eq!(cfg.timeout_secs, Some(60));
        assert_eq!(cfg.parser, Some(ParserKind::Solhint));
        assert_eq!(cfg.on_nonzero_exit, NonZeroExit::Failure);
        assert_eq!(cfg.launcher.windows, vec!["cmd", "/C"]);
        assert!(cfg.launcher.unix.is_empty());
    }
}
