//! User-supplied classifier rules

use serde::{Deserialize, Serialize};

use crate::Severity;

/// `[[classifier.rule]]` entries, evaluated before the built-in rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default, rename = "rule", skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

/// A phrase rule: any of `contains` (case-insensitive) assigns `severity`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub severity: Severity,
    pub contains: Vec<String>,
}
