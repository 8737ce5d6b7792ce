//! Finding model - one normalized issue reported by one analyzer

use serde::{Deserialize, Serialize};

use super::Severity;

/// Artifact name used when an analyzer line carries no resolvable path
pub const UNKNOWN_ARTIFACT: &str = "unknown";

/// A single issue reported by one analyzer about one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Analyzer identifier (the config key, e.g. "slither")
    pub tool: String,

    /// Logical artifact name, or [`UNKNOWN_ARTIFACT`]
    pub artifact: String,

    /// Line within the artifact, when the analyzer reported one
    pub location: Option<u32>,

    /// The analyzer's own description text, trimmed but otherwise verbatim
    pub message: String,

    /// Assigned by the classifier after parsing
    #[serde(default)]
    pub severity: Severity,

    /// Rule or detector id when the analyzer's structured output has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

/// Identity of a finding occurrence; two findings with equal keys are duplicates
pub type FindingKey = (String, String, Option<u32>, String);

impl Finding {
    pub fn new(tool: impl Into<String>, artifact: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            tool: tool.into(),
            artifact: artifact.into(),
            location: None,
            message: message.as_ref().trim().to_string(),
            severity: Severity::default(),
            rule: None,
        }
    }

    /// Finding whose artifact could not be resolved
    pub fn unresolved(tool: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self::new(tool, UNKNOWN_ARTIFACT, message)
    }

    pub fn with_location(mut self, line: u32) -> Self {
        self.location = Some(line);
        self
    }

    pub fn with_location_opt(mut self, line: Option<u32>) -> Self {
        self.location = line;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        let rule = rule.into();
        if !rule.trim().is_empty() {
            self.rule = Some(rule);
        }
        self
    }

    /// Tool and message must both carry text for the finding to be kept
    pub fn is_valid(&self) -> bool {
        !self.tool.trim().is_empty() && !self.message.trim().is_empty()
    }

    pub fn key(&self) -> FindingKey {
        (
            self.tool.clone(),
            self.artifact.clone(),
            self.location,
            self.message.clone(),
        )
    }

    /// Line reference as printed in reports
    pub fn location_label(&self) -> String {
        match self.location {
            Some(line) => line.to_string(),
            None => "N/A".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_message() {
        let f = Finding::new("solhint", "Foo", "   Avoid tx.origin  \n");
        assert_eq!(f.message, "Avoid tx.origin");
        assert_eq!(f.severity, Severity::Informational);
        assert!(f.is_valid());
    }

    #[test]
    fn test_blank_message_is_invalid() {
        assert!(!Finding::unresolved("slither", "   ").is_valid());
        assert!(!Finding::new("", "Foo", "msg").is_valid());
    }

    #[test]
    fn test_key_ignores_severity_and_rule() {
        let a = Finding::new("a", "Foo", "m").with_location(3);
        let b = a.clone().with_severity(Severity::High).with_rule("x");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_location_label() {
        assert_eq!(Finding::unresolved("a", "m").location_label(), "N/A");
        assert_eq!(Finding::unresolved("a", "m").with_location(7).location_label(), "7");
    }
}
