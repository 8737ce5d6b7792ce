//! Severity classification of finding messages
//!
//! Classification is a pure function of the message text: rules are tried in
//! order, case-insensitively, and the first match decides. Messages matching
//! nothing are [`Severity::Informational`].

mod rules;

pub use rules::{builtin_rules, Matcher, Rule};

use once_cell::sync::Lazy;

use crate::config::{ClassifierConfig, RuleConfig};
use crate::{Finding, Severity};

static DEFAULT: Lazy<Classifier> = Lazy::new(Classifier::default);

/// Classify with the built-in rules only
pub fn classify(message: &str) -> Severity {
    DEFAULT.classify(message)
}

/// Ordered severity rules
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(builtin_rules())
    }
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Built-in rules preceded by the configured ones
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::default().with_rules(&config.rules)
    }

    /// Put `extra` ahead of the current rules, keeping their relative order
    pub fn with_rules(mut self, extra: &[RuleConfig]) -> Self {
        let mut rules: Vec<Rule> = extra
            .iter()
            .map(|r| Rule::new(r.severity, Matcher::phrases(&r.contains)))
            .collect();
        rules.append(&mut self.rules);
        self.rules = rules;
        self
    }

    pub fn classify(&self, message: &str) -> Severity {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&lowered))
            .map(|rule| rule.severity)
            .unwrap_or_default()
    }

    /// Set the finding's severity from its message
    pub fn apply(&self, finding: Finding) -> Finding {
        let severity = self.classify(&finding.message);
        finding.with_severity(severity)
    }
}
