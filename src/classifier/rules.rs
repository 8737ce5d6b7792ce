//! Built-in severity rules
//!
//! Evaluated top to bottom; the first match wins. Specific detector names
//! and phrases come before the bare severity words so that, for example,
//! "unchecked low-level call" is High rather than Low.

use regex::Regex;

use crate::Severity;

/// How a rule recognizes a message
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Any of these lowercase substrings
    Phrase(Vec<String>),
    /// Regex evaluated against the lowercased message
    Pattern(Regex),
}

impl Matcher {
    pub fn phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Matcher::Phrase(
            phrases
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    /// Whole-word match of any of `words`
    pub fn words(words: &[&str]) -> Self {
        let pattern = format!(r"\b(?:{})\b", words.join("|"));
        // The word lists are static identifiers
        Matcher::Pattern(Regex::new(&pattern).unwrap())
    }

    /// `lowered` must already be lowercase
    pub fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::Phrase(phrases) => phrases.iter().any(|p| lowered.contains(p.as_str())),
            Matcher::Pattern(re) => re.is_match(lowered),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub severity: Severity,
    pub matcher: Matcher,
}

impl Rule {
    pub fn new(severity: Severity, matcher: Matcher) -> Self {
        Self { severity, matcher }
    }
}

const ERROR_PHRASES: &[&str] = &[
    "parsererror",
    "typeerror",
    "declarationerror",
    "syntaxerror",
    "compilation failed",
    "compiler error",
    "fatal error",
];

const HIGH_PHRASES: &[&str] = &[
    "unchecked-send",
    "unchecked call",
    "unchecked external call",
    "unchecked low-level",
    "unchecked-lowlevel",
    "unchecked transfer",
    "unchecked-transfer",
    "arbitrary-send",
    "arbitrary send",
    "controlled-delegatecall",
    "delegatecall",
    "suicidal",
    "selfdestruct",
    "unprotected",
    "unsafe serialization",
    "unsafe deserialization",
    "uninitialized storage",
    "uninitialized-storage",
];

const MEDIUM_PHRASES: &[&str] = &[
    "reentrancy",
    "reentrant",
    "re-entrancy",
    "tx.origin",
    "tx-origin",
    "block.timestamp",
    "timestamp",
    "divide-before-multiply",
    "incorrect-equality",
    "locked-ether",
];

const OPTIMIZATION_PHRASES: &[&str] = &[
    "gas-",
    "gc:",
    "gas",
    "constable-states",
    "immutable-states",
    "external-function",
    "cache-array-length",
    "optimization",
];

const LOW_PHRASES: &[&str] = &[
    "naming",
    "mixedcase",
    "camelcase",
    "style",
    "visibility",
    "explicit",
    "quotes",
    "indent",
    "max-line-length",
    "compiler-version",
    "pragma",
    "shadowing",
    "missing-zero-check",
    "unused",
];

/// The built-in table, in evaluation order
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule::new(Severity::Error, Matcher::phrases(ERROR_PHRASES)),
        Rule::new(Severity::High, Matcher::phrases(HIGH_PHRASES)),
        Rule::new(Severity::Medium, Matcher::phrases(MEDIUM_PHRASES)),
        Rule::new(Severity::Optimization, Matcher::phrases(OPTIMIZATION_PHRASES)),
        Rule::new(Severity::Low, Matcher::phrases(LOW_PHRASES)),
        Rule::new(Severity::High, Matcher::words(&["high"])),
        Rule::new(Severity::Medium, Matcher::words(&["medium"])),
        Rule::new(Severity::Low, Matcher::words(&["low"])),
        Rule::new(Severity::Optimization, Matcher::words(&["optimization"])),
        Rule::new(Severity::Error, Matcher::words(&["error"])),
        Rule::new(Severity::Low, Matcher::words(&["warning"])),
        Rule::new(Severity::Informational, Matcher::words(&["info", "informational"])),
    ]
}
