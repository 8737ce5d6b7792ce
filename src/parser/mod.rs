//! Analyzer output parsing.
//!
//! Each analyzer family has a parsing strategy. Two policies are tried in
//! order:
//!
//! 1. **Structured** - when the analyzer was asked for machine-readable output
//!    (`structured = true`) and the family understands one (solhint JSON,
//!    slither JSON, SARIF), the payload is parsed field by field.
//! 2. **Text** - otherwise, or when the structured payload is missing or
//!    broken, stdout and stderr are scanned line by line for path/line
//!    references and severity keywords.
//!
//! Parsers never panic on malformed input. When the structured policy was
//! attempted, failed, and the text scan recovered nothing from non-empty
//! output, the result is [`ParseOutcome::Unparseable`]. A payload in which
//! the analyzer itself reports failure is [`ParseOutcome::ToolFailure`] and
//! is never text-scanned, nor is any stream that holds one whole JSON
//! document.

mod compiler;
mod sarif;
mod slither;
mod solhint;
mod text;

pub use compiler::parse_compiler_output;
pub use sarif::parse_sarif;
pub use slither::parse_slither;
pub use solhint::parse_solhint;
pub use text::parse_text;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AnalyzerRun, ArtifactSet, Finding};

/// Output parser family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    Solhint,
    Slither,
    Sarif,
    Compiler,
    Text,
}

impl ParserKind {
    /// Guess the family from the analyzer name, then from its binary
    pub fn infer(name: &str, binary: &str) -> Self {
        Self::from_hint(name)
            .or_else(|| Self::from_hint(binary))
            .unwrap_or(ParserKind::Text)
    }

    fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.to_lowercase();
        if hint.contains("solhint") {
            Some(ParserKind::Solhint)
        } else if hint.contains("slither") {
            Some(ParserKind::Slither)
        } else if hint.contains("sarif") || hint.contains("semgrep") || hint.contains("codeql") {
            Some(ParserKind::Sarif)
        } else if hint.contains("hardhat")
            || hint.contains("solc")
            || hint.contains("compile")
            || hint.contains("forge")
        {
            Some(ParserKind::Compiler)
        } else {
            None
        }
    }

    /// Whether this family has a machine-readable format
    pub fn supports_structured(&self) -> bool {
        matches!(
            self,
            ParserKind::Solhint | ParserKind::Slither | ParserKind::Sarif
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParserKind::Solhint => "solhint",
            ParserKind::Slither => "slither",
            ParserKind::Sarif => "sarif",
            ParserKind::Compiler => "compiler",
            ParserKind::Text => "text",
        }
    }
}

/// Which policy produced the findings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsePolicy {
    Structured,
    Text,
}

/// Result of parsing one analyzer run
#[derive(Debug)]
pub enum ParseOutcome {
    Parsed {
        findings: Vec<Finding>,
        policy: ParsePolicy,
    },
    Unparseable {
        reason: String,
    },
    /// The structured payload says the analyzer did not complete
    ToolFailure {
        reason: String,
    },
}

impl ParseOutcome {
    pub fn findings(&self) -> &[Finding] {
        match self {
            ParseOutcome::Parsed { findings, .. } => findings,
            ParseOutcome::Unparseable { .. } | ParseOutcome::ToolFailure { .. } => &[],
        }
    }

    pub fn into_findings(self) -> Vec<Finding> {
        match self {
            ParseOutcome::Parsed { findings, .. } => findings,
            ParseOutcome::Unparseable { .. } | ParseOutcome::ToolFailure { .. } => Vec::new(),
        }
    }

    /// Rewrite every parsed finding, e.g. to assign severities
    pub fn map_findings(self, f: impl FnMut(Finding) -> Finding) -> Self {
        match self {
            ParseOutcome::Parsed { findings, policy } => ParseOutcome::Parsed {
                findings: findings.into_iter().map(f).collect(),
                policy,
            },
            other => other,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, ParseOutcome::Unparseable { .. })
    }
}

/// Error from a structured parsing attempt
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no structured payload in output")]
    NoPayload,

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected payload shape: {0}")]
    Shape(String),

    #[error("analyzer reported failure: {0}")]
    ToolFailure(String),
}

/// Inputs shared by every parser
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// Analyzer id stamped on every finding
    pub tool: &'a str,

    /// Discovered artifacts, used to resolve reported paths
    pub artifacts: &'a ArtifactSet,
}

impl<'a> ParseContext<'a> {
    pub fn new(tool: &'a str, artifacts: &'a ArtifactSet) -> Self {
        Self { tool, artifacts }
    }
}

/// Parse one run with the family's policies
pub fn parse_run(
    kind: ParserKind,
    run: &AnalyzerRun,
    structured: bool,
    ctx: &ParseContext<'_>,
) -> ParseOutcome {
    let mut structured_failure = None;

    if structured && kind.supports_structured() {
        match parse_structured(kind, run, ctx) {
            Ok(findings) => {
                debug!(tool = ctx.tool, count = findings.len(), "Parsed structured output");
                return ParseOutcome::Parsed {
                    findings,
                    policy: ParsePolicy::Structured,
                };
            }
            Err(ParseError::ToolFailure(reason)) => {
                debug!(tool = ctx.tool, "Analyzer reported failure: {}", reason);
                return ParseOutcome::ToolFailure { reason };
            }
            Err(e) => {
                debug!(tool = ctx.tool, "Structured parse failed, falling back to text: {}", e);
                structured_failure = Some(e.to_string());
            }
        }
    }

    let mut findings = Vec::new();
    for stream in [&run.stdout, &run.stderr] {
        // A JSON document is either structured output or nothing
        if is_json_document(stream) {
            continue;
        }
        let found = match kind {
            ParserKind::Compiler => parse_compiler_output(stream, ctx),
            _ => parse_text(stream, ctx),
        };
        findings.extend(found);
    }

    if findings.is_empty() && !run.is_silent() {
        if let Some(reason) = structured_failure {
            return ParseOutcome::Unparseable { reason };
        }
    }

    ParseOutcome::Parsed {
        findings,
        policy: ParsePolicy::Text,
    }
}

fn parse_structured(
    kind: ParserKind,
    run: &AnalyzerRun,
    ctx: &ParseContext<'_>,
) -> Result<Vec<Finding>, ParseError> {
    let payload = if run.stdout.trim().is_empty() {
        &run.stderr
    } else {
        &run.stdout
    };
    let value = extract_json(payload)?;
    match kind {
        ParserKind::Solhint => parse_solhint(value, ctx),
        ParserKind::Slither => parse_slither(value, ctx),
        ParserKind::Sarif => parse_sarif(value, ctx),
        ParserKind::Compiler | ParserKind::Text => Err(ParseError::NoPayload),
    }
}

fn is_json_document(text: &str) -> bool {
    let trimmed = text.trim();
    (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde::de::IgnoredAny>(trimmed).is_ok()
}

/// First JSON document in `text`, skipping any banner lines before it
pub(crate) fn extract_json(text: &str) -> Result<serde_json::Value, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::NoPayload);
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    let start = trimmed
        .find(|c| c == '{' || c == '[')
        .ok_or(ParseError::NoPayload)?;
    let mut stream =
        serde_json::Deserializer::from_str(&trimmed[start..]).into_iter::<serde_json::Value>();
    match stream.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(ParseError::Json(e)),
        None => Err(ParseError::NoPayload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_parser_kind() {
        assert_eq!(ParserKind::infer("solhint", "npx"), ParserKind::Solhint);
        assert_eq!(ParserKind::infer("sec", "slither"), ParserKind::Slither);
        assert_eq!(ParserKind::infer("hardhat", "npx"), ParserKind::Compiler);
        assert_eq!(ParserKind::infer("semgrep", "semgrep"), ParserKind::Sarif);
        assert_eq!(ParserKind::infer("mythril", "myth"), ParserKind::Text);
    }

    #[test]
    fn test_extract_json_skips_banner() {
        let value = extract_json("npm WARN something\n[{\"a\": 1}]\ntrailing").unwrap();
        assert_eq!(value[0]["a"], 1);
        assert!(matches!(extract_json("   "), Err(ParseError::NoPayload)));
        assert!(matches!(extract_json("no json here"), Err(ParseError::NoPayload)));
        assert!(matches!(extract_json("oops {broken"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_structured_failure_falls_back_to_text() {
        let artifacts = ArtifactSet::new("contracts", vec![]);
        let ctx = ParseContext::new("slither", &artifacts);
        let run = AnalyzerRun::completed(
            "slither",
            1,
            "",
            "Reentrancy in Bank.withdraw() (contracts/Bank.sol#20-31):",
        );
        match parse_run(ParserKind::Slither, &run, true, &ctx) {
            ParseOutcome::Parsed { findings, policy } => {
                assert_eq!(policy, ParsePolicy::Text);
                assert_eq!(findings.len(), 1);
                assert_eq!(findings[0].artifact, "Bank");
                assert_eq!(findings[0].location, Some(20));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_slither_failure_payload_is_not_text_scanned() {
        let artifacts = ArtifactSet::default();
        let ctx = ParseContext::new("slither", &artifacts);
        let run = AnalyzerRun::completed(
            "slither",
            1,
            r#"{"success": false, "error": "Invalid compilation: solc not found", "results": {}}"#,
            "",
        );
        match parse_run(ParserKind::Slither, &run, true, &ctx) {
            ParseOutcome::ToolFailure { reason } => {
                assert_eq!(reason, "Invalid compilation: solc not found")
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_misshapen_json_is_unparseable() {
        let artifacts = ArtifactSet::default();
        let ctx = ParseContext::new("solhint", &artifacts);
        let run = AnalyzerRun::completed("solhint", 1, r#"{"error": "config not found"}"#, "");
        let outcome = parse_run(ParserKind::Solhint, &run, true, &ctx);
        assert!(outcome.is_unparseable());
    }

    #[test]
    fn test_garbage_output_is_unparseable_when_structured() {
        let artifacts = ArtifactSet::default();
        let ctx = ParseContext::new("solhint", &artifacts);
        let run = AnalyzerRun::completed("solhint", 2, "segmentation fault (core dumped)", "");
        let outcome = parse_run(ParserKind::Solhint, &run, true, &ctx);
        assert!(outcome.is_unparseable());
        assert!(outcome.findings().is_empty());
    }

    #[test]
    fn test_silent_run_is_not_unparseable() {
        let artifacts = ArtifactSet::default();
        let ctx = ParseContext::new("slither", &artifacts);
        let run = AnalyzerRun::completed("slither", 0, "", "");
        let outcome = parse_run(ParserKind::Slither, &run, true, &ctx);
        assert!(!outcome.is_unparseable());
        assert!(outcome.findings().is_empty());
    }

    #[test]
    fn test_text_only_chatter_yields_nothing() {
        let artifacts = ArtifactSet::default();
        let ctx = ParseContext::new("tool", &artifacts);
        let run = AnalyzerRun::completed("tool", 0, "Compiled 3 Solidity files successfully\n", "");
        let outcome = parse_run(ParserKind::Text, &run, false, &ctx);
        assert!(!outcome.is_unparseable());
        assert!(outcome.findings().is_empty());
    }
}
