//! Compiler diagnostics (solc, hardhat, forge)
//!
//! ```text
//! Warning: Unused local variable.
//!   --> contracts/Foo.sol:10:5:
//!    |
//! 10 |         uint x = 1;
//!    |         ^^^^^^
//!
//! ParserError: Expected ';' but got '}'
//!  --> contracts/Foo.sol:12:1:
//! ```
//!
//! Each header becomes one finding; the `-->` line that follows it supplies
//! the artifact and line. Stray lines mentioning a warning are kept as
//! unresolved findings.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ParseContext;
use crate::Finding;

static DIAGNOSTIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:Warning|[A-Za-z]*Error)(?:\s+HH\d+)?:\s*\S").unwrap()
});

static POINTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-->\s*(?P<path>[^:]+):(?P<line>\d+)").unwrap());

static SNIPPET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:\d+\s*)?\|").unwrap());

pub fn parse_compiler_output(text: &str, ctx: &ParseContext<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    // Header waiting for its `-->` pointer
    let mut pending: Option<Finding> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || SNIPPET.is_match(raw) {
            continue;
        }

        if DIAGNOSTIC.is_match(line) {
            findings.extend(pending.take());
            pending = Some(Finding::unresolved(ctx.tool, line));
            continue;
        }

        if let Some(caps) = POINTER.captures(line) {
            if let Some(mut finding) = pending.take() {
                finding.artifact = ctx.artifacts.resolve(caps["path"].trim());
                finding.location = caps["line"].parse().ok();
                findings.push(finding);
            }
            continue;
        }

        if line.to_lowercase().contains("warning") {
            findings.extend(pending.take());
            findings.push(Finding::unresolved(ctx.tool, line));
        }
    }

    findings.extend(pending);
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArtifactSet, UNKNOWN_ARTIFACT};

    const HARDHAT: &str = "\
Warning: Unused local variable.
  --> contracts/Foo.sol:10:5:
   |
10 |         uint x = 1;
   |         ^^^^^^

ParserError: Expected ';' but got '}'
 --> contracts/Bar.sol:12:1:
   |
12 | }
   | ^

Error HH600: Compilation failed
";

    #[test]
    fn test_headers_take_pointer_locations() {
        let set = ArtifactSet::new("contracts", vec![]);
        let ctx = ParseContext::new("hardhat", &set);
        let findings = parse_compiler_output(HARDHAT, &ctx);

        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].message, "Warning: Unused local variable.");
        assert_eq!(findings[0].artifact, "Foo");
        assert_eq!(findings[0].location, Some(10));

        assert_eq!(findings[1].artifact, "Bar");
        assert_eq!(findings[1].location, Some(12));

        assert_eq!(findings[2].message, "Error HH600: Compilation failed");
        assert_eq!(findings[2].artifact, UNKNOWN_ARTIFACT);
    }

    #[test]
    fn test_clean_compile_has_no_findings() {
        let set = ArtifactSet::default();
        let ctx = ParseContext::new("hardhat", &set);
        assert!(parse_compiler_output("Compiled 4 Solidity files successfully (evm target: paris).\n", &ctx).is_empty());
        assert!(parse_compiler_output("Nothing to compile\n", &ctx).is_empty());
    }

    #[test]
    fn test_stray_warning_line() {
        let set = ArtifactSet::default();
        let ctx = ParseContext::new("hardhat", &set);
        let findings = parse_compiler_output(
            "Solidity 0.8.30 is not fully supported yet. You can still use Hardhat, but some features, like stack traces, might not work correctly. (warning)\n",
            &ctx,
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].artifact, UNKNOWN_ARTIFACT);
    }
}
