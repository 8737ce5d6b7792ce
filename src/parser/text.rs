//! Line-oriented text scanning
//!
//! Recognized, in priority order:
//! - eslint "stylish" blocks (a bare path line, then `  12:5  warning  msg  rule`)
//! - `path#L<line>` / `path#<line>-<end>` references (slither, solhint)
//! - `path:<line>[:<col>]` references
//! - any other line carrying a severity keyword; its artifact is resolved
//!   from a bare path when one is present, otherwise it is `unknown`

use once_cell::sync::Lazy;
use regex::Regex;

use super::ParseContext;
use crate::{Finding, UNKNOWN_ARTIFACT};

static HASH_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?P<path>[^\s()'"`#,;]+\.[A-Za-z][A-Za-z0-9]*)#L?(?P<line>\d+)"#).unwrap()
});

static COLON_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?P<path>[^\s()'"`#,;:]+\.[A-Za-z][A-Za-z0-9]*):(?P<line>\d+)"#).unwrap()
});

static BARE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?P<path>[^\s()'"`#,;:]*/[^\s()'"`#,;:]*\.[A-Za-z][A-Za-z0-9]*)"#).unwrap()
});

static STYLISH_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?P<path>[^\s:]+\.[A-Za-z][A-Za-z0-9]*)\s*$"#).unwrap()
});

static STYLISH_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s+(?P<line>\d+):\d+\s+(?:error|warning|warn|info)\s+(?P<msg>\S.*?)\s*$"#)
        .unwrap()
});

static KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(high|medium|low|warning|warn|error|info|informational|optimization)\b|GC:"#)
        .unwrap()
});

/// Status lines that mention keywords without describing an issue
static NOISE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^\s*info:[a-z]+:\s*$",
        r"(?i)^\s*info:slither:",
        r"(?i)^\s*reference:\s*https?://",
        r"(?i)^\W*\d+\s+problems?\b",
        r"^\s*[-=]{3,}\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Scan free text for findings
pub fn parse_text(text: &str, ctx: &ParseContext<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut current_file: Option<String> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            current_file = None;
            continue;
        }
        if is_noise(line) {
            continue;
        }

        if let Some(file) = &current_file {
            if let Some(caps) = STYLISH_ENTRY.captures(raw) {
                let finding = Finding::new(ctx.tool, ctx.artifacts.resolve(file), &caps["msg"])
                    .with_location_opt(caps["line"].parse().ok());
                findings.push(finding);
                continue;
            }
        }
        if let Some(caps) = STYLISH_FILE.captures(raw) {
            current_file = Some(caps["path"].to_string());
            continue;
        }

        if let Some(finding) = parse_line(line, ctx) {
            findings.push(finding);
        }
    }

    findings
}

/// Turn one trimmed line into a finding, if it describes one
pub(crate) fn parse_line(line: &str, ctx: &ParseContext<'_>) -> Option<Finding> {
    if let Some((path, line_no)) = line_reference(line) {
        return Some(
            Finding::new(ctx.tool, ctx.artifacts.resolve(path), line)
                .with_location_opt(line_no),
        );
    }

    if KEYWORD.is_match(line) {
        let artifact = BARE_PATH
            .captures(line)
            .map(|caps| ctx.artifacts.resolve(&caps["path"]))
            .unwrap_or_else(|| UNKNOWN_ARTIFACT.to_string());
        return Some(Finding::new(ctx.tool, artifact, line));
    }

    None
}

/// First `path#L<n>` or `path:<n>` reference in `line`
pub(crate) fn line_reference(line: &str) -> Option<(&str, Option<u32>)> {
    HASH_REF
        .captures(line)
        .or_else(|| COLON_REF.captures(line))
        .map(|caps| {
            let path = caps.name("path").map(|m| m.as_str()).unwrap_or_default();
            let line_no = caps.name("line").and_then(|m| m.as_str().parse().ok());
            (path, line_no)
        })
}

fn is_noise(line: &str) -> bool {
    NOISE.iter().any(|re| re.is_match(line))
}
