//! Solhint JSON output (`solhint -f json`)
//!
//! Two shapes are accepted: the flat message list solhint prints
//! (`[{ "line", "column", "severity", "message", "ruleId", "filePath" }, ...,
//! { "conclusion": "..." }]`) and eslint-style per-file reports
//! (`[{ "filePath", "messages": [...] }]`).

use serde::Deserialize;
use tracing::debug;

use super::{ParseContext, ParseError};
use crate::{Finding, UNKNOWN_ARTIFACT};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SolhintEntry {
    Report {
        #[serde(rename = "filePath")]
        file_path: String,
        messages: Vec<SolhintMessage>,
    },
    Message(SolhintMessage),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct SolhintMessage {
    message: String,
    line: Option<u32>,
    #[serde(rename = "ruleId")]
    rule_id: Option<String>,
    #[serde(rename = "filePath")]
    file_path: Option<String>,
}

pub fn parse_solhint(value: serde_json::Value, ctx: &ParseContext<'_>) -> Result<Vec<Finding>, ParseError> {
    if !value.is_array() {
        return Err(ParseError::Shape("expected a JSON array".to_string()));
    }
    let entries: Vec<SolhintEntry> = serde_json::from_value(value)?;

    let mut findings = Vec::new();
    for entry in entries {
        match entry {
            SolhintEntry::Report {
                file_path,
                messages,
            } => {
                for msg in messages {
                    findings.push(to_finding(msg, Some(&file_path), ctx));
                }
            }
            SolhintEntry::Message(msg) => {
                let path = msg.file_path.clone();
                findings.push(to_finding(msg, path.as_deref(), ctx));
            }
            // `{ "conclusion": ... }` and other summaries
            SolhintEntry::Other(value) => debug!(tool = ctx.tool, %value, "Skipping non-message entry"),
        }
    }
    Ok(findings)
}

fn to_finding(msg: SolhintMessage, file: Option<&str>, ctx: &ParseContext<'_>) -> Finding {
    let artifact = file
        .map(|f| ctx.artifacts.resolve(f))
        .unwrap_or_else(|| UNKNOWN_ARTIFACT.to_string());
    let mut finding = Finding::new(ctx.tool, artifact, &msg.message).with_location_opt(msg.line);
    if let Some(rule) = msg.rule_id {
        finding = finding.with_rule(rule);
    }
    finding
}
