//! SARIF (Static Analysis Results Interchange Format) output
//!
//! Emitted by semgrep (`--sarif`), CodeQL, and most general-purpose scanners.
//! Only the parts needed to place a finding are read: rule id, message, and
//! the first physical location.

use std::collections::HashMap;

use serde::Deserialize;

use super::{ParseContext, ParseError};
use crate::{Finding, UNKNOWN_ARTIFACT};

#[derive(Debug, Deserialize)]
struct Sarif {
    runs: Vec<SarifRun>,
}

#[derive(Debug, Deserialize)]
struct SarifRun {
    tool: Option<SarifTool>,
    results: Option<Vec<SarifResultItem>>,
}

#[derive(Debug, Deserialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Deserialize)]
struct SarifDriver {
    rules: Option<Vec<SarifRule>>,
}

#[derive(Debug, Deserialize)]
struct SarifRule {
    id: String,
    #[serde(rename = "shortDescription")]
    short_description: Option<SarifMessage>,
}

#[derive(Debug, Deserialize)]
struct SarifMessage {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SarifResultItem {
    #[serde(rename = "ruleId")]
    rule_id: Option<String>,
    message: Option<SarifMessage>,
    locations: Option<Vec<SarifLocation>>,
}

#[derive(Debug, Deserialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: Option<SarifPhysicalLocation>,
}

#[derive(Debug, Deserialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: Option<SarifArtifactLocation>,
    region: Option<SarifRegion>,
}

#[derive(Debug, Deserialize)]
struct SarifArtifactLocation {
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: Option<u32>,
}

pub fn parse_sarif(value: serde_json::Value, ctx: &ParseContext<'_>) -> Result<Vec<Finding>, ParseError> {
    if value.get("runs").is_none() {
        return Err(ParseError::Shape("missing `runs`".to_string()));
    }
    let sarif: Sarif = serde_json::from_value(value)?;

    let mut findings = Vec::new();
    for run in &sarif.runs {
        // Build rule lookup
        let rules: HashMap<&str, &SarifRule> = run
            .tool
            .as_ref()
            .and_then(|t| t.driver.rules.as_ref())
            .map(|rules| rules.iter().map(|r| (r.id.as_str(), r)).collect())
            .unwrap_or_default();

        let Some(results) = &run.results else {
            continue;
        };

        for item in results {
            let message = item
                .message
                .as_ref()
                .and_then(|m| m.text.clone())
                .or_else(|| {
                    let rule = rules.get(item.rule_id.as_deref()?)?;
                    rule.short_description.as_ref()?.text.clone()
                })
                .or_else(|| item.rule_id.clone())
                .unwrap_or_default();

            let physical = item
                .locations
                .as_ref()
                .and_then(|locs| locs.iter().find_map(|l| l.physical_location.as_ref()));
            let artifact = physical
                .and_then(|p| p.artifact_location.as_ref())
                .and_then(|a| a.uri.as_deref())
                .map(|uri| ctx.artifacts.resolve(uri.trim_start_matches("file://")))
                .unwrap_or_else(|| UNKNOWN_ARTIFACT.to_string());
            let line = physical
                .and_then(|p| p.region.as_ref())
                .and_then(|r| r.start_line);

            let mut finding = Finding::new(ctx.tool, artifact, message).with_location_opt(line);
            if let Some(rule_id) = &item.rule_id {
                finding = finding.with_rule(rule_id.clone());
            }
            findings.push(finding);
        }
    }

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArtifactSet;

    const SARIF: &str = r#"{
        "version": "2.1.0",
        "runs": [{
            "tool": {"driver": {"name": "semgrep", "rules": [
                {"id": "solidity.security.unchecked-call", "shortDescription": {"text": "Unchecked low-level call"}}
            ]}},
            "results": [
                {
                    "ruleId": "solidity.security.unchecked-call",
                    "level": "warning",
                    "message": {"text": "Return value of call() is not checked"},
                    "locations": [{"physicalLocation": {
                        "artifactLocation": {"uri": "contracts/Vault.sol"},
                        "region": {"startLine": 33, "startColumn": 9}
                    }}]
                },
                {
                    "ruleId": "solidity.security.unchecked-call",
                    "message": {},
                    "locations": []
                }
            ]
        }]
    }"#;

    #[test]
    fn test_results_become_findings() {
        let set = ArtifactSet::new("contracts", vec![]);
        let ctx = ParseContext::new("semgrep", &set);
        let findings = parse_sarif(serde_json::from_str(SARIF).unwrap(), &ctx).unwrap();

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].artifact, "Vault");
        assert_eq!(findings[0].location, Some(33));
        assert_eq!(findings[0].message, "Return value of call() is not checked");

        // message falls back to the rule description
        assert_eq!(findings[1].message, "Unchecked low-level call");
        assert_eq!(findings[1].artifact, UNKNOWN_ARTIFACT);
        assert_eq!(findings[1].location, None);
    }

    #[test]
    fn test_missing_runs_is_rejected() {
        let set = ArtifactSet::default();
        let ctx = ParseContext::new("semgrep", &set);
        assert!(matches!(
            parse_sarif(serde_json::json!([]), &ctx),
            Err(ParseError::Shape(_))
        ));
    }
}
