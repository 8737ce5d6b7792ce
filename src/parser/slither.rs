//! Slither JSON output (`slither <target> --json -`)

use serde::Deserialize;

use super::text::line_reference;
use super::{ParseContext, ParseError};
use crate::{Finding, UNKNOWN_ARTIFACT};

#[derive(Debug, Deserialize)]
struct SlitherOutput {
    #[serde(default = "default_success")]
    success: bool,
    error: Option<String>,
    results: Option<SlitherResults>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct SlitherResults {
    #[serde(default)]
    detectors: Vec<SlitherDetector>,
}

#[derive(Debug, Deserialize)]
struct SlitherDetector {
    check: Option<String>,
    #[serde(default)]
    description: String,
    first_markdown_element: Option<String>,
    #[serde(default)]
    elements: Vec<SlitherElement>,
}

#[derive(Debug, Deserialize)]
struct SlitherElement {
    source_mapping: Option<SourceMapping>,
}

#[derive(Debug, Deserialize)]
struct SourceMapping {
    filename_relative: Option<String>,
    filename_short: Option<String>,
    filename_absolute: Option<String>,
    #[serde(default)]
    lines: Vec<u32>,
}

impl SourceMapping {
    fn filename(&self) -> Option<&str> {
        self.filename_relative
            .as_deref()
            .or(self.filename_short.as_deref())
            .or(self.filename_absolute.as_deref())
    }
}

pub fn parse_slither(value: serde_json::Value, ctx: &ParseContext<'_>) -> Result<Vec<Finding>, ParseError> {
    if !value.is_object() {
        return Err(ParseError::Shape("expected a JSON object".to_string()));
    }
    let output: SlitherOutput = serde_json::from_value(value)?;

    if !output.success {
        let reason = output
            .error
            .unwrap_or_else(|| "slither reported success=false".to_string());
        return Err(ParseError::ToolFailure(reason));
    }

    let detectors = output.results.unwrap_or_default().detectors;
    let findings = detectors
        .into_iter()
        .map(|d| to_finding(d, ctx))
        .collect();
    Ok(findings)
}

fn to_finding(detector: SlitherDetector, ctx: &ParseContext<'_>) -> Finding {
    let (artifact, line) = locate(&detector, ctx);
    let mut finding = Finding::new(ctx.tool, artifact, &detector.description).with_location_opt(line);
    if let Some(check) = detector.check {
        finding = finding.with_rule(check);
    }
    finding
}

/// Artifact and line from the first mapped element, else the markdown anchor
fn locate(detector: &SlitherDetector, ctx: &ParseContext<'_>) -> (String, Option<u32>) {
    let mapped = detector
        .elements
        .iter()
        .filter_map(|e| e.source_mapping.as_ref())
        .find(|m| m.filename().is_some());
    if let Some(mapping) = mapped {
        let file = mapping.filename().unwrap_or_default();
        return (ctx.artifacts.resolve(file), mapping.lines.first().copied());
    }

    if let Some((path, line)) = detector
        .first_markdown_element
        .as_deref()
        .and_then(line_reference)
    {
        return (ctx.artifacts.resolve(path), line);
    }

    (UNKNOWN_ARTIFACT.to_string(), None)
}
