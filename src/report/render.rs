//! Plain-text report format

use std::fmt::Write;

use chrono::SecondsFormat;
use once_cell::sync::Lazy;
use regex::Regex;

use super::Report;
use crate::Severity;

pub const REPORT_TITLE: &str = "SECURITY ANALYSIS REPORT";

static ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\. \[[^\]]*\] ").unwrap());

/// Render the persisted report
///
/// Identical reports render to identical bytes: findings keep aggregation
/// order and the breakdown always lists every severity.
pub fn render_text(report: &Report) -> String {
    let state = &report.state;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "{}", REPORT_TITLE);
    let _ = writeln!(
        out,
        "Generated: {}",
        report.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "Total Artifacts: {}", report.artifact_count);
    let _ = writeln!(out, "Total Warnings Found: {}", state.total_findings());
    let _ = writeln!(out, "Total Errors Found: {}", state.total_errors);
    let breakdown: Vec<String> = Severity::ALL
        .iter()
        .map(|s| format!("{}={}", s.label(), state.count(*s)))
        .collect();
    let _ = writeln!(out, "Severity Breakdown: {}", breakdown.join(" "));
    out.push('\n');

    for (i, finding) in state.findings.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [{}] {}: {} (Line {})",
            i + 1,
            finding.artifact,
            finding.tool,
            finding.message,
            finding.location_label()
        );
        let _ = writeln!(out, "   Severity: {}", finding.severity.label());
    }

    if !state.errors.is_empty() {
        out.push('\n');
        out.push_str("Analyzer Errors:\n");
        for error in &state.errors {
            let _ = writeln!(out, "- {}: {}", error.tool, error.reason);
        }
    }

    out
}

/// Number of finding entries in a rendered report
pub fn count_entries(text: &str) -> usize {
    text.lines().filter(|line| ENTRY.is_match(line)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::config::FailPolicy;
    use crate::Finding;
    use chrono::DateTime;

    fn sample() -> Report {
        let mut agg = Aggregator::new();
        agg.add(
            Finding::new("A", "Foo", "contracts/Foo.sol#L42: reentrancy risk")
                .with_location(42)
                .with_severity(Severity::Medium),
        );
        agg.add(Finding::new("B", "unknown", "Number of low issues: 1").with_severity(Severity::Low));
        Report::build(
            agg.finish(),
            2,
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            &FailPolicy::default(),
        )
    }

    #[test]
    fn test_render_layout() {
        let text = render_text(&sample());
        let expected = "\
SECURITY ANALYSIS REPORT
Generated: 2023-11-14T22:13:20Z
Total Artifacts: 2
Total Warnings Found: 2
Total Errors Found: 0
Severity Breakdown: High=0 Medium=1 Low=1 Optimization=0 Informational=0 Error=0

1. [Foo] A: contracts/Foo.sol#L42: reentrancy risk (Line 42)
   Severity: Medium
2. [unknown] B: Number of low issues: 1 (Line N/A)
   Severity: Low
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_errors_are_listed() {
        let mut agg = Aggregator::new();
        agg.record_error("slither", "failed to start: No such file or directory");
        let report = Report::build(
            agg.finish(),
            0,
            DateTime::from_timestamp(0, 0).unwrap(),
            &FailPolicy::default(),
        );
        let text = render_text(&report);
        assert!(text.contains("Total Errors Found: 1"));
        assert!(text.ends_with("Analyzer Errors:\n- slither: failed to start: No such file or directory\n"));
    }

    #[test]
    fn test_count_entries() {
        let text = render_text(&sample());
        assert_eq!(count_entries(&text), 2);
        assert_eq!(count_entries("no findings [here]\n"), 0);
    }
}
