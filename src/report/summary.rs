//! Console summary

use std::fmt::Write;

use super::Report;
use crate::Severity;

pub fn print_summary(report: &Report) {
    print!("{}", render_summary(report));
}

pub fn render_summary(report: &Report) -> String {
    let state = &report.state;
    let mut out = String::new();

    let verdict = if report.passed { "PASSED" } else { "FAILED" };
    let _ = writeln!(out, "Security analysis {}", verdict);
    let _ = writeln!(
        out,
        "  {} artifacts, {} findings, {} analyzer errors",
        report.artifact_count,
        state.total_findings(),
        state.total_errors
    );

    out.push_str("\nBy severity:\n");
    for severity in Severity::ALL {
        let _ = writeln!(out, "  {:<14} {}", severity.label(), state.count(severity));
    }

    if !state.counts_by_artifact.is_empty() {
        out.push_str("\nBy artifact:\n");
        for (artifact, count) in &state.counts_by_artifact {
            let _ = writeln!(out, "  {:<14} {}", artifact, count);
        }
    }

    if !state.findings.is_empty() {
        out.push_str("\nFindings:\n");
        for (i, f) in state.findings.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. [{}] {} ({}): {} (Line {})",
                i + 1,
                f.artifact,
                f.tool,
                f.severity,
                f.message,
                f.location_label()
            );
        }
    }

    if !state.errors.is_empty() {
        out.push_str("\nAnalyzer errors:\n");
        for error in &state.errors {
            let _ = writeln!(out, "  {}: {}", error.tool, error.reason);
        }
    }

    out
}
