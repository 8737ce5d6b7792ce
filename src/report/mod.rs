//! Report building, rendering and persistence
//!
//! A [`Report`] is a snapshot of the aggregation state plus run metadata.
//! The persisted text file, the optional JSON copy and the console summary
//! are all rendered from the same value.

mod persist;
mod render;
mod summary;

pub use persist::{write_atomic, write_json_report, write_report, ReportError};
pub use render::{count_entries, render_text, REPORT_TITLE};
pub use summary::{print_summary, render_summary};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::AggregationState;
use crate::config::FailPolicy;

/// Environment variable that pins the report timestamp
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

/// Final result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub artifact_count: usize,
    pub passed: bool,
    #[serde(flatten)]
    pub state: AggregationState,
}

impl Report {
    pub fn build(
        state: AggregationState,
        artifact_count: usize,
        generated_at: DateTime<Utc>,
        policy: &FailPolicy,
    ) -> Self {
        let passed = evaluate(&state, policy);
        Self {
            generated_at,
            artifact_count,
            passed,
            state,
        }
    }

    pub fn total_findings(&self) -> usize {
        self.state.total_findings()
    }

    pub fn total_errors(&self) -> usize {
        self.state.total_errors
    }
}

/// Pass/fail decision for an aggregation state
///
/// Fails when any finding has a severity listed in `policy.severities`, or
/// when `policy.errors` is set and an analyzer errored.
pub fn evaluate(state: &AggregationState, policy: &FailPolicy) -> bool {
    let severities_clear = policy.severities.iter().all(|s| state.count(*s) == 0);
    let errors_clear = !policy.errors || state.total_errors == 0;
    severities_clear && errors_clear
}

/// Report timestamp: `SOURCE_DATE_EPOCH` when set and valid, else now
pub fn report_timestamp() -> DateTime<Utc> {
    let pinned = std::env::var(SOURCE_DATE_EPOCH).ok();
    timestamp_from(pinned.as_deref()).unwrap_or_else(Utc::now)
}

fn timestamp_from(epoch: Option<&str>) -> Option<DateTime<Utc>> {
    let secs: i64 = epoch?.trim().parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregator;
    use crate::{Finding, Severity};

    fn state_with(severities: &[Severity], errors: usize) -> AggregationState {
        let mut agg = Aggregator::new();
        for (i, sev) in severities.iter().enumerate() {
            agg.add(Finding::new("t", "A", format!("finding {}", i)).with_severity(*sev));
        }
        for _ in 0..errors {
            agg.record_error("t", "failed to start");
        }
        agg.finish()
    }

    #[test]
    fn test_default_policy() {
        let policy = FailPolicy::default();
        assert!(evaluate(&state_with(&[], 0), &policy));
        assert!(evaluate(&state_with(&[Severity::Low, Severity::Optimization], 0), &policy));
        assert!(!evaluate(&state_with(&[Severity::Medium], 0), &policy));
        assert!(!evaluate(&state_with(&[Severity::High], 0), &policy));
        assert!(!evaluate(&state_with(&[], 1), &policy));
    }

    #[test]
    fn test_errors_can_be_ignored() {
        let policy = FailPolicy {
            severities: vec![Severity::High],
            errors: false,
        };
        assert!(evaluate(&state_with(&[Severity::Medium], 2), &policy));
        assert!(!evaluate(&state_with(&[Severity::High], 0), &policy));
    }

    #[test]
    fn test_timestamp_from_epoch() {
        let ts = timestamp_from(Some("1700000000")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert!(timestamp_from(Some("yesterday")).is_none());
        assert!(timestamp_from(None).is_none());
    }

    #[test]
    fn test_build_sets_passed() {
        let report = Report::build(
            state_with(&[Severity::High], 0),
            3,
            timestamp_from(Some("0")).unwrap(),
            &FailPolicy::default(),
        );
        assert!(!report.passed);
        assert_eq!(report.artifact_count, 3);
        assert_eq!(report.total_findings(), 1);
    }
}
