//! Findings aggregation
//!
//! Merges the findings of every analyzer into one ordered, de-duplicated list
//! and keeps running tallies. Findings are kept in arrival order; the
//! pipeline feeds analyzers in configured order, so the final list is
//! deterministic for identical inputs.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{Finding, FindingKey, Severity};

/// An analyzer that could not produce a usable result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzerError {
    pub tool: String,
    pub reason: String,
}

/// Accumulated findings and counters for one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregationState {
    pub findings: Vec<Finding>,
    pub counts_by_severity: BTreeMap<Severity, usize>,
    pub counts_by_artifact: BTreeMap<String, usize>,
    pub total_errors: usize,
    pub errors: Vec<AnalyzerError>,
}

impl AggregationState {
    pub fn total_findings(&self) -> usize {
        self.findings.len()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.counts_by_severity.get(&severity).copied().unwrap_or(0)
    }
}

/// Builds an [`AggregationState`]
#[derive(Debug, Default)]
pub struct Aggregator {
    state: AggregationState,
    seen: HashSet<FindingKey>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one finding; returns false when it was invalid or a duplicate
    pub fn add(&mut self, finding: Finding) -> bool {
        if !finding.is_valid() {
            return false;
        }
        if !self.seen.insert(finding.key()) {
            return false;
        }

        *self
            .state
            .counts_by_severity
            .entry(finding.severity)
            .or_insert(0) += 1;
        *self
            .state
            .counts_by_artifact
            .entry(finding.artifact.clone())
            .or_insert(0) += 1;
        self.state.findings.push(finding);
        true
    }

    /// Add findings in order; returns how many were kept
    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) -> usize {
        let mut kept = 0;
        for finding in findings {
            if self.add(finding) {
                kept += 1;
            }
        }
        kept
    }

    pub fn record_error(&mut self, tool: impl Into<String>, reason: impl Into<String>) {
        self.state.total_errors += 1;
        self.state.errors.push(AnalyzerError {
            tool: tool.into(),
            reason: reason.into(),
        });
    }

    pub fn state(&self) -> &AggregationState {
        &self.state
    }

    pub fn finish(self) -> AggregationState {
        self.state
    }
}
