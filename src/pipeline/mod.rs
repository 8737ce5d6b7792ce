//! Pipeline orchestration
//!
//! Runs every registered analyzer once, parses and classifies its output,
//! and folds the results into one [`AggregationState`]. In parallel mode the
//! invocations overlap, but results are still folded in registry order, so
//! both modes produce the same state for the same tool outputs.

use std::path::PathBuf;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::aggregate::{AggregationState, Aggregator};
use crate::analyzer::{AnalyzerRegistry, InvocationContext, RegisteredAnalyzer};
use crate::classifier::Classifier;
use crate::config::NonZeroExit;
use crate::parser::{parse_run, ParseContext, ParseOutcome};
use crate::{AnalyzerRun, ArtifactSet, Finding, Severity, UNKNOWN_ARTIFACT};

/// What one analyzer invocation contributes to the aggregate
#[derive(Debug, Default)]
pub struct Assessment {
    pub findings: Vec<Finding>,
    /// Set when the invocation counts as an analyzer error
    pub error: Option<String>,
}

/// Decide what a parsed and classified run contributes
///
/// A run that failed to start, timed out, or reported its own failure
/// contributes only an error. A non-zero exit is an error when nothing was
/// parsed from it, or when everything parsed is an unresolved error line
/// (launcher noise such as `npm error ...`). Under [`NonZeroExit::Failure`]
/// any non-zero exit is an error and the parsed findings are kept as well.
pub fn assess(run: &AnalyzerRun, outcome: ParseOutcome, policy: NonZeroExit) -> Assessment {
    if let Some(reason) = run.failure_reason() {
        return Assessment {
            findings: Vec::new(),
            error: Some(reason),
        };
    }

    let findings = match outcome {
        ParseOutcome::Unparseable { reason } => {
            return Assessment {
                findings: Vec::new(),
                error: Some(format!("unparseable output: {}", reason)),
            };
        }
        ParseOutcome::ToolFailure { reason } => {
            return Assessment {
                findings: Vec::new(),
                error: Some(format!("analyzer reported failure: {}", reason)),
            };
        }
        ParseOutcome::Parsed { findings, .. } => findings,
    };

    if run.exit_code != 0 && !findings.is_empty() && findings.iter().all(is_unresolved_error) {
        return Assessment {
            findings: Vec::new(),
            error: Some(format!(
                "exited with code {}: {}",
                run.exit_code, findings[0].message
            )),
        };
    }

    let error = if run.exit_code == 0 {
        None
    } else if findings.is_empty() {
        Some(format!("exited with code {} and reported nothing", run.exit_code))
    } else if policy == NonZeroExit::Failure {
        Some(format!("exited with code {}", run.exit_code))
    } else {
        None
    };

    Assessment { findings, error }
}

fn is_unresolved_error(finding: &Finding) -> bool {
    finding.severity == Severity::Error && finding.artifact == UNKNOWN_ARTIFACT
}

pub struct Pipeline {
    registry: AnalyzerRegistry,
    artifacts: ArtifactSet,
    invocation: InvocationContext,
    classifier: Classifier,
}

impl Pipeline {
    pub fn new(
        registry: AnalyzerRegistry,
        artifacts: ArtifactSet,
        root: impl Into<PathBuf>,
        classifier: Classifier,
    ) -> Self {
        let invocation = InvocationContext::new(root, artifacts.paths());
        Self {
            registry,
            artifacts,
            invocation,
            classifier,
        }
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    /// Run every analyzer once and aggregate the results
    pub async fn run(&self, parallel: bool) -> AggregationState {
        info!(
            analyzers = self.registry.len(),
            artifacts = self.artifacts.len(),
            parallel,
            "Starting analysis"
        );

        let assessments: Vec<(&str, Assessment)> = if parallel {
            join_all(self.registry.iter().map(|entry| async move {
                (entry.id(), self.run_one(entry).await)
            }))
            .await
        } else {
            let mut out = Vec::with_capacity(self.registry.len());
            for entry in self.registry.iter() {
                out.push((entry.id(), self.run_one(entry).await));
            }
            out
        };

        let mut aggregator = Aggregator::new();
        for (tool, assessment) in assessments {
            let kept = aggregator.extend(assessment.findings);
            debug!(tool, kept, "Aggregated findings");
            if let Some(reason) = assessment.error {
                warn!(tool, "Analyzer error: {}", reason);
                aggregator.record_error(tool, reason);
            }
        }

        let state = aggregator.finish();
        info!(
            findings = state.total_findings(),
            errors = state.total_errors,
            "Analysis complete"
        );
        state
    }

    async fn run_one(&self, entry: &RegisteredAnalyzer) -> Assessment {
        let tool = entry.id();
        if !entry.runner.is_available() {
            debug!(tool, "Analyzer binary not found on PATH");
        }

        let run = entry.runner.run(&self.invocation).await;
        info!(
            tool,
            exit_code = run.exit_code,
            elapsed_ms = run.elapsed.as_millis() as u64,
            "Analyzer finished"
        );

        // Output of a killed or unstarted process is not parsed
        if let Some(reason) = run.failure_reason() {
            return Assessment {
                findings: Vec::new(),
                error: Some(reason),
            };
        }

        let ctx = ParseContext::new(tool, &self.artifacts);
        let outcome = parse_run(entry.parser, &run, entry.structured, &ctx)
            .map_findings(|f| self.classifier.apply(f));
        if outcome.is_unparseable() {
            debug!(tool, stdout = %run.stdout, stderr = %run.stderr, "Unparseable output");
        }

        assess(&run, outcome, entry.on_nonzero_exit)
    }
}
