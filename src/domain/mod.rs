//! Core domain types for auditpipe

mod analyzer_run;
mod artifact;
mod finding;
mod severity;

pub use analyzer_run::AnalyzerRun;
pub use artifact::{Artifact, ArtifactSet};
pub use finding::{Finding, FindingKey, UNKNOWN_ARTIFACT};
pub use severity::Severity;
