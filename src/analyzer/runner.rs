//! Generic analyzer runner trait

use async_trait::async_trait;
use std::path::PathBuf;

use crate::AnalyzerRun;

/// What an analyzer is run against
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    /// Project directory; analyzers run here unless configured otherwise
    pub root: PathBuf,

    /// Artifact paths relative to `root`, in discovery order
    pub artifacts: Vec<PathBuf>,
}

impl InvocationContext {
    pub fn new(root: impl Into<PathBuf>, artifacts: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            artifacts,
        }
    }
}

/// Trait for analyzer adapters
///
/// `run` never fails: a missing binary or a timeout is reported through the
/// returned [`AnalyzerRun`] so that one broken tool cannot abort the pipeline.
#[async_trait]
pub trait AnalyzerRunner: Send + Sync {
    /// Invoke the analyzer once and capture everything it produced
    async fn run(&self, ctx: &InvocationContext) -> AnalyzerRun;

    /// Get the analyzer ID
    fn id(&self) -> &str;

    /// Check if this analyzer is available (binary on PATH)
    fn is_available(&self) -> bool;
}
