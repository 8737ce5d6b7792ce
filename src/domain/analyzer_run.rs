use std::time::Duration;

/// Outcome of invoking one analyzer once
///
/// Built by the adapter and handed straight to the matching parser; it is
/// never kept past the current pipeline run.
#[derive(Debug, Clone)]
pub struct AnalyzerRun {
    /// Analyzer identifier
    pub tool: String,

    /// Process exit status, or one of the sentinels below
    pub exit_code: i32,

    pub stdout: String,
    pub stderr: String,

    /// The process was killed because it ran past its timeout
    pub duration_exceeded_timeout: bool,

    /// Set when the process could not be started at all
    pub spawn_error: Option<String>,

    /// Wall-clock time spent in the invocation
    pub elapsed: Duration,
}

impl AnalyzerRun {
    /// Exit status reported when the binary could not be spawned
    pub const SPAWN_FAILED: i32 = 127;

    /// Exit status reported when the process was killed on timeout
    pub const TIMED_OUT: i32 = 124;

    pub fn completed(
        tool: impl Into<String>,
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration_exceeded_timeout: false,
            spawn_error: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn spawn_failed(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            exit_code: Self::SPAWN_FAILED,
            stdout: String::new(),
            stderr: String::new(),
            duration_exceeded_timeout: false,
            spawn_error: Some(error.into()),
            elapsed: Duration::ZERO,
        }
    }

    pub fn timed_out(
        tool: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            tool: tool.into(),
            exit_code: Self::TIMED_OUT,
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration_exceeded_timeout: true,
            spawn_error: None,
            elapsed,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn exited_cleanly(&self) -> bool {
        self.exit_code == 0 && !self.failed_to_run()
    }

    /// The tool never produced a usable result (not started, or killed)
    pub fn failed_to_run(&self) -> bool {
        self.spawn_error.is_some() || self.duration_exceeded_timeout
    }

    /// True when both streams are empty or whitespace
    pub fn is_silent(&self) -> bool {
        self.stdout.trim().is_empty() && self.stderr.trim().is_empty()
    }

    /// Short reason used in logs and error listings
    pub fn failure_reason(&self) -> Option<String> {
        if let Some(err) = &self.spawn_error {
            return Some(format!("failed to start: {}", err));
        }
        if self.duration_exceeded_timeout {
            return Some(format!("timed out after {:.1}s", self.elapsed.as_secs_f64()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_failed_uses_sentinel() {
        let run = AnalyzerRun::spawn_failed("slither", "No such file or directory");
        assert_eq!(run.exit_code, AnalyzerRun::SPAWN_FAILED);
        assert!(run.failed_to_run());
        assert!(run.is_silent());
        assert!(run.failure_reason().unwrap().contains("No such file"));
    }

    #[test]
    fn test_timed_out_flags() {
        let run = AnalyzerRun::timed_out("a", "partial", "", Duration::from_millis(1500));
        assert!(run.duration_exceeded_timeout);
        assert_eq!(run.exit_code, AnalyzerRun::TIMED_OUT);
        assert_eq!(run.failure_reason().unwrap(), "timed out after 1.5s");
    }

    #[test]
    fn test_nonzero_exit_is_not_failure_to_run() {
        let run = AnalyzerRun::completed("a", 1, "x.sol#L1: issue", "");
        assert!(!run.failed_to_run());
        assert!(!run.exited_cleanly());
        assert!(run.failure_reason().is_none());
    }
}
