//! External process adapter
//!
//! Spawns one analyzer, captures both output streams, and enforces the
//! configured timeout. The child is always reaped before returning: on
//! timeout (or a failed wait) it is killed together with its process group
//! so helpers it started (e.g. `npx` → `node`) do not outlive the run. The
//! group is only signalled while the leader is unreaped, since a reaped
//! leader's pgid may already belong to another process.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::command::{find_in_path, CommandSpec};
use super::runner::{AnalyzerRunner, InvocationContext};
use crate::config::AnalyzerConfig;
use crate::AnalyzerRun;

/// How long to wait for output pipes to drain after the process is gone
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs a configured analyzer as a child process
pub struct ProcessAdapter {
    id: String,
    config: AnalyzerConfig,
    timeout: Duration,
}

impl ProcessAdapter {
    pub fn new(id: impl Into<String>, config: AnalyzerConfig, timeout: Duration) -> Self {
        Self {
            id: id.into(),
            config,
            timeout,
        }
    }

    /// Name of the program that will actually be spawned (launcher or binary)
    fn program(&self) -> &str {
        self.config
            .launcher
            .for_current_os()
            .first()
            .map(String::as_str)
            .unwrap_or(&self.config.binary)
    }
}

#[async_trait]
impl AnalyzerRunner for ProcessAdapter {
    async fn run(&self, ctx: &InvocationContext) -> AnalyzerRun {
        let spec = CommandSpec::build(&self.config, ctx);
        debug!(tool = %self.id, command = %spec.display(), "Starting analyzer");
        execute(&self.id, &spec, self.timeout).await
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn is_available(&self) -> bool {
        find_in_path(self.program()).is_some()
    }
}

/// Run `spec` once, never returning before the child has been reaped
pub async fn execute(tool: &str, spec: &CommandSpec, timeout: Duration) -> AnalyzerRun {
    let started = Instant::now();

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .current_dir(&spec.cwd)
        .envs(&spec.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(tool, program = %spec.program, "Failed to spawn analyzer: {}", e);
            return AnalyzerRun::spawn_failed(tool, format!("{}: {}", spec.program, e));
        }
    };
    let pid = child.id();

    let stdout_task = child.stdout.take().map(|s| tokio::spawn(read_stream(s)));
    let stderr_task = child.stderr.take().map(|s| tokio::spawn(read_stream(s)));

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout = collect(stdout_task).await;
            let stderr = collect(stderr_task).await;
            let exit_code = exit_code(&status);
            debug!(tool, exit_code, "Analyzer finished");
            AnalyzerRun::completed(tool, exit_code, stdout, stderr).with_elapsed(started.elapsed())
        }
        Ok(Err(e)) => {
            terminate(&mut child, pid).await;
            abort(stdout_task);
            abort(stderr_task);
            warn!(tool, "Failed to wait for analyzer: {}", e);
            AnalyzerRun::spawn_failed(tool, format!("wait failed: {}", e))
                .with_elapsed(started.elapsed())
        }
        Err(_) => {
            terminate(&mut child, pid).await;
            let stdout = collect(stdout_task).await;
            let stderr = collect(stderr_task).await;
            warn!(tool, timeout_secs = timeout.as_secs_f64(), "Analyzer timed out and was killed");
            AnalyzerRun::timed_out(tool, stdout, stderr, started.elapsed())
        }
    }
}

async fn read_stream<R: AsyncRead + Unpin>(mut reader: R) -> String {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf).await {
        debug!("Output stream closed with error: {}", e);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn collect(task: Option<JoinHandle<String>>) -> String {
    let Some(mut task) = task else {
        return String::new();
    };
    match tokio::time::timeout(DRAIN_GRACE, &mut task).await {
        Ok(Ok(output)) => output,
        Ok(Err(_)) => String::new(),
        Err(_) => {
            task.abort();
            String::new()
        }
    }
}

fn abort(task: Option<JoinHandle<String>>) {
    if let Some(task) = task {
        task.abort();
    }
}

/// Kill the child (and its group) and wait for it
async fn terminate(child: &mut Child, pid: Option<u32>) {
    kill_group(pid);
    if let Err(e) = child.kill().await {
        debug!("Kill after timeout reported: {}", e);
    }
}

#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    // The child was spawned as leader of its own group (pgid == pid).
    unsafe {
        libc::kill(-pid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}

#[cfg(unix)]
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
