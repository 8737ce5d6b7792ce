//! Command construction for external analyzers

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::InvocationContext;
use crate::config::AnalyzerConfig;

/// Placeholder replaced by the project directory inside any argument
pub const ROOT_PLACEHOLDER: &str = "{root}";

/// Argument expanded into one argument per artifact path
pub const ARTIFACTS_PLACEHOLDER: &str = "{artifacts}";

/// A fully resolved process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    /// Build the invocation for `config` against `ctx`
    ///
    /// The argv is `launcher ++ binary ++ args ++ structured_args`, where the
    /// launcher is the prefix configured for the current OS family.
    pub fn build(config: &AnalyzerConfig, ctx: &InvocationContext) -> Self {
        let cwd = match &config.working_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => ctx.root.join(dir),
            None => ctx.root.clone(),
        };
        // Artifact paths are root-relative; keep them relative only when
        // the process actually runs in the root.
        let artifact_args: Vec<String> = ctx
            .artifacts
            .iter()
            .map(|p| {
                if cwd == ctx.root || p.is_absolute() {
                    p.display().to_string()
                } else {
                    ctx.root.join(p).display().to_string()
                }
            })
            .collect();
        let root = ctx.root.display().to_string();

        let mut argv: Vec<String> = config.launcher.for_current_os().to_vec();
        argv.push(config.binary.clone());

        let extra: &[String] = if config.structured {
            &config.structured_args
        } else {
            &[]
        };
        for arg in config.args.iter().chain(extra.iter()) {
            if arg == ARTIFACTS_PLACEHOLDER {
                argv.extend(artifact_args.iter().cloned());
            } else {
                argv.push(arg.replace(ROOT_PLACEHOLDER, &root));
            }
        }

        let program = argv.remove(0);
        Self {
            program,
            args: argv,
            env: config.env.clone(),
            cwd,
        }
    }

    /// Shell-like rendering for logs
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|a| {
                if a.contains(char::is_whitespace) {
                    format!("\"{}\"", a)
                } else {
                    a.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Locate `binary` the way the OS would when spawning it
///
/// Names containing a path separator are checked directly; bare names are
/// searched on `PATH` (with `PATHEXT` extensions on Windows).
pub fn find_in_path(binary: &str) -> Option<PathBuf> {
    if binary.contains('/') || binary.contains('\\') {
        let path = PathBuf::from(binary);
        return is_executable(&path).then_some(path);
    }

    let path_var = std::env::var_os("PATH")?;
    let extensions = executable_extensions();
    for dir in std::env::split_paths(&path_var) {
        for ext in &extensions {
            let candidate = dir.join(format!("{}{}", binary, ext));
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

fn executable_extensions() -> Vec<String> {
    if cfg!(windows) {
        let mut exts = vec![String::new()];
        let pathext = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".into());
        exts.extend(
            pathext
                .split(';')
                .filter(|e| !e.is_empty())
                .map(|e| e.to_lowercase()),
        );
        exts
    } else {
        vec![String::new()]
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
