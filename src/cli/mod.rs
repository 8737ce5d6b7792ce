//! CLI command implementations

pub mod init;
pub mod run;
pub mod view;

use std::path::{Path, PathBuf};

use anyhow::Result;
use auditpipe::config::Config;

/// Exit status when the report did not pass
pub const EXIT_FAILED: u8 = 1;

/// Exit status for configuration or persistence failures
pub const EXIT_FATAL: u8 = 2;

/// `--config` when given, else the project's config file, else defaults
pub fn load_config(work_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::from_file(path),
        None => Config::from_dir(work_dir),
    }
}

/// Report location: the command-line path as given, else the configured
/// path relative to the project directory
pub fn report_path(work_dir: &Path, cli_path: Option<PathBuf>, configured: &Path) -> PathBuf {
    cli_path.unwrap_or_else(|| {
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            work_dir.join(configured)
        }
    })
}
