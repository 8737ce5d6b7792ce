//! View command implementation

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use auditpipe::report::count_entries;

use super::{load_config, report_path};

pub fn view_command(work_dir: &Path, config_path: Option<PathBuf>, report: Option<PathBuf>) -> Result<()> {
    let config = load_config(work_dir, config_path.as_deref())?;
    let path = report_path(work_dir, report, &config.settings.report);

    if !path.exists() {
        bail!(
            "No report found at {}\nRun `auditpipe run` first.",
            path.display()
        );
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read report: {}", path.display()))?;

    print!("{}", content);
    if !content.ends_with('\n') {
        println!();
    }
    println!();
    println!("Total finding entries: {}", count_entries(&content));

    Ok(())
}
