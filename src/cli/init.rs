//! Init command implementation

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use auditpipe::config::CONFIG_CANDIDATES;

/// Default configuration content for auditpipe init
pub const DEFAULT_CONFIG: &str = r#"# auditpipe configuration
# =======================
#
# Each [analyzer.<name>] section is one external tool. Every enabled
# analyzer runs once per `auditpipe run`; its output is parsed into
# findings, classified, de-duplicated and written to a single report.

# ============================================================================
# SETTINGS
# ============================================================================
#
#   report               - Text report path, relative to the project (overwritten each run)
#   json_report          - Optional JSON copy of the report ("" disables it)
#   parallel             - Run analyzers concurrently (report order is unchanged)
#   default_timeout_secs - Timeout for analyzers without their own timeout_secs

[settings]
report = "security-report.txt"
json_report = ""
parallel = false
default_timeout_secs = 300

# Source files counted as artifacts and used to resolve reported paths
[settings.artifacts]
root = "contracts"
include = ["**/*.sol"]

# The run fails (exit 1) when any finding has one of these severities,
# or when an analyzer could not run and `errors = true`.
# Severities: high, medium, low, optimization, informational, error
[settings.fail_on]
severities = ["high", "medium"]
errors = true

# ============================================================================
# ANALYZERS
# ============================================================================
#
#   binary           - Executable, looked up on PATH
#   args             - Arguments. "{root}" is replaced by the project directory;
#                      a lone "{artifacts}" expands to one argument per artifact
#   structured       - Ask for machine-readable output and parse it first
#   structured_args  - Appended to args when structured = true
#   parser           - solhint | slither | sarif | compiler | text
#                      (inferred from the analyzer name when omitted)
#   on_nonzero_exit  - "findings": a non-zero exit means issues were found
#                      "failure":  a non-zero exit is always an analyzer error
#   timeout_secs     - Kill the analyzer after this many seconds
#   order            - Lower runs first; ties are broken by name
#   enabled          - Set to false to skip the analyzer
#   launcher         - Per-OS command prefix (windows = [...], unix = [...])
#   env              - Extra environment variables
#   working_dir      - Directory to run in, relative to the project

[analyzer.solhint]
binary = "npx"
args = ["solhint", "{root}/contracts/**/*.sol"]
structured = true
structured_args = ["-f", "json"]
parser = "solhint"
order = 1

[analyzer.solhint.launcher]
windows = ["cmd", "/C"]

[analyzer.slither]
binary = "slither"
args = ["{root}"]
structured = true
structured_args = ["--json", "-"]
parser = "slither"
order = 2

[analyzer.hardhat]
binary = "npx"
args = ["hardhat", "compile"]
parser = "compiler"
on_nonzero_exit = "failure"
order = 3

[analyzer.hardhat.launcher]
windows = ["cmd", "/C"]

# ============================================================================
# CLASSIFIER
# ============================================================================
#
# Extra severity rules, checked before the built-in ones. A finding whose
# message contains any of the phrases (case-insensitive) gets the severity.
#
# [[classifier.rule]]
# severity = "high"
# contains = ["price oracle", "flash loan"]
"#;

pub fn init_command(work_dir: &Path, config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(|| work_dir.join(CONFIG_CANDIDATES[0]));

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    // Create parent directory (if any)
    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
    println!("Created: {}", config_path.display());

    Ok(())
}
