//! Run command implementation

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use auditpipe::analyzer::AnalyzerRegistry;
use auditpipe::classifier::Classifier;
use auditpipe::discovery::discover;
use auditpipe::pipeline::Pipeline;
use auditpipe::report::{print_summary, report_timestamp, write_json_report, write_report, Report};

use super::{load_config, report_path};

pub struct RunOptions {
    pub report: Option<PathBuf>,
    pub json_report: Option<PathBuf>,
    pub parallel: bool,
    pub analyzers: Vec<String>,
}

/// Run the pipeline and persist the report; returns whether it passed
pub async fn run_command(
    work_dir: &Path,
    config_path: Option<PathBuf>,
    options: RunOptions,
) -> Result<bool> {
    let config = load_config(work_dir, config_path.as_deref())?;

    for name in &options.analyzers {
        if !config.analyzer.contains_key(name) {
            bail!("Unknown analyzer: {}", name);
        }
    }

    let registry = AnalyzerRegistry::from_config(&config, &options.analyzers);
    if registry.is_empty() {
        bail!("No analyzers enabled. Add [analyzer.<name>] sections to the config.");
    }
    info!(analyzers = ?registry.ids(), "Analyzers selected");

    let artifacts = discover(work_dir, &config.settings.artifacts)?;
    let artifact_count = artifacts.len();

    let pipeline = Pipeline::new(
        registry,
        artifacts,
        work_dir,
        Classifier::from_config(&config.classifier),
    );
    let parallel = options.parallel || config.settings.parallel;
    let state = pipeline.run(parallel).await;

    let report = Report::build(
        state,
        artifact_count,
        report_timestamp(),
        &config.settings.fail_on,
    );

    let text_path = report_path(work_dir, options.report, &config.settings.report);
    write_report(&report, &text_path)
        .with_context(|| format!("Failed to write report: {}", text_path.display()))?;

    let json_path = match options.json_report {
        Some(path) => Some(path),
        None => config
            .settings
            .json_report_path()
            .map(|p| report_path(work_dir, None, p)),
    };
    if let Some(json_path) = json_path {
        write_json_report(&report, &json_path)
            .with_context(|| format!("Failed to write JSON report: {}", json_path.display()))?;
        println!("JSON report: {}", json_path.display());
    }

    print_summary(&report);
    println!();
    println!("Report: {}", text_path.display());

    Ok(report.passed)
}
