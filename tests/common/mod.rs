//! Shared test utilities for pipeline integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use auditpipe::analyzer::AnalyzerRegistry;
use auditpipe::classifier::Classifier;
use auditpipe::config::{AnalyzerConfig, Config};
use auditpipe::discovery::discover;
use auditpipe::pipeline::Pipeline;
use auditpipe::report::Report;

/// Creates a temporary project with the given files
pub fn create_project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    for (rel, contents) in files {
        let path = temp_dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create project dir");
        }
        fs::write(&path, contents).expect("Failed to write project file");
    }
    temp_dir
}

/// Project with one artifact, contracts/Foo.sol
pub fn foo_project() -> TempDir {
    create_project(&[(
        "contracts/Foo.sol",
        "pragma solidity ^0.8.0;\ncontract Foo {}\n",
    )])
}

/// Analyzer running `script` with `sh -c`; extra arguments follow as `$1...`
pub fn shell_analyzer(script: &str, order: u32) -> AnalyzerConfig {
    AnalyzerConfig::new("sh")
        .with_args(["-c", script, "sh"])
        .with_order(order)
}

/// Config with exactly the given analyzers
pub fn config_with(analyzers: Vec<(&str, AnalyzerConfig)>) -> Config {
    let mut config = Config::default();
    for (name, analyzer) in analyzers {
        config.analyzer.insert(name.to_string(), analyzer);
    }
    config
}

pub fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}

/// Discover, run and build the report the way `auditpipe run` does
pub async fn run_pipeline(project: &Path, config: &Config, parallel: bool) -> Report {
    let artifacts = discover(project, &config.settings.artifacts).expect("discovery failed");
    let artifact_count = artifacts.len();
    let pipeline = Pipeline::new(
        AnalyzerRegistry::from_config(config, &[]),
        artifacts,
        project,
        Classifier::from_config(&config.classifier),
    );
    let state = pipeline.run(parallel).await;
    Report::build(state, artifact_count, fixed_time(), &config.settings.fail_on)
}
