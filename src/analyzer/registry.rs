//! Analyzer registry
//!
//! Holds the adapters for one run in their configured order together with
//! the parsing policy for each. The order here is the order findings reach
//! the aggregator, so it must be deterministic.

use std::sync::Arc;

use super::process::ProcessAdapter;
use super::runner::AnalyzerRunner;
use crate::config::{Config, NonZeroExit};
use crate::parser::ParserKind;

/// An adapter plus how to interpret what it returns
#[derive(Clone)]
pub struct RegisteredAnalyzer {
    pub runner: Arc<dyn AnalyzerRunner>,
    pub parser: ParserKind,
    pub structured: bool,
    pub on_nonzero_exit: NonZeroExit,
}

impl RegisteredAnalyzer {
    pub fn new(runner: Arc<dyn AnalyzerRunner>, parser: ParserKind) -> Self {
        Self {
            runner,
            parser,
            structured: false,
            on_nonzero_exit: NonZeroExit::default(),
        }
    }

    pub fn structured(mut self, structured: bool) -> Self {
        self.structured = structured;
        self
    }

    pub fn on_nonzero_exit(mut self, policy: NonZeroExit) -> Self {
        self.on_nonzero_exit = policy;
        self
    }

    pub fn id(&self) -> &str {
        self.runner.id()
    }
}

/// Ordered set of analyzers for one pipeline run
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    entries: Vec<RegisteredAnalyzer>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build process adapters for every enabled analyzer in `config`
    ///
    /// When `only` is non-empty, analyzers not named in it are skipped.
    pub fn from_config(config: &Config, only: &[String]) -> Self {
        let mut registry = Self::new();
        for (name, analyzer) in config.analyzers() {
            if !only.is_empty() && !only.iter().any(|o| o == name) {
                continue;
            }
            let adapter = ProcessAdapter::new(name, analyzer.clone(), config.timeout_for(analyzer));
            registry.register(
                RegisteredAnalyzer::new(Arc::new(adapter), analyzer.parser_kind(name))
                    .structured(analyzer.structured)
                    .on_nonzero_exit(analyzer.on_nonzero_exit),
            );
        }
        registry
    }

    /// Append an analyzer; it runs after everything registered before it
    pub fn register(&mut self, entry: RegisteredAnalyzer) {
        self.entries.push(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredAnalyzer> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
