//! Analyzer execution.
//!
//! Every external analyzer (linters, security scanners, the compiler) is run
//! through the [`AnalyzerRunner`] trait. The default implementation,
//! [`ProcessAdapter`], spawns the configured command once, captures stdout,
//! stderr and the exit status, and kills the process when it exceeds its
//! timeout.
//!
//! # Architecture
//!
//! - **[`CommandSpec`]** - argv/env/cwd built from an analyzer's config
//!   (launcher prefix, `{root}` / `{artifacts}` placeholders, structured flags).
//! - **[`ProcessAdapter`]** - spawns and reaps the process.
//! - **[`AnalyzerRegistry`]** - the analyzers of one run, in run order, each
//!   paired with its parser family.
//!
//! # Example
//!
//! ```rust,ignore
//! use auditpipe::analyzer::{AnalyzerRegistry, InvocationContext};
//!
//! let registry = AnalyzerRegistry::from_config(&config, &[]);
//! for entry in registry.iter() {
//!     let run = entry.runner.run(&ctx).await;
//! }
//! ```

mod command;
mod process;
mod registry;
mod runner;

pub use command::{find_in_path, CommandSpec, ARTIFACTS_PLACEHOLDER, ROOT_PLACEHOLDER};
pub use process::{execute, ProcessAdapter};
pub use registry::{AnalyzerRegistry, RegisteredAnalyzer};
pub use runner::{AnalyzerRunner, InvocationContext};
