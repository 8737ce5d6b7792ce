//! auditpipe - run static analyzers, normalize what they report, gate CI
//!
//! A run invokes each configured analyzer once (linters, security scanners,
//! the compiler), turns its output into [`Finding`]s, classifies their
//! severity, de-duplicates them across tools, and writes a single report
//! whose pass/fail verdict becomes the process exit status.
//!
//! ## Stages
//!
//! 1. [`analyzer`] - command construction, execution, timeouts
//! 2. [`parser`] - structured payloads first, text scanning as fallback
//! 3. [`classifier`] - ordered keyword rules assigning a [`Severity`]
//! 4. [`aggregate`] - ordered, de-duplicated findings plus counters
//! 5. [`report`] - persisted report, console summary, pass/fail
//!
//! [`pipeline`] drives the stages; [`discovery`] finds the source artifacts.

pub mod aggregate;
pub mod analyzer;
pub mod classifier;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod parser;
pub mod pipeline;
pub mod report;

pub use domain::*;
