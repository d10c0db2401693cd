//! Analyze command module.
//!
//! - **config.rs**: flag and file configuration merged into one value
//! - **orchestrator.rs**: thin I/O composition around the pure analysis core
//! - **summary.rs**: end-of-run summary

pub mod config;
pub mod orchestrator;
pub mod summary;

pub use config::AnalyzeConfig;
pub use orchestrator::{display_path, handle_analyze};
pub use summary::{print_summary, RunSummary};
