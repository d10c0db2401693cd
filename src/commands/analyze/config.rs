//! Configuration for the analyze command.
//!
//! Command-line flags are merged over the file configuration into a single
//! [`AnalyzeConfig`] before any I/O happens.

use crate::cli::Cli;
use crate::config::AnalyzerConfig;
use crate::progress::{ProgressConfig, ProgressManager};
use std::path::PathBuf;

/// Configuration for the analyze command.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeConfig {
    pub roots: Vec<PathBuf>,
    pub out_dir: PathBuf,
    pub per_file_tsv: Option<PathBuf>,
    pub jsonl_out: Option<PathBuf>,
    pub needs_review_limit: usize,
    pub review_threshold: f64,
    pub pgml_sample_limit: usize,
    pub bucket_lists: bool,
    pub pgml_sample: bool,
    pub extension: String,
    pub exclude_dirs: Vec<String>,
    pub fail_fast: bool,
    pub quiet: bool,
    pub verbosity: u8,
}

impl AnalyzeConfig {
    pub fn from_cli(cli: &Cli, file_config: &AnalyzerConfig) -> Self {
        let roots = if cli.roots.is_empty() {
            file_config.existing_default_roots()
        } else {
            cli.roots.clone()
        };

        Self {
            roots,
            out_dir: cli.out_dir.clone(),
            per_file_tsv: cli.per_file_tsv.clone(),
            jsonl_out: cli.jsonl_out.clone(),
            needs_review_limit: cli
                .needs_review_limit
                .unwrap_or(file_config.needs_review_limit),
            review_threshold: file_config.review_threshold,
            pgml_sample_limit: file_config.pgml_sample_limit,
            bucket_lists: !cli.no_bucket_lists,
            pgml_sample: !cli.no_pgml_sample,
            extension: file_config.extension.clone(),
            exclude_dirs: file_config.exclude_dirs.clone(),
            fail_fast: cli.fail_fast,
            quiet: cli.quiet,
            verbosity: cli.verbosity,
        }
    }

    /// Plain defaults for one output directory; used by library callers.
    pub fn new(roots: Vec<PathBuf>, out_dir: PathBuf) -> Self {
        let defaults = AnalyzerConfig::default();
        Self {
            roots,
            out_dir,
            per_file_tsv: None,
            jsonl_out: None,
            needs_review_limit: defaults.needs_review_limit,
            review_threshold: defaults.review_threshold,
            pgml_sample_limit: defaults.pgml_sample_limit,
            bucket_lists: true,
            pgml_sample: true,
            extension: defaults.extension,
            exclude_dirs: defaults.exclude_dirs,
            fail_fast: false,
            quiet: true,
            verbosity: 0,
        }
    }
}

pub fn progress_manager(config: &AnalyzeConfig) -> ProgressManager {
    ProgressManager::new(ProgressConfig::from_env(config.quiet, config.verbosity))
}
