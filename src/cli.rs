use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "pg-analyze")]
#[command(about = "Classify PG problem files by answer-input pattern", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Roots to scan for problem files (files or directories).
    /// Defaults to the configured default roots that exist, else `.`
    #[arg(short = 'r', long = "roots", num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Directory for the aggregate TSV reports
    #[arg(short = 'o', long = "out-dir")]
    pub out_dir: PathBuf,

    /// Write a per-file TSV to this path
    #[arg(long = "per-file-tsv")]
    pub per_file_tsv: Option<PathBuf>,

    /// Write per-file JSONL records to this path
    #[arg(long = "jsonl-out")]
    pub jsonl_out: Option<PathBuf>,

    /// Capacity of the needs-review sample
    #[arg(long = "needs-review-limit")]
    pub needs_review_limit: Option<usize>,

    /// Do not write per-bucket file lists under `lists/`
    #[arg(long = "no-bucket-lists")]
    pub no_bucket_lists: bool,

    /// Do not write the PGML block sample
    #[arg(long = "no-pgml-sample")]
    pub no_pgml_sample: bool,

    /// Configuration file (defaults to `.pg_analyze.toml` when present)
    #[arg(long = "config", env = "PG_ANALYZE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Number of worker threads (0 = all cores)
    #[arg(long = "jobs", default_value = "0")]
    pub jobs: usize,

    /// Stop at the first unreadable file instead of skipping it
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

impl Cli {
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Configure the global rayon pool once at startup. `0` uses all cores.
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }
    if let Err(e) = builder.build_global() {
        log::debug!("Thread pool already configured: {}", e);
    }
}

/// Initialise `env_logger` on stderr. `RUST_LOG` wins over `-v`.
pub fn init_logging(level: log::LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}
