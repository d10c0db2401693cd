use anyhow::Result;
use clap::Parser;
use pg_analyze::cli::{configure_thread_pool, init_logging, Cli};
use pg_analyze::commands::analyze::{handle_analyze, print_summary, AnalyzeConfig};
use pg_analyze::config::load_config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Side effects at the edge: logging and the worker pool first
    init_logging(cli.log_level());
    configure_thread_pool(cli.jobs);

    let file_config = load_config(cli.config.as_deref())?;
    let config = AnalyzeConfig::from_cli(&cli, &file_config);
    log::info!(
        "Scanning {} roots into {}",
        config.roots.len(),
        config.out_dir.display()
    );

    let summary = handle_analyze(&config)?;
    print_summary(&summary);
    Ok(())
}
