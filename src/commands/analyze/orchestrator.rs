//! Orchestrator for the analyze command.
//!
//! Thin I/O composition: discover files, analyze them in parallel, then merge
//! every result on the calling thread in discovery order. Aggregation and all
//! file writers are owned by that single thread.

use super::config::{progress_manager, AnalyzeConfig};
use super::summary::RunSummary;
use crate::aggregate::Aggregator;
use crate::analysis::{Analyzer, FileAnalysis};
use crate::errors;
use crate::extract::Registry;
use crate::io::{
    self, BucketWriters, JsonlRecordWriter, PgFileWalker, PgmlBlockSampler, RecordSink,
    TsvRecordWriter,
};
use crate::progress::TEMPLATE_FILE_ANALYSIS;
use anyhow::{Context, Result};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Main entry point: run a full corpus analysis and write every output.
pub fn handle_analyze(config: &AnalyzeConfig) -> Result<RunSummary> {
    let progress = progress_manager(config);

    let spinner = progress.create_spinner("Discovering problem files");
    let files = discover_files(config);
    spinner.finish_and_clear();
    log::info!("Discovered {} files under {} roots", files.len(), config.roots.len());

    let analyzer = Analyzer::new(Registry::default()).with_review_threshold(config.review_threshold);

    let bar = progress.create_bar(files.len() as u64, TEMPLATE_FILE_ANALYSIS);
    bar.set_message("Analyzing");
    let results: Vec<(&PathBuf, errors::Result<FileAnalysis>)> = files
        .par_iter()
        .progress_with(bar.clone())
        .map(|path| (path, analyzer.analyze_file(path, &display_path(path))))
        .collect();
    bar.finish_and_clear();

    let mut outputs = RunOutputs::open(config)?;
    let mut summary = RunSummary::new(&config.out_dir);

    for (path, result) in results {
        match result {
            Ok(analysis) => {
                outputs.merge(&analysis)?;
                summary.analyzed += 1;
            }
            Err(e) if config.fail_fast => {
                return Err(e).with_context(|| format!("Failed to analyze {}", path.display()));
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                summary.skipped += 1;
            }
        }
    }

    summary.needs_review = outputs.aggregator.needs_review_total();
    summary.pgml_blocks_sampled = outputs.sampler.as_ref().map_or(0, |s| s.written());
    summary.reports = outputs.finish(&config.out_dir)?;
    let _ = progress.clear();
    Ok(summary)
}

fn discover_files(config: &AnalyzeConfig) -> Vec<PathBuf> {
    PgFileWalker::new(config.roots.clone())
        .with_extension(config.extension.clone())
        .with_exclude_dirs(config.exclude_dirs.clone())
        .walk()
}

/// Path as recorded in the outputs, with `/` separators.
pub fn display_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Aggregator plus every per-record writer for one run.
struct RunOutputs {
    aggregator: Aggregator,
    sinks: Vec<Box<dyn RecordSink>>,
    sampler: Option<PgmlBlockSampler>,
}

impl RunOutputs {
    fn open(config: &AnalyzeConfig) -> Result<Self> {
        io::ensure_dir(&config.out_dir)
            .with_context(|| format!("Failed to create {}", config.out_dir.display()))?;

        let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();
        if let Some(path) = &config.per_file_tsv {
            sinks.push(Box::new(TsvRecordWriter::new(create_writer(path)?)));
        }
        if let Some(path) = &config.jsonl_out {
            sinks.push(Box::new(JsonlRecordWriter::new(create_writer(path)?)));
        }
        if config.bucket_lists {
            sinks.push(Box::new(BucketWriters::new(&config.out_dir)));
        }

        let sampler = if config.pgml_sample {
            Some(
                PgmlBlockSampler::new(&config.out_dir, config.pgml_sample_limit)
                    .context("Failed to open PGML block sample")?,
            )
        } else {
            None
        };

        Ok(Self {
            aggregator: Aggregator::new(config.needs_review_limit),
            sinks,
            sampler,
        })
    }

    fn merge(&mut self, analysis: &FileAnalysis) -> Result<()> {
        let record = &analysis.record;
        self.aggregator.add_record(record);
        for sink in &mut self.sinks {
            sink.write_record(record)?;
        }
        if let Some(sampler) = &mut self.sampler {
            if PgmlBlockSampler::wants(record) && !sampler.is_full() {
                sampler.add_blocks(record, &analysis.pgml_blocks)?;
            }
        }
        Ok(())
    }

    fn finish(mut self, out_dir: &Path) -> Result<Vec<PathBuf>> {
        for sink in &mut self.sinks {
            sink.finish()?;
        }
        if let Some(sampler) = &mut self.sampler {
            sampler.finish()?;
        }
        let written = io::write_reports(out_dir, &self.aggregator.render_reports())
            .context("Failed to write reports")?;
        Ok(written)
    }
}

fn create_writer(path: &Path) -> Result<BufWriter<File>> {
    io::ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
