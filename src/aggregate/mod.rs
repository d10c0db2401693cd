//! Corpus-level aggregation of per-file records.
//!
//! The [`Aggregator`] owns every running counter and the bounded needs-review
//! sample. Records are merged one at a time; nothing is rendered until
//! [`Aggregator::render_reports`].

pub mod bins;
pub mod render;
pub mod review;

pub use bins::{confidence_bin, count_bucket};
pub use review::{ReviewEntry, ReviewSample};

use std::collections::{BTreeMap, HashMap};

use crate::model::Record;
use render::{render_counts_tsv, render_needs_review_tsv};

pub const DEFAULT_NEEDS_REVIEW_LIMIT: usize = 200;

pub const COUNTS_BY_TYPE: &str = "counts_by_type.tsv";
pub const CONFIDENCE_BINS: &str = "confidence_bins.tsv";
pub const MACRO_COUNTS: &str = "macro_counts.tsv";
pub const WIDGET_COUNTS: &str = "widget_counts.tsv";
pub const EVALUATOR_COUNTS: &str = "evaluator_counts.tsv";
pub const INPUT_COUNT_HIST: &str = "input_count_hist.tsv";
pub const ANS_COUNT_HIST: &str = "ans_count_hist.tsv";
pub const NEEDS_REVIEW_BUCKETS: &str = "needs_review_buckets.tsv";
pub const DISCIPLINE_COUNTS: &str = "discipline_counts.tsv";
pub const NEEDS_REVIEW: &str = "needs_review.tsv";

#[derive(Debug, Default, Clone)]
struct Counter(HashMap<String, usize>);

impl Counter {
    fn inc(&mut self, key: &str) {
        *self.0.entry(key.to_string()).or_insert(0) += 1;
    }

    fn get(&self, key: &str) -> usize {
        self.0.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    files: usize,
    type_counts: Counter,
    confidence_bins: Counter,
    macro_counts: Counter,
    widget_counts: Counter,
    evaluator_counts: Counter,
    input_hist: Counter,
    ans_hist: Counter,
    review_buckets: Counter,
    discipline_counts: Counter,
    needs_review_total: usize,
    review: ReviewSample,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_NEEDS_REVIEW_LIMIT)
    }
}

impl Aggregator {
    pub fn new(needs_review_limit: usize) -> Self {
        Self {
            files: 0,
            type_counts: Counter::default(),
            confidence_bins: Counter::default(),
            macro_counts: Counter::default(),
            widget_counts: Counter::default(),
            evaluator_counts: Counter::default(),
            input_hist: Counter::default(),
            ans_hist: Counter::default(),
            review_buckets: Counter::default(),
            discipline_counts: Counter::default(),
            needs_review_total: 0,
            review: ReviewSample::new(needs_review_limit),
        }
    }

    pub fn add_record(&mut self, record: &Record) {
        self.files += 1;

        for t in &record.types {
            self.type_counts.inc(t.as_str());
        }
        self.confidence_bins.inc(&confidence_bin(record.confidence));
        for name in &record.load_macros {
            self.macro_counts.inc(name);
        }
        for kind in &record.widget_kinds {
            self.widget_counts.inc(kind.as_str());
        }
        for kind in &record.evaluator_kinds {
            self.evaluator_counts.inc(kind.as_str());
        }
        self.input_hist.inc(count_bucket(record.input_count));
        self.ans_hist.inc(count_bucket(record.ans_count));
        if !record.discipline.is_empty() {
            self.discipline_counts.inc(&record.discipline);
        }

        if record.needs_review {
            self.needs_review_total += 1;
            if let Some(bucket) = record.needs_review_bucket {
                self.review_buckets.inc(bucket.as_str());
            }
            self.review.offer(ReviewEntry::from_record(record));
        }
    }

    pub fn files(&self) -> usize {
        self.files
    }

    /// Records flagged for review, including those dropped from the sample.
    pub fn needs_review_total(&self) -> usize {
        self.needs_review_total
    }

    pub fn type_count(&self, key: &str) -> usize {
        self.type_counts.get(key)
    }

    pub fn review_sample(&self) -> &ReviewSample {
        &self.review
    }

    /// Report file name to file content.
    pub fn render_reports(&self) -> BTreeMap<String, String> {
        let tables: [(&str, &Counter, &str); 9] = [
            (COUNTS_BY_TYPE, &self.type_counts, "type"),
            (CONFIDENCE_BINS, &self.confidence_bins, "bin"),
            (MACRO_COUNTS, &self.macro_counts, "macro"),
            (WIDGET_COUNTS, &self.widget_counts, "widget_kind"),
            (EVALUATOR_COUNTS, &self.evaluator_counts, "evaluator_kind"),
            (INPUT_COUNT_HIST, &self.input_hist, "bucket"),
            (ANS_COUNT_HIST, &self.ans_hist, "bucket"),
            (NEEDS_REVIEW_BUCKETS, &self.review_buckets, "bucket"),
            (DISCIPLINE_COUNTS, &self.discipline_counts, "discipline"),
        ];

        let mut out: BTreeMap<String, String> = tables
            .into_iter()
            .map(|(name, counter, key)| (name.to_string(), render_counts_tsv(&counter.0, key)))
            .collect();
        out.insert(
            NEEDS_REVIEW.to_string(),
            render_needs_review_tsv(&self.review.sorted()),
        );
        out
    }
}
