//! Per-file analysis: text in, [`Record`] out.

use std::path::Path;

use crate::classify::Classifier;
use crate::discipline;
use crate::errors::Result;
use crate::extract::{extract_answers, extract_evaluators, extract_macros, extract_widgets, Registry};
use crate::io::read_latin1;
use crate::model::{
    ClassificationLabels, EvaluatorKind, EvaluatorSource, PgmlBlock, Record, ReviewBucket,
    StructuralReport,
};
use crate::scan::SourceText;
use crate::wiring::wire;

pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.55;

/// A record plus the markup blocks it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    pub record: Record,
    pub pgml_blocks: Vec<PgmlBlock>,
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    registry: Registry,
    classifier: Classifier,
    review_threshold: f64,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(Registry::default())
    }
}

impl Analyzer {
    pub fn new(registry: Registry) -> Self {
        let classifier = Classifier::new(&registry);
        Self {
            registry,
            classifier,
            review_threshold: DEFAULT_REVIEW_THRESHOLD,
        }
    }

    pub fn with_review_threshold(mut self, threshold: f64) -> Self {
        self.review_threshold = threshold;
        self
    }

    /// Run every extractor and the wiring resolver over one file.
    pub fn structural_report(&self, source: &SourceText) -> StructuralReport {
        let macros = extract_macros(source.stripped(), source.newlines(), &self.registry);
        let (widgets, pgml) = extract_widgets(source, &self.registry);
        let evaluators = extract_evaluators(source, &self.registry);
        let answers = extract_answers(source, &self.registry);
        let wiring = wire(&widgets, &evaluators);

        StructuralReport {
            macros,
            widgets,
            evaluators,
            answers,
            wiring,
            pgml,
        }
    }

    pub fn analyze_text(&self, file: &str, text: &str) -> FileAnalysis {
        let source = SourceText::new(text);
        let report = self.structural_report(&source);
        let labels = self.classifier.classify(&report);
        let subjects = discipline::extract_dbsubjects(source.raw());

        let needs_review_bucket = review_bucket(&report, labels.confidence, self.review_threshold);
        let record = build_record(file, &report, labels, needs_review_bucket, subjects);

        log::debug!(
            "{}: types={} confidence={:.2}",
            record.file,
            record.types_text(),
            record.confidence
        );

        FileAnalysis {
            record,
            pgml_blocks: report.pgml.blocks,
        }
    }

    /// Read `path` as Latin-1 and analyze it. `display` is the path recorded
    /// in the output.
    pub fn analyze_file(&self, path: &Path, display: &str) -> Result<FileAnalysis> {
        let text = read_latin1(path)?;
        Ok(self.analyze_text(display, &text))
    }
}

/// Analyze with the default registry and review threshold.
pub fn analyze_text(file: &str, text: &str) -> Record {
    Analyzer::default().analyze_text(file, text).record
}

/// First matching review bucket, if any.
pub fn review_bucket(
    report: &StructuralReport,
    confidence: f64,
    threshold: f64,
) -> Option<ReviewBucket> {
    let evaluators = &report.evaluators;
    if evaluators.len() >= 2 && report.wiring.is_empty() {
        return Some(ReviewBucket::WiringEmpty);
    }
    if !evaluators.is_empty()
        && evaluators
            .iter()
            .all(|e| e.source == EvaluatorSource::PgmlPayload && e.kind == EvaluatorKind::Other)
    {
        return Some(ReviewBucket::PgmlPayloadUnrecognized);
    }
    if confidence < threshold {
        return Some(ReviewBucket::LowConfidence);
    }
    None
}

fn build_record(
    file: &str,
    report: &StructuralReport,
    labels: ClassificationLabels,
    needs_review_bucket: Option<ReviewBucket>,
    subjects: Vec<String>,
) -> Record {
    Record {
        file: file.to_string(),
        types: labels.types,
        confidence: labels.confidence,
        needs_review: needs_review_bucket.is_some(),
        needs_review_bucket,
        input_count: report.input_count(),
        ans_count: report.evaluators.len(),
        widget_kinds: report.widgets.iter().map(|w| w.kind).collect(),
        evaluator_kinds: report.evaluators.iter().map(|e| e.kind).collect(),
        load_macros: report.macros.load_macros.clone(),
        include_pgproblem: report.macros.include_pgproblem.clone(),
        named_rule_refs: report.named_rule_refs(),
        has_answer_ctor: report.answers.has_answer_ctor(),
        pgml_blank_count: report.pgml.blank_count,
        pgml_payload_count: report.pgml.payload_count,
        wiring_empty: report.wiring.is_empty(),
        reasons: labels.reasons,
        discipline: discipline::primary_discipline(&subjects).to_string(),
        subjects,
    }
}
