//! Data carried between pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wiring::Wiring;

/// Kind of answer-input construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Blank,
    Popup,
    Radio,
    Checkbox,
    Matching,
    Ordering,
    PgmlBlank,
    Other,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::Blank => "blank",
            WidgetKind::Popup => "popup",
            WidgetKind::Radio => "radio",
            WidgetKind::Checkbox => "checkbox",
            WidgetKind::Matching => "matching",
            WidgetKind::Ordering => "ordering",
            WidgetKind::PgmlBlank => "pgml_blank",
            WidgetKind::Other => "other",
        }
    }

    /// Kinds that accept a student answer and should be graded.
    pub fn is_input(&self) -> bool {
        !matches!(self, WidgetKind::Other)
    }

    /// Free-entry answer rules, in code or in markup.
    pub fn is_blank(&self) -> bool {
        matches!(self, WidgetKind::Blank | WidgetKind::PgmlBlank)
    }

    /// Fixed-choice widgets.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            WidgetKind::Radio | WidgetKind::Checkbox | WidgetKind::Popup | WidgetKind::Matching
        )
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected answer-input construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub kind: WidgetKind,
    /// Constructor name, or `[_]` for markup blanks.
    pub source: String,
    pub line: usize,
    /// Position among all widgets of the file, in source order.
    pub ordinal: usize,
    /// Answer name for named rules such as `NAMED_ANS_RULE('ans1')`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip)]
    pub offset: usize,
}

/// Kind of answer-checking construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    Cmp,
    NamedRule,
    RadioCmp,
    CheckboxCmp,
    PopupCmp,
    NumCmp,
    FunCmp,
    FormulaCmp,
    StrCmp,
    Custom,
    Other,
}

impl EvaluatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorKind::Cmp => "cmp",
            EvaluatorKind::NamedRule => "named_rule",
            EvaluatorKind::RadioCmp => "radio_cmp",
            EvaluatorKind::CheckboxCmp => "checkbox_cmp",
            EvaluatorKind::PopupCmp => "popup_cmp",
            EvaluatorKind::NumCmp => "num_cmp",
            EvaluatorKind::FunCmp => "fun_cmp",
            EvaluatorKind::FormulaCmp => "formula_cmp",
            EvaluatorKind::StrCmp => "str_cmp",
            EvaluatorKind::Custom => "custom",
            EvaluatorKind::Other => "other",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, EvaluatorKind::Other)
    }
}

impl fmt::Display for EvaluatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an evaluator was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorSource {
    AnsCall,
    PgmlPayload,
}

/// A detected answer-checking construct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluator {
    pub kind: EvaluatorKind,
    /// Whitespace-collapsed argument or payload text.
    pub expr: String,
    /// Referenced `$variables`, unique, first-seen order.
    pub vars: Vec<String>,
    pub line: usize,
    pub source: EvaluatorSource,
    /// Answer name referenced by a named rule, e.g. `named_ans_rule('ans1')`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    #[serde(skip)]
    pub offset: usize,
}

/// Files pulled in by macro-loading calls, unique, first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    #[serde(rename = "loadMacros")]
    pub load_macros: Vec<String>,
    #[serde(rename = "includePGproblem")]
    pub include_pgproblem: Vec<String>,
}

/// Answer-object constructor calls; a weak corroborating signal only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    pub ctors: Vec<AnswerCtor>,
    pub has_multi_answer: bool,
}

impl Answers {
    pub fn has_answer_ctor(&self) -> bool {
        !self.ctors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCtor {
    pub name: String,
    pub line: usize,
}

/// Kind of embedded-markup block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PgmlBlockKind {
    #[serde(rename = "BEGIN_PGML")]
    BeginPgml,
    #[serde(rename = "BEGIN_PGML_HINT")]
    BeginPgmlHint,
    #[serde(rename = "BEGIN_PGML_SOLUTION")]
    BeginPgmlSolution,
    #[serde(rename = "HEREDOC_PGML")]
    HeredocPgml,
}

impl PgmlBlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PgmlBlockKind::BeginPgml => "BEGIN_PGML",
            PgmlBlockKind::BeginPgmlHint => "BEGIN_PGML_HINT",
            PgmlBlockKind::BeginPgmlSolution => "BEGIN_PGML_SOLUTION",
            PgmlBlockKind::HeredocPgml => "HEREDOC_PGML",
        }
    }
}

/// One embedded-markup block, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgmlBlock {
    pub kind: PgmlBlockKind,
    pub start_line: usize,
    pub blank_marker_count: usize,
    pub has_payload: bool,
    pub text: String,
}

/// Markup statistics for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgmlInfo {
    pub blocks: Vec<PgmlBlock>,
    pub blank_count: usize,
    pub payload_count: usize,
}

/// Everything the extractors found in one file.
#[derive(Debug, Clone, Default)]
pub struct StructuralReport {
    pub macros: Macros,
    pub widgets: Vec<Widget>,
    pub evaluators: Vec<Evaluator>,
    pub answers: Answers,
    pub wiring: Wiring,
    pub pgml: PgmlInfo,
}

impl StructuralReport {
    pub fn input_widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| w.kind.is_input())
    }

    pub fn input_count(&self) -> usize {
        self.input_widgets().count()
    }

    /// Names referenced by named-rule evaluators, unique, first-seen order.
    pub fn named_rule_refs(&self) -> Vec<String> {
        let mut refs: Vec<String> = Vec::new();
        for name in self.evaluators.iter().filter_map(|e| e.rule_name.as_ref()) {
            if !refs.contains(name) {
                refs.push(name.clone());
            }
        }
        refs
    }
}

/// Coarse problem type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    MultipleChoice,
    Ordering,
    Multipart,
    NumericEntry,
    FibWord,
    UnknownPgmlBlank,
    Other,
}

impl ProblemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::MultipleChoice => "multiple_choice",
            ProblemType::Ordering => "ordering",
            ProblemType::Multipart => "multipart",
            ProblemType::NumericEntry => "numeric_entry",
            ProblemType::FibWord => "fib_word",
            ProblemType::UnknownPgmlBlank => "unknown_pgml_blank",
            ProblemType::Other => "other",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    Widget,
    Evaluator,
    Wiring,
    Macro,
    Pgml,
    Rule,
    Adjust,
}

impl ReasonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonKind::Widget => "widget",
            ReasonKind::Evaluator => "evaluator",
            ReasonKind::Wiring => "wiring",
            ReasonKind::Macro => "macro",
            ReasonKind::Pgml => "pgml",
            ReasonKind::Rule => "rule",
            ReasonKind::Adjust => "adjust",
        }
    }
}

/// One `(kind, value)` pair justifying a classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub kind: ReasonKind,
    pub value: String,
}

impl Reason {
    pub fn new(kind: ReasonKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.value)
    }
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationLabels {
    pub types: Vec<ProblemType>,
    pub confidence: f64,
    pub reasons: Vec<Reason>,
}

impl ClassificationLabels {
    /// Build labels, clamping confidence to `[0, 1]` and dropping duplicate types.
    pub fn new(types: Vec<ProblemType>, confidence: f64, reasons: Vec<Reason>) -> Self {
        let mut unique = Vec::with_capacity(types.len());
        for t in types {
            if !unique.contains(&t) {
                unique.push(t);
            }
        }
        Self {
            types: unique,
            confidence: clamp_confidence(confidence),
            reasons,
        }
    }
}

/// Clamp to `[0, 1]`; NaN maps to 0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Why a record was flagged for manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewBucket {
    WiringEmpty,
    PgmlPayloadUnrecognized,
    LowConfidence,
}

impl ReviewBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewBucket::WiringEmpty => "wiring_empty",
            ReviewBucket::PgmlPayloadUnrecognized => "pgml_payload_unrecognized",
            ReviewBucket::LowConfidence => "low_confidence",
        }
    }
}

impl fmt::Display for ReviewBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-file result consumed by the aggregator and the per-file writers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub file: String,
    pub types: Vec<ProblemType>,
    pub confidence: f64,
    pub needs_review: bool,
    #[serde(default)]
    pub needs_review_bucket: Option<ReviewBucket>,
    pub input_count: usize,
    pub ans_count: usize,
    pub widget_kinds: Vec<WidgetKind>,
    pub evaluator_kinds: Vec<EvaluatorKind>,
    #[serde(rename = "loadMacros")]
    pub load_macros: Vec<String>,
    #[serde(rename = "includePGproblem")]
    pub include_pgproblem: Vec<String>,
    pub named_rule_refs: Vec<String>,
    pub has_answer_ctor: bool,
    pub pgml_blank_count: usize,
    pub pgml_payload_count: usize,
    pub wiring_empty: bool,
    pub reasons: Vec<Reason>,
    pub discipline: String,
    pub subjects: Vec<String>,
}

impl Record {
    pub fn types_text(&self) -> String {
        join_display(&self.types, ",")
    }

    pub fn reasons_text(&self) -> String {
        join_display(&self.reasons, "; ")
    }

    pub fn has_type(&self, problem_type: ProblemType) -> bool {
        self.types.contains(&problem_type)
    }
}

pub(crate) fn join_display<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_clamp_and_dedupe() {
        let labels = ClassificationLabels::new(
            vec![ProblemType::Multipart, ProblemType::Multipart],
            1.7,
            vec![],
        );
        assert_eq!(labels.types, vec![ProblemType::Multipart]);
        assert_eq!(labels.confidence, 1.0);
        assert_eq!(clamp_confidence(-0.2), 0.0);
        assert_eq!(clamp_confidence(f64::NAN), 0.0);
    }

    #[test]
    fn test_reason_text() {
        let record = Record {
            reasons: vec![
                Reason::new(ReasonKind::Widget, "radio"),
                Reason::new(ReasonKind::Evaluator, "cmp"),
            ],
            types: vec![ProblemType::MultipleChoice, ProblemType::Other],
            ..Default::default()
        };
        assert_eq!(record.reasons_text(), "widget:radio; evaluator:cmp");
        assert_eq!(record.types_text(), "multiple_choice,other");
    }

    #[test]
    fn test_record_json_uses_macro_field_names() {
        let record = Record {
            load_macros: vec!["PGstandard.pl".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["loadMacros"][0], "PGstandard.pl");
        assert!(json.get("includePGproblem").is_some());
        assert_eq!(json.get("needs_review_bucket"), Some(&serde_json::Value::Null));
    }
}
