//! Rule-based classification of a structural report.
//!
//! Rule families run in priority order. Each family that fires adds a type
//! tag and a reason; the first one to fire is the dominant family and sets
//! the base confidence. Adjustments then move the confidence up when
//! independent signals agree and down when the structure looks inconsistent.

use crate::extract::Registry;
use crate::model::{
    ClassificationLabels, EvaluatorKind, EvaluatorSource, ProblemType, Reason, ReasonKind,
    StructuralReport, WidgetKind,
};

pub const BASE_MULTIPLE_CHOICE: f64 = 0.55;
pub const BASE_ORDERING: f64 = 0.6;
pub const BASE_MULTIPART: f64 = 0.7;
pub const BASE_NUMERIC: f64 = 0.5;
pub const BASE_NUMERIC_DEFAULT: f64 = 0.4;
pub const BASE_FIB_WORD: f64 = 0.55;
pub const BASE_UNKNOWN_PGML_BLANK: f64 = 0.3;
pub const BASE_OTHER: f64 = 0.2;

const BONUS_MULTIPLE_CHOICE: f64 = 0.03;
const BONUS_ORDERING: f64 = 0.05;
const BONUS_MULTIPART: f64 = 0.05;
const BONUS_NUMERIC: f64 = 0.1;
const BONUS_FIB_WORD: f64 = 0.1;

const PENALTY_WIRING_EMPTY: f64 = 0.15;
const PENALTY_COUNT_MISMATCH: f64 = 0.1;
const PENALTY_PAYLOAD_ONLY: f64 = 0.1;

const CHOICE_EVALUATORS: &[EvaluatorKind] = &[
    EvaluatorKind::Cmp,
    EvaluatorKind::RadioCmp,
    EvaluatorKind::CheckboxCmp,
    EvaluatorKind::PopupCmp,
    EvaluatorKind::StrCmp,
];
const ORDERING_EVALUATORS: &[EvaluatorKind] =
    &[EvaluatorKind::Cmp, EvaluatorKind::StrCmp, EvaluatorKind::Custom];
const NUMERIC_EVALUATORS: &[EvaluatorKind] = &[
    EvaluatorKind::Cmp,
    EvaluatorKind::NumCmp,
    EvaluatorKind::FunCmp,
    EvaluatorKind::FormulaCmp,
    EvaluatorKind::NamedRule,
    EvaluatorKind::Custom,
];
const SPECIFIC_NUMERIC_EVALUATORS: &[EvaluatorKind] = &[
    EvaluatorKind::NumCmp,
    EvaluatorKind::FunCmp,
    EvaluatorKind::FormulaCmp,
];

/// Facts derived once from the report and shared by every rule.
struct Signals<'a> {
    report: &'a StructuralReport,
    input_count: usize,
    blank_count: usize,
    pgml_blank_count: usize,
    has_choice: bool,
    has_ordering: bool,
    recognized_evaluators: usize,
    payload_only: bool,
    multi_answer_single: bool,
}

impl<'a> Signals<'a> {
    fn new(report: &'a StructuralReport) -> Self {
        let widgets = &report.widgets;
        let evaluators = &report.evaluators;
        Self {
            report,
            input_count: report.input_count(),
            blank_count: widgets.iter().filter(|w| w.kind.is_blank()).count(),
            pgml_blank_count: widgets
                .iter()
                .filter(|w| w.kind == WidgetKind::PgmlBlank)
                .count(),
            has_choice: widgets.iter().any(|w| w.kind.is_choice()),
            has_ordering: widgets.iter().any(|w| w.kind == WidgetKind::Ordering),
            recognized_evaluators: evaluators.iter().filter(|e| e.kind.is_recognized()).count(),
            payload_only: !evaluators.is_empty()
                && evaluators
                    .iter()
                    .all(|e| e.source == EvaluatorSource::PgmlPayload),
            multi_answer_single: report.answers.has_multi_answer && evaluators.len() == 1,
        }
    }

    /// Any recognized comparator other than a string compare, which is left
    /// for the fill-in-word rule.
    fn has_default_evaluator(&self) -> bool {
        self.report
            .evaluators
            .iter()
            .any(|e| e.kind.is_recognized() && e.kind != EvaluatorKind::StrCmp)
    }

    fn evaluator_count(&self) -> usize {
        self.report.evaluators.len()
    }

    fn has_evaluator(&self, kinds: &[EvaluatorKind]) -> bool {
        self.report.evaluators.iter().any(|e| kinds.contains(&e.kind))
    }

    /// Whether some widget matching `widget_pred` is wired to an evaluator of
    /// one of `kinds`.
    fn wired_with(&self, widget_pred: impl Fn(WidgetKind) -> bool, kinds: &[EvaluatorKind]) -> bool {
        self.report.wiring.entries.iter().any(|entry| {
            let widget = &self.report.widgets[entry.widget];
            let evaluator = &self.report.evaluators[entry.evaluator];
            widget_pred(widget.kind) && kinds.contains(&evaluator.kind)
        })
    }

    fn all_blanks_wired(&self) -> bool {
        self.report
            .widgets
            .iter()
            .enumerate()
            .filter(|(_, w)| w.kind.is_blank())
            .all(|(i, _)| self.report.wiring.is_wired(i))
    }
}

#[derive(Default)]
struct Scoring {
    types: Vec<ProblemType>,
    reasons: Vec<Reason>,
    dominant: Option<ProblemType>,
    confidence: f64,
}

impl Scoring {
    fn reason(&mut self, kind: ReasonKind, value: impl Into<String>) {
        self.reasons.push(Reason::new(kind, value));
    }

    fn tag(&mut self, problem_type: ProblemType, base: f64, rule: &str) {
        if !self.types.contains(&problem_type) {
            self.types.push(problem_type);
        }
        self.reason(ReasonKind::Rule, rule);
        if self.dominant.is_none() {
            self.dominant = Some(problem_type);
            self.confidence = base;
        }
    }

    fn adjust(&mut self, delta: f64, label: &str) {
        self.confidence += delta;
        let sign = if delta >= 0.0 { '+' } else { '-' };
        self.reason(ReasonKind::Adjust, format!("{label}{sign}{:.2}", delta.abs()));
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    corroborating_macros: Vec<&'static str>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&Registry::default())
    }
}

impl Classifier {
    pub fn new(registry: &Registry) -> Self {
        Self {
            corroborating_macros: registry.corroborating_macros.clone(),
        }
    }

    pub fn classify(&self, report: &StructuralReport) -> ClassificationLabels {
        let signals = Signals::new(report);
        let mut scoring = Scoring::default();

        self.describe(&signals, &mut scoring);
        apply_rules(&signals, &mut scoring);
        apply_adjustments(&signals, &mut scoring);

        ClassificationLabels::new(
            scoring.types,
            round_confidence(scoring.confidence),
            scoring.reasons,
        )
    }

    fn describe(&self, signals: &Signals<'_>, scoring: &mut Scoring) {
        let report = signals.report;

        for (kind, count) in count_in_order(report.widgets.iter().map(|w| w.kind)) {
            scoring.reason(ReasonKind::Widget, with_count(kind.as_str(), count));
        }
        for (kind, count) in count_in_order(report.evaluators.iter().map(|e| e.kind)) {
            scoring.reason(ReasonKind::Evaluator, with_count(kind.as_str(), count));
        }

        if signals.input_count > 0 || signals.evaluator_count() > 0 {
            let wiring = if report.wiring.is_empty() {
                "empty".to_string()
            } else {
                format!("{}/{}", report.wiring.len(), signals.input_count)
            };
            scoring.reason(ReasonKind::Wiring, wiring);
        }

        if report.pgml.blank_count > 0 {
            scoring.reason(ReasonKind::Pgml, format!("blanks={}", report.pgml.blank_count));
        }
        if report.pgml.payload_count > 0 {
            scoring.reason(ReasonKind::Pgml, format!("payloads={}", report.pgml.payload_count));
        }

        for name in report
            .macros
            .load_macros
            .iter()
            .filter(|m| self.corroborating_macros.contains(&m.as_str()))
        {
            scoring.reason(ReasonKind::Macro, name.as_str());
        }
    }
}

/// Classify with the default registry.
pub fn classify(report: &StructuralReport) -> ClassificationLabels {
    Classifier::default().classify(report)
}

fn apply_rules(signals: &Signals<'_>, scoring: &mut Scoring) {
    if signals.has_choice && signals.has_evaluator(CHOICE_EVALUATORS) {
        scoring.tag(
            ProblemType::MultipleChoice,
            BASE_MULTIPLE_CHOICE,
            "multiple_choice",
        );
    }

    if signals.has_ordering && signals.has_evaluator(ORDERING_EVALUATORS) {
        scoring.tag(ProblemType::Ordering, BASE_ORDERING, "ordering");
    }

    if signals.blank_count >= 2 && signals.evaluator_count() >= 1 {
        scoring.tag(ProblemType::Multipart, BASE_MULTIPART, "multipart");
    } else if signals.multi_answer_single {
        scoring.tag(ProblemType::Multipart, BASE_MULTIPART, "multipart_multi_answer");
    }

    if signals.blank_count >= 1 && signals.has_evaluator(NUMERIC_EVALUATORS) {
        scoring.tag(ProblemType::NumericEntry, BASE_NUMERIC, "numeric_entry");
    } else if scoring.types.is_empty() && signals.has_default_evaluator() {
        scoring.tag(
            ProblemType::NumericEntry,
            BASE_NUMERIC_DEFAULT,
            "numeric_entry_default",
        );
    }

    if signals.has_evaluator(&[EvaluatorKind::StrCmp]) && !signals.has_choice && !signals.has_ordering
    {
        scoring.tag(ProblemType::FibWord, BASE_FIB_WORD, "fib_word");
    }

    if signals.pgml_blank_count > 0 && signals.recognized_evaluators == 0 {
        scoring.tag(
            ProblemType::UnknownPgmlBlank,
            BASE_UNKNOWN_PGML_BLANK,
            "unknown_pgml_blank",
        );
    }

    if scoring.types.is_empty() {
        scoring.tag(ProblemType::Other, BASE_OTHER, "other");
    }
}

fn apply_adjustments(signals: &Signals<'_>, scoring: &mut Scoring) {
    let agreement = match scoring.dominant {
        Some(ProblemType::MultipleChoice) => signals
            .wired_with(|k| k.is_choice(), CHOICE_EVALUATORS)
            .then_some(BONUS_MULTIPLE_CHOICE),
        Some(ProblemType::Ordering) => signals
            .wired_with(|k| k == WidgetKind::Ordering, ORDERING_EVALUATORS)
            .then_some(BONUS_ORDERING),
        Some(ProblemType::Multipart) => (signals.blank_count == signals.evaluator_count()
            && signals.all_blanks_wired())
        .then_some(BONUS_MULTIPART),
        Some(ProblemType::NumericEntry) => signals
            .wired_with(|k| k.is_blank(), SPECIFIC_NUMERIC_EVALUATORS)
            .then_some(BONUS_NUMERIC),
        Some(ProblemType::FibWord) => signals
            .wired_with(|k| k.is_blank(), &[EvaluatorKind::StrCmp])
            .then_some(BONUS_FIB_WORD),
        _ => None,
    };
    if let Some(bonus) = agreement {
        scoring.adjust(bonus, "agreement");
    }

    if signals.evaluator_count() >= 2 && signals.report.wiring.is_empty() {
        scoring.adjust(-PENALTY_WIRING_EMPTY, "wiring_empty");
    }

    if signals.input_count > 0
        && signals.evaluator_count() > 0
        && signals.input_count != signals.evaluator_count()
        && !signals.multi_answer_single
    {
        scoring.adjust(-PENALTY_COUNT_MISMATCH, "count_mismatch");
    }

    if signals.payload_only {
        scoring.adjust(-PENALTY_PAYLOAD_ONLY, "payload_only");
    }
}

/// Round to two decimals so summed adjustments land on exact bin edges.
fn round_confidence(confidence: f64) -> f64 {
    (confidence * 100.0).round() / 100.0
}

/// Count occurrences, keeping first-seen order.
fn count_in_order<T: PartialEq + Copy>(items: impl Iterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| *seen == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }
    counts
}

fn with_count(label: &str, count: usize) -> String {
    if count > 1 {
        format!("{label}x{count}")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::confidence_bin;
    use crate::model::{Answers, Evaluator, PgmlInfo, Widget};
    use crate::wiring::wire;

    fn report(widgets: &[WidgetKind], evaluators: &[(EvaluatorKind, EvaluatorSource)]) -> StructuralReport {
        let widgets: Vec<Widget> = widgets
            .iter()
            .enumerate()
            .map(|(i, kind)| Widget {
                kind: *kind,
                source: kind.as_str().to_string(),
                line: i + 1,
                ordinal: i,
                name: None,
                offset: i,
            })
            .collect();
        let evaluators: Vec<Evaluator> = evaluators
            .iter()
            .enumerate()
            .map(|(i, (kind, source))| Evaluator {
                kind: *kind,
                expr: kind.as_str().to_string(),
                vars: vec![],
                line: 100 + i,
                source: *source,
                rule_name: None,
                offset: 100 + i,
            })
            .collect();
        let wiring = wire(&widgets, &evaluators);
        let pgml_blanks = widgets
            .iter()
            .filter(|w| w.kind == WidgetKind::PgmlBlank)
            .count();
        StructuralReport {
            widgets,
            evaluators,
            wiring,
            pgml: PgmlInfo {
                blank_count: pgml_blanks,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    const ANS: EvaluatorSource = EvaluatorSource::AnsCall;
    const PAYLOAD: EvaluatorSource = EvaluatorSource::PgmlPayload;

    #[test]
    fn test_numeric_entry_with_generic_cmp() {
        let labels = classify(&report(&[WidgetKind::Blank], &[(EvaluatorKind::Cmp, ANS)]));
        assert_eq!(labels.types, vec![ProblemType::NumericEntry]);
        assert!((labels.confidence - BASE_NUMERIC).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_entry_agreement_bonus() {
        let labels = classify(&report(&[WidgetKind::Blank], &[(EvaluatorKind::NumCmp, ANS)]));
        assert!((labels.confidence - 0.6).abs() < 1e-9);
        assert_eq!(
            labels.reasons.last().map(|r| r.to_string()).as_deref(),
            Some("adjust:agreement+0.10")
        );
    }

    #[test]
    fn test_multiple_choice_dominates() {
        let labels = classify(&report(&[WidgetKind::Radio], &[(EvaluatorKind::Cmp, ANS)]));
        assert_eq!(labels.types, vec![ProblemType::MultipleChoice]);
        assert!(labels.confidence >= 0.55 && labels.confidence < 0.6);
    }

    #[test]
    fn test_multipart_also_tags_numeric() {
        let labels = classify(&report(
            &[WidgetKind::Blank, WidgetKind::Blank],
            &[(EvaluatorKind::Cmp, ANS), (EvaluatorKind::Cmp, ANS)],
        ));
        assert_eq!(
            labels.types,
            vec![ProblemType::Multipart, ProblemType::NumericEntry]
        );
        assert!((labels.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_multi_answer_single_evaluator_is_multipart() {
        let mut r = report(&[], &[(EvaluatorKind::Cmp, ANS)]);
        r.answers = Answers {
            ctors: vec![],
            has_multi_answer: true,
        };
        let labels = classify(&r);
        assert_eq!(labels.types, vec![ProblemType::Multipart]);
    }

    #[test]
    fn test_default_numeric_without_widgets_and_wiring_penalty() {
        let labels = classify(&report(
            &[],
            &[(EvaluatorKind::NumCmp, ANS), (EvaluatorKind::NumCmp, ANS)],
        ));
        assert_eq!(labels.types, vec![ProblemType::NumericEntry]);
        assert!((labels.confidence - 0.25).abs() < 1e-9);
        let text: Vec<String> = labels.reasons.iter().map(|r| r.to_string()).collect();
        assert!(text.contains(&"wiring:empty".to_string()));
        assert!(text.contains(&"adjust:wiring_empty-0.15".to_string()));
    }

    #[test]
    fn test_string_compare_is_fib_word() {
        let labels = classify(&report(&[], &[(EvaluatorKind::StrCmp, ANS)]));
        assert_eq!(labels.types, vec![ProblemType::FibWord]);
    }

    #[test]
    fn test_unknown_pgml_blank_and_payload_penalty() {
        let labels = classify(&report(
            &[WidgetKind::PgmlBlank],
            &[(EvaluatorKind::Other, PAYLOAD)],
        ));
        assert_eq!(labels.types, vec![ProblemType::UnknownPgmlBlank]);
        assert!((labels.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_recognized_is_other() {
        let labels = classify(&StructuralReport::default());
        assert_eq!(labels.types, vec![ProblemType::Other]);
        assert!(labels.confidence <= 0.3);
        assert_eq!(labels.reasons, vec![Reason::new(ReasonKind::Rule, "other")]);
    }

    #[test]
    fn test_count_mismatch_penalty() {
        let labels = classify(&report(
            &[WidgetKind::Blank, WidgetKind::Blank, WidgetKind::Blank],
            &[(EvaluatorKind::Cmp, ANS), (EvaluatorKind::Cmp, ANS)],
        ));
        assert!((labels.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_choice_comparator_alone_defaults_to_numeric() {
        for kind in [
            EvaluatorKind::RadioCmp,
            EvaluatorKind::PopupCmp,
            EvaluatorKind::CheckboxCmp,
        ] {
            let labels = classify(&report(&[], &[(kind, ANS)]));
            assert_eq!(labels.types, vec![ProblemType::NumericEntry], "{kind:?}");
            assert_eq!(labels.confidence, BASE_NUMERIC_DEFAULT);
        }
    }

    #[test]
    fn test_adjusted_confidence_lands_on_bin_edge() {
        let labels = classify(&report(
            &[WidgetKind::Blank, WidgetKind::Blank, WidgetKind::Blank],
            &[(EvaluatorKind::Cmp, ANS), (EvaluatorKind::Cmp, ANS)],
        ));
        assert_eq!(labels.confidence, 0.6);
        assert_eq!(confidence_bin(labels.confidence), "0.6-0.7");

        assert_eq!(round_confidence(0.6 - 0.1 - 0.1), 0.4);
        assert_eq!(confidence_bin(round_confidence(0.6 - 0.1 - 0.1)), "0.4-0.5");
    }

    #[test]
    fn test_reasons_are_deterministic() {
        let r = report(
            &[WidgetKind::Blank, WidgetKind::Radio, WidgetKind::Blank],
            &[(EvaluatorKind::Cmp, ANS), (EvaluatorKind::NumCmp, ANS)],
        );
        assert_eq!(classify(&r), classify(&r));
        let first: Vec<String> = classify(&r).reasons.iter().map(|x| x.to_string()).collect();
        assert_eq!(first[0], "widget:blankx2");
        assert_eq!(first[1], "widget:radio");
    }
}
