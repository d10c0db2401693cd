//! Answer-evaluator extraction.
//!
//! Evaluators come from explicit `ANS(...)` calls and from payloads attached
//! to markup blanks (`[_]{...}`). Both are classified by the same ordered
//! recognizer list; the first recognizer that matches wins.

use once_cell::sync::Lazy;
use regex::Regex;

use super::pgml;
use super::registry::Registry;
use crate::model::{Evaluator, EvaluatorKind, EvaluatorSource};
use crate::scan::{iter_calls, SourceText};

static VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([A-Za-z_]\w*)").expect("valid variable pattern"));

static NAMED_RULE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bnamed_ans_rule\s*\(\s*['"]([^'"]+)['"]"#).expect("valid named rule pattern")
});

/// Ordered recognizers; `->cmp(` is checked before these.
static RECOGNIZERS: Lazy<Vec<(Regex, EvaluatorKind)>> = Lazy::new(|| {
    [
        (r"\bnamed_ans_rule\s*\(", EvaluatorKind::NamedRule),
        (r"\bradio_cmp\s*\(", EvaluatorKind::RadioCmp),
        (r"\bcheckbox_cmp\s*\(", EvaluatorKind::CheckboxCmp),
        (r"\bpopup_cmp\s*\(", EvaluatorKind::PopupCmp),
        (r"\bnum_cmp\s*\(", EvaluatorKind::NumCmp),
        (r"\bfun_cmp\s*\(", EvaluatorKind::FunCmp),
        (r"\bformula_cmp\s*\(", EvaluatorKind::FormulaCmp),
        (r"\b(?:str_cmp|string_cmp)\s*\(", EvaluatorKind::StrCmp),
        (r"\bchecker\s*=>\s*sub\s*\{", EvaluatorKind::Custom),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(pattern).expect("valid recognizer pattern"), kind))
    .collect()
});

/// Classify a whitespace-normalized evaluator expression.
pub fn classify_expr(expr: &str) -> EvaluatorKind {
    if expr.contains("->cmp(") {
        return EvaluatorKind::Cmp;
    }
    RECOGNIZERS
        .iter()
        .find(|(pattern, _)| pattern.is_match(expr))
        .map(|(_, kind)| *kind)
        .unwrap_or(EvaluatorKind::Other)
}

/// Collapse every whitespace run to one space and trim.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `$variables` referenced in `expr`, unique, first-seen order.
pub fn extract_vars(expr: &str) -> Vec<String> {
    let mut vars: Vec<String> = Vec::new();
    for caps in VAR.captures_iter(expr) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !vars.iter().any(|v| v == name) {
                vars.push(name.to_string());
            }
        }
    }
    vars
}

fn build(raw: &str, line: usize, offset: usize, source: EvaluatorSource) -> Evaluator {
    let expr = normalize_ws(raw);
    let kind = classify_expr(&expr);
    let rule_name = (kind == EvaluatorKind::NamedRule)
        .then(|| {
            NAMED_RULE_REF
                .captures(&expr)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        })
        .flatten();
    Evaluator {
        kind,
        vars: extract_vars(&expr),
        expr,
        line,
        source,
        rule_name,
        offset,
    }
}

/// Evaluators from explicit evaluator calls.
pub fn extract_ans_calls(source: &SourceText, registry: &Registry) -> Vec<Evaluator> {
    iter_calls(source.stripped(), &registry.evaluator_calls, source.newlines())
        .map(|call| build(&call.arg_text, call.line, call.offset, EvaluatorSource::AnsCall))
        .collect()
}

/// Evaluators embedded as markup blank payloads.
pub fn extract_pgml_payload_evaluators(source: &SourceText) -> Vec<Evaluator> {
    let markup = source.markup();
    let regions = pgml::pgml_regions(markup);
    pgml::blank_payloads(markup, &regions)
        .into_iter()
        .map(|payload| {
            build(
                &payload.text,
                source.line_of(payload.offset),
                payload.offset,
                EvaluatorSource::PgmlPayload,
            )
        })
        .collect()
}

/// All evaluators in source order.
pub fn extract_evaluators(source: &SourceText, registry: &Registry) -> Vec<Evaluator> {
    let mut evaluators = extract_ans_calls(source, registry);
    evaluators.extend(extract_pgml_payload_evaluators(source));
    evaluators.sort_by_key(|e| e.offset);
    evaluators
}
