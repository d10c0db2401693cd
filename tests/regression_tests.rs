//! Regression cases for per-file records built from small PG snippets.

use indoc::indoc;
use pg_analyze::{analyze_text, EvaluatorKind, ProblemType, Record, ReviewBucket, WidgetKind};
use pretty_assertions::assert_eq;

fn record(label: &str, text: &str) -> Record {
    analyze_text(&format!("{label}.pg"), text)
}

#[test]
fn test_comment_marker_inside_strings() {
    let r = record(
        "hash_in_strings",
        indoc! {r##"
            $x = '# not a comment'; # comment
            $y = "# not a comment"; # comment
            ANS(num_cmp(1));
        "##},
    );
    assert_eq!(r.ans_count, 1);
}

#[test]
fn test_heredoc_body_parentheses() {
    let r = record(
        "heredoc_body_parentheses",
        "PGML::Format(<<END_PGML);\n(( not code ))) # keep\nEND_PGML\nANS(num_cmp(1));\n",
    );
    assert_eq!(r.ans_count, 1);
}

#[test]
fn test_heredoc_inside_call_arguments() {
    let r = record(
        "heredoc_body_parens_in_call_args",
        "loadMacros(\n  <<END_HERE,\n) ) ) # not code\nEND_HERE\n  \"PGstandard.pl\",\n);\n",
    );
    assert!(r.load_macros.contains(&"PGstandard.pl".to_string()));
}

#[test]
fn test_load_macros_mixed_quotes_and_whitespace() {
    let r = record(
        "loadmacros_mixed_quotes_whitespace",
        indoc! {r#"
            loadMacros(  "PGstandard.pl" ,
              'MathObjects.pl' ,  "parserRadioButtons.pl"  );
            ANS(num_cmp(1));
        "#},
    );
    assert_eq!(
        r.load_macros,
        vec!["PGstandard.pl", "MathObjects.pl", "parserRadioButtons.pl"]
    );
}

#[test]
fn test_answer_call_across_lines() {
    let r = record("ans_multiline", "ANS(\n  num_cmp(\n    3\n  )\n);\n");
    assert_eq!(r.ans_count, 1);
    assert_eq!(r.evaluator_kinds, vec![EvaluatorKind::NumCmp]);
}

#[test]
fn test_multi_answer_with_single_evaluator_is_multipart() {
    let r = record(
        "multianswer_ctor_single_ans",
        "$ma = MultiAnswer(Real(1), Real(2));\nANS($ma->cmp());\n",
    );
    assert!(r.has_type(ProblemType::Multipart));
    assert!(r.has_answer_ctor);
}

#[test]
fn test_named_rule_reference_recorded() {
    let r = record(
        "named_ans_rule_evaluator_ref",
        "NAMED_ANS_RULE('ans1');\nANS(named_ans_rule('ans1'));\n",
    );
    assert!(r.named_rule_refs.contains(&"ans1".to_string()));
}

#[test]
fn test_markup_blanks_only() {
    let r = record("pgml_blanks_only", "BEGIN_PGML\n[_] [__]\nEND_PGML\n");
    assert_eq!(r.input_count, 2);
    assert!(r.widget_kinds.contains(&WidgetKind::PgmlBlank));
    assert_eq!(r.pgml_blank_count, 2);
    assert!(r.has_type(ProblemType::UnknownPgmlBlank));
}

#[test]
fn test_include_wrapper_has_no_evaluators() {
    let r = record("include_pgproblem_wrapper", "includePGproblem('foo/bar.pg');\n");
    assert_eq!(r.ans_count, 0);
    assert_eq!(r.include_pgproblem, vec!["foo/bar.pg"]);
}

#[test]
fn test_named_rule_wired_by_order() {
    let r = record(
        "named_ans_rule_order_wiring",
        "NAMED_ANS_RULE('ans1');\nANS(num_cmp(1));\n",
    );
    assert!(!r.wiring_empty);
}

#[test]
fn test_two_evaluators_without_widgets_need_review() {
    let r = record(
        "two_ans_no_wiring_needs_review",
        "ANS(num_cmp(1));\nANS(num_cmp(2));\n",
    );
    assert_eq!(r.ans_count, 2);
    assert!(r.needs_review);
    assert!(r.wiring_empty);
    assert_eq!(r.needs_review_bucket, Some(ReviewBucket::WiringEmpty));
}

#[test]
fn test_radio_buttons_are_multiple_choice() {
    let r = record(
        "radio_buttons_widget",
        "$rb = RadioButtons([\"A\",\"B\"],\"A\");\nANS($rb->cmp());\n",
    );
    assert!(r.has_type(ProblemType::MultipleChoice));
    assert!(r.widget_kinds.contains(&WidgetKind::Radio));
}

#[test]
fn test_sort_widget_is_ordering() {
    let r = record("ordering_widget", "$s = Sort([1,2,3]);\nANS($s->cmp());\n");
    assert!(r.has_type(ProblemType::Ordering));
    assert!(r.widget_kinds.contains(&WidgetKind::Ordering));
}

#[test]
fn test_string_compare_is_fib_word() {
    let r = record("string_cmp", "ANS(str_cmp('hi'));\n");
    assert!(r.has_type(ProblemType::FibWord));
    assert!(r.evaluator_kinds.contains(&EvaluatorKind::StrCmp));
}

#[test]
fn test_radio_compare_alone_is_numeric_default() {
    let r = record("radio_cmp_only", "ANS(radio_cmp('A'));\n");
    assert_eq!(r.types, vec![ProblemType::NumericEntry]);
    assert_eq!(r.confidence, 0.4);
    assert_eq!(r.needs_review_bucket, Some(ReviewBucket::LowConfidence));
}

#[test]
fn test_popup_compare_alone_is_numeric_default() {
    let r = record("popup_cmp_only", "ANS(popup_cmp('A'));\n");
    assert_eq!(r.types, vec![ProblemType::NumericEntry]);
    assert_eq!(r.evaluator_kinds, vec![EvaluatorKind::PopupCmp]);
}

#[test]
fn test_malformed_text_never_fails() {
    let r = record("unbalanced", "ANS(num_cmp(1);\n$x = \"open string\nBEGIN_PGML\n[_]\n");
    assert_eq!(r.file, "unbalanced.pg");
    assert!(r.confidence >= 0.0 && r.confidence <= 1.0);
}

#[test]
fn test_discipline_from_metadata() {
    let r = record(
        "tagged",
        indoc! {r#"
            ## DBsubject('Linear Algebra')
            ## DBsubject('Calculus')
            ANS(num_cmp(1));
        "#},
    );
    assert_eq!(r.discipline, "math");
    assert_eq!(r.subjects, vec!["linear algebra", "calculus"]);
}
