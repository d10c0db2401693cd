//! Property tests over arbitrary source fragments.

use pg_analyze::analyze_text;
use pg_analyze::extract::{extract_macros, Registry};
use pg_analyze::scan::{strip_comments, SourceText};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "ANS(", "num_cmp(1)", "$a->cmp()", ")", "(", "'", "\"", "#", "\\", ";", " ", "\n", "{", "}",
    "$x", "$#x", "ans_rule(20)", "NAMED_ANS_RULE('ans1')", "RadioButtons([\"A\"],\"A\")",
    "<<EOF", "EOF\n", "<<'END'", "END\n", "BEGIN_PGML\n", "END_PGML\n", "[_]", "[__]{$a}",
    "loadMacros(\"PGstandard.pl\"", "## DBsubject('Calculus')\n",
];

fn source_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..60).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn strip_comments_is_idempotent(text in "[a-z0-9$#'\"();= \\\\\n]{0,120}") {
        let once = strip_comments(&text);
        prop_assert_eq!(strip_comments(&once), once.clone());
        prop_assert_eq!(once.len(), text.len());
        prop_assert_eq!(once.matches('\n').count(), text.matches('\n').count());
    }

    #[test]
    fn analysis_is_total(text in source_text()) {
        let record = analyze_text("fuzz.pg", &text);
        prop_assert!(!record.types.is_empty());
        prop_assert!((0.0..=1.0).contains(&record.confidence));
        prop_assert_eq!(record.ans_count, record.evaluator_kinds.len());
        prop_assert_eq!(record.needs_review, record.needs_review_bucket.is_some());
    }

    #[test]
    fn load_macros_round_trip(
        names in prop::collection::vec("[a-d][a-z0-9]{0,3}", 1..12),
        per_call in 1usize..4,
    ) {
        let files: Vec<String> = names.iter().map(|n| format!("{n}.pl")).collect();
        let text: String = files
            .chunks(per_call)
            .map(|chunk| {
                let args: Vec<String> = chunk.iter().map(|f| format!("\"{f}\"")).collect();
                format!("loadMacros({});\n", args.join(", "))
            })
            .collect();

        let mut expected: Vec<String> = Vec::new();
        for file in &files {
            if !expected.contains(file) {
                expected.push(file.clone());
            }
        }

        let source = SourceText::new(text);
        let macros = extract_macros(source.stripped(), source.newlines(), &Registry::default());
        prop_assert_eq!(macros.load_macros, expected);
    }
}
