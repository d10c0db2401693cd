use std::collections::HashMap;
use std::fmt::Write as _;

use super::review::ReviewEntry;

pub const NEEDS_REVIEW_HEADER: &str = "file\tconfidence\ttypes\treasons";

/// Two-column count table sorted by descending count, then ascending key.
pub fn render_counts_tsv(counts: &HashMap<String, usize>, key_name: &str) -> String {
    let mut rows: Vec<(&String, &usize)> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut out = format!("{key_name}\tcount\n");
    for (key, count) in rows {
        let _ = writeln!(out, "{key}\t{count}");
    }
    out
}

/// Needs-review rows, already in output order.
pub fn render_needs_review_tsv(entries: &[ReviewEntry]) -> String {
    let mut out = format!("{NEEDS_REVIEW_HEADER}\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "{}\t{:.2}\t{}\t{}",
            entry.file, entry.confidence, entry.types, entry.reasons
        );
    }
    out
}
