//! Embedded markup (PGML) regions, blanks and blank payloads.
//!
//! Regions come from `BEGIN_PGML`/`END_PGML` directive pairs (plus the
//! `_HINT` and `_SOLUTION` variants) and from heredocs whose terminator
//! contains `PGML`. Directive pairs use a stack; an `END` that does not match
//! the innermost open directive is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{PgmlBlock, PgmlBlockKind, PgmlInfo};
use crate::scan::{find_heredocs, find_matching_brace, NewlineIndex};

static DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(BEGIN|END)_PGML(?:_(SOLUTION|HINT))?\b").expect("valid directive pattern")
});
static BLANK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[ \t]*_+[ \t]*\]").expect("valid blank pattern"));
static BLANK_WITH_PAYLOAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[ \t]*_+[ \t]*\][ \t]*\{").expect("valid payload pattern"));

const HEREDOC_MARKER: &str = "PGML";

/// A markup region. `body_*` spans the markup content; `block_*` spans the
/// whole block including directive lines, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub kind: PgmlBlockKind,
    pub body_start: usize,
    pub body_end: usize,
    pub block_start: usize,
    pub block_end: usize,
}

impl Region {
    pub fn body<'a>(&self, text: &'a str) -> &'a str {
        &text[self.body_start..self.body_end]
    }

    pub fn block<'a>(&self, text: &'a str) -> &'a str {
        &text[self.block_start..self.block_end]
    }
}

/// A brace-delimited payload following a blank, e.g. `[_]{$a->cmp()}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub text: String,
    /// Offset of the first payload byte in the full text.
    pub offset: usize,
}

/// All markup regions in source order, with nested duplicates removed.
pub fn pgml_regions(markup: &str) -> Vec<Region> {
    let mut regions = directive_regions(markup);
    regions.extend(heredoc_regions(markup));
    dedupe_regions(regions)
}

fn directive_regions(text: &str) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut stack: Vec<(PgmlBlockKind, usize, usize)> = Vec::new();

    for caps in DIRECTIVE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let kind = match caps.get(2).map(|m| m.as_str()) {
            Some("HINT") => PgmlBlockKind::BeginPgmlHint,
            Some("SOLUTION") => PgmlBlockKind::BeginPgmlSolution,
            _ => PgmlBlockKind::BeginPgml,
        };

        if caps.get(1).map(|m| m.as_str()) == Some("BEGIN") {
            stack.push((kind, whole.end(), whole.start()));
            continue;
        }

        match stack.last() {
            Some(&(open_kind, body_start, block_start)) if open_kind == kind => {
                stack.pop();
                if body_start < whole.start() {
                    regions.push(Region {
                        kind,
                        body_start,
                        body_end: whole.start(),
                        block_start,
                        block_end: line_end(text, whole.end()),
                    });
                }
            }
            _ => log::trace!("ignoring unmatched {} at offset {}", whole.as_str().trim(), whole.start()),
        }
    }

    regions
}

fn heredoc_regions(text: &str) -> Vec<Region> {
    find_heredocs(text)
        .into_iter()
        .filter(|h| h.terminator.contains(HEREDOC_MARKER) && h.body_start < h.body_end)
        .map(|h| Region {
            kind: PgmlBlockKind::HeredocPgml,
            body_start: h.body_start,
            body_end: h.body_end,
            block_start: h.body_start,
            block_end: h.body_end,
        })
        .collect()
}

/// Drop regions contained in an earlier one and clip partial overlaps, so
/// every byte of markup is counted at most once.
fn dedupe_regions(mut regions: Vec<Region>) -> Vec<Region> {
    regions.sort_by(|a, b| {
        a.body_start
            .cmp(&b.body_start)
            .then(b.body_end.cmp(&a.body_end))
    });

    let mut kept: Vec<Region> = Vec::with_capacity(regions.len());
    let mut covered_until = 0;
    for mut region in regions {
        if region.body_end <= covered_until {
            continue;
        }
        region.body_start = region.body_start.max(covered_until);
        covered_until = region.body_end;
        kept.push(region);
    }
    kept
}

fn line_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .find('\n')
        .map(|i| pos + i + 1)
        .unwrap_or(text.len())
}

/// Offsets of every blank marker inside `regions`.
pub fn blank_offsets(markup: &str, regions: &[Region]) -> Vec<usize> {
    regions
        .iter()
        .flat_map(|region| {
            BLANK
                .find_iter(region.body(markup))
                .map(move |m| region.body_start + m.start())
        })
        .collect()
}

/// Brace payloads attached to blanks inside `regions`.
///
/// A payload whose braces do not balance within its region is skipped.
pub fn blank_payloads(markup: &str, regions: &[Region]) -> Vec<Payload> {
    let mut payloads = Vec::new();

    for region in regions {
        let body = region.body(markup);
        let mut from = 0;
        while let Some(m) = BLANK_WITH_PAYLOAD.find_at(body, from) {
            let open = m.end() - 1;
            let close = find_matching_brace(body, open);
            if close == open {
                from = m.end();
                continue;
            }
            payloads.push(Payload {
                text: body[open + 1..close].to_string(),
                offset: region.body_start + open + 1,
            });
            from = close + 1;
        }
    }

    payloads
}

/// Markup blocks with per-block blank statistics, for diagnostics.
pub fn extract_pgml_blocks(markup: &str, newlines: &NewlineIndex) -> Vec<PgmlBlock> {
    pgml_regions(markup)
        .iter()
        .map(|region| block_info(markup, region, newlines))
        .collect()
}

fn block_info(markup: &str, region: &Region, newlines: &NewlineIndex) -> PgmlBlock {
    let text = region.block(markup);
    PgmlBlock {
        kind: region.kind,
        start_line: newlines.line_of(region.block_start),
        blank_marker_count: BLANK.find_iter(text).count(),
        has_payload: BLANK_WITH_PAYLOAD.is_match(text),
        text: text.to_string(),
    }
}

/// Blocks plus file-level blank and payload counts.
pub fn pgml_info(markup: &str, newlines: &NewlineIndex) -> PgmlInfo {
    let regions = pgml_regions(markup);
    PgmlInfo {
        blocks: regions
            .iter()
            .map(|region| block_info(markup, region, newlines))
            .collect(),
        blank_count: blank_offsets(markup, &regions).len(),
        payload_count: blank_payloads(markup, &regions).len(),
    }
}
