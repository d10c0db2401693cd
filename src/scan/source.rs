//! Normalized source text and offset to line lookups.

use super::{comments, heredoc};

/// Sorted offsets of every `\n` in a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewlineIndex {
    offsets: Vec<usize>,
}

impl NewlineIndex {
    pub fn build(text: &str) -> Self {
        let offsets = text
            .bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'\n')
            .map(|(i, _)| i)
            .collect();
        Self { offsets }
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// 1-based line containing `pos`. A newline byte belongs to the line it ends.
    pub fn line_of(&self, pos: usize) -> usize {
        self.offsets.partition_point(|&offset| offset < pos) + 1
    }
}

pub fn build_newline_index(text: &str) -> NewlineIndex {
    NewlineIndex::build(text)
}

pub fn pos_to_line(newlines: &NewlineIndex, pos: usize) -> usize {
    newlines.line_of(pos)
}

/// Raw file content plus its normalized views.
///
/// `markup` has comments blanked but heredoc bodies intact; `stripped` also
/// blanks heredoc bodies. Blanking replaces bytes with spaces, so all three
/// strings share offsets and one [`NewlineIndex`].
#[derive(Debug, Clone)]
pub struct SourceText {
    raw: String,
    markup: String,
    stripped: String,
    newlines: NewlineIndex,
}

impl SourceText {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let markup = comments::strip_comments(&raw);
        let stripped = heredoc::strip_heredocs(&markup);
        let newlines = NewlineIndex::build(&stripped);
        Self {
            raw,
            markup,
            stripped,
            newlines,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Comment-free text with heredoc bodies kept; used for markup regions.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Comment- and heredoc-free text; used for every call scan.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    pub fn newlines(&self) -> &NewlineIndex {
        &self.newlines
    }

    pub fn line_of(&self, pos: usize) -> usize {
        self.newlines.line_of(pos)
    }
}

/// Iterate `(start_offset, line)` pairs; `line` excludes the trailing `\n`.
pub(crate) fn line_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut start = 0;
    text.split('\n').map(move |line| {
        let span = (start, line);
        start += line.len() + 1;
        span
    })
}

/// Replace every byte in `range` except newlines with a space.
pub(crate) fn blank_range(bytes: &mut [u8], start: usize, end: usize) {
    let end = end.min(bytes.len());
    for b in bytes.iter_mut().take(end).skip(start) {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

/// Rebuild a `String` after blanking. Blanking only touches whole runs of
/// bytes between ASCII delimiters, so the result stays valid UTF-8.
pub(crate) fn from_blanked(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
