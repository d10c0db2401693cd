//! End-of-line comment removal.

use super::heredoc;
use super::quote::{ByteClass, QuoteScanner};
use super::source::{blank_range, from_blanked, line_spans};

const COMMENT_START: u8 = b'#';

/// Offset of the comment introducer in a single line, if any.
///
/// Quote state starts fresh on every line. A `#` directly after `$` is the
/// last-index sigil (`$#array`), not a comment.
pub(crate) fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut scanner = QuoteScanner::new();

    for (i, &b) in bytes.iter().enumerate() {
        if scanner.step(b) != ByteClass::Code || b != COMMENT_START {
            continue;
        }
        if i > 0 && bytes[i - 1] == b'$' {
            continue;
        }
        return Some(i);
    }
    None
}

/// The part of a line that is code, i.e. everything before its comment.
pub(crate) fn code_portion(line: &str) -> &str {
    match comment_start(line) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Blank trailing comments, keeping quoted `#` and heredoc bodies intact.
///
/// Comment bytes become spaces so line numbers and offsets are unchanged.
/// Applying this twice yields the same text as applying it once.
pub fn strip_comments(text: &str) -> String {
    let heredocs = heredoc::find_heredocs(text);
    let mut bytes = text.as_bytes().to_vec();
    let mut next_heredoc = heredocs.iter().peekable();

    for (start, line) in line_spans(text) {
        while next_heredoc.peek().is_some_and(|h| h.end <= start) {
            next_heredoc.next();
        }
        if next_heredoc
            .peek()
            .is_some_and(|h| h.body_start <= start && start < h.end)
        {
            continue;
        }
        if let Some(pos) = comment_start(line) {
            blank_range(&mut bytes, start + pos, start + line.len());
        }
    }

    from_blanked(bytes)
}
