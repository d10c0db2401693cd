//! Heredoc detection and neutralization.
//!
//! Detection is line based with a single active heredoc at a time: an
//! introducer (`<<`, optional `-` or `~`, then a quoted or bare terminator)
//! outside of string literals opens a body on the next line, and the first
//! line whose trimmed content equals the terminator closes it.

use super::comments::code_portion;
use super::quote::{ByteClass, QuoteScanner};
use super::source::{blank_range, from_blanked, line_spans};

/// A heredoc located in a text. Offsets index into that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heredoc {
    pub terminator: String,
    /// First byte of the body (start of the line after the introducer).
    pub body_start: usize,
    /// Start of the terminator line, or end of text when unterminated.
    pub body_end: usize,
    /// Offset just past the terminator line's newline.
    pub end: usize,
    pub terminated: bool,
}

impl Heredoc {
    pub fn body<'a>(&self, text: &'a str) -> &'a str {
        &text[self.body_start.min(text.len())..self.body_end.min(text.len())]
    }
}

/// Return the terminator of the first heredoc introduced on `line`.
pub fn scan_heredoc_terminator(line: &str) -> Option<String> {
    let bytes = line.as_bytes();
    let mut scanner = QuoteScanner::new();
    let mut i = 0;

    while i + 1 < bytes.len() {
        let class = scanner.step(bytes[i]);
        if class == ByteClass::Code && bytes[i] == b'<' && bytes[i + 1] == b'<' {
            if let Some(terminator) = read_terminator(bytes, i + 2) {
                return Some(terminator);
            }
            // `<<` without a terminator is a shift operator; skip the second `<`.
            scanner.step(bytes[i + 1]);
            i += 2;
            continue;
        }
        i += 1;
    }
    None
}

fn read_terminator(bytes: &[u8], mut j: usize) -> Option<String> {
    if j < bytes.len() && matches!(bytes[j], b'-' | b'~') {
        j += 1;
    }
    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
        j += 1;
    }
    let first = *bytes.get(j)?;

    if first == b'\'' || first == b'"' {
        let start = j + 1;
        let len = bytes[start..].iter().position(|&b| b == first)?;
        return Some(String::from_utf8_lossy(&bytes[start..start + len]).into_owned());
    }

    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let len = bytes[j..]
        .iter()
        .position(|&b| !(b.is_ascii_alphanumeric() || b == b'_'))
        .unwrap_or(bytes.len() - j);
    Some(String::from_utf8_lossy(&bytes[j..j + len]).into_owned())
}

/// Locate every heredoc in `text`, in source order.
///
/// Introducers are only recognized in the code portion of a line, so a
/// `<<TAG` inside a trailing comment does not open a body.
pub fn find_heredocs(text: &str) -> Vec<Heredoc> {
    let mut found = Vec::new();
    let mut active: Option<(String, usize)> = None;

    for (start, line) in line_spans(text) {
        let next_line = (start + line.len() + 1).min(text.len());
        match active.take() {
            None => {
                active = scan_heredoc_terminator(code_portion(line)).map(|t| (t, next_line));
            }
            Some((terminator, body_start)) if line.trim() == terminator => {
                found.push(Heredoc {
                    terminator,
                    body_start,
                    body_end: start,
                    end: next_line,
                    terminated: true,
                });
            }
            still_open => active = still_open,
        }
    }

    if let Some((terminator, body_start)) = active {
        found.push(Heredoc {
            terminator,
            body_start,
            body_end: text.len(),
            end: text.len(),
            terminated: false,
        });
    }

    found
}

/// Blank heredoc bodies and terminator lines, preserving newlines.
///
/// Later paren and brace matching never sees prose inside a heredoc.
pub fn strip_heredocs(text: &str) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for heredoc in find_heredocs(text) {
        blank_range(&mut bytes, heredoc.body_start, heredoc.end);
    }
    from_blanked(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_bare_and_quoted_terminators() {
        assert_eq!(scan_heredoc_terminator("TEXT(<<EOT);").as_deref(), Some("EOT"));
        assert_eq!(
            scan_heredoc_terminator("TEXT(<<'END_TEXT');").as_deref(),
            Some("END_TEXT")
        );
        assert_eq!(
            scan_heredoc_terminator("$t = <<~\"END_PGML\";").as_deref(),
            Some("END_PGML")
        );
        assert_eq!(scan_heredoc_terminator("$x = <<- EOT;").as_deref(), Some("EOT"));
    }

    #[test]
    fn test_shift_and_strings_are_not_heredocs() {
        assert_eq!(scan_heredoc_terminator("$x = 1 << 2;"), None);
        assert_eq!(scan_heredoc_terminator("$x <<= 2;"), None);
        assert_eq!(scan_heredoc_terminator("$s = '<<EOT';"), None);
        assert_eq!(scan_heredoc_terminator("$s = \"a <<EOT\";"), None);
    }

    #[test]
    fn test_shift_then_heredoc_on_same_line() {
        assert_eq!(
            scan_heredoc_terminator("f(1 << 2, <<EOT);").as_deref(),
            Some("EOT")
        );
    }

    #[test]
    fn test_find_heredocs_spans() {
        let text = indoc! {"
            PGML::Format(<<END_PGML);
            (( not code )))
            END_PGML
            ANS(num_cmp(1));
        "};
        let found = find_heredocs(text);
        assert_eq!(found.len(), 1);
        let heredoc = &found[0];
        assert_eq!(heredoc.terminator, "END_PGML");
        assert!(heredoc.terminated);
        assert_eq!(heredoc.body(text), "(( not code )))\n");
        assert_eq!(&text[heredoc.end..], "ANS(num_cmp(1));\n");
    }

    #[test]
    fn test_unterminated_heredoc_runs_to_end() {
        let text = "x(<<EOT);\nbody\nmore";
        let found = find_heredocs(text);
        assert_eq!(found.len(), 1);
        assert!(!found[0].terminated);
        assert_eq!(found[0].body(text), "body\nmore");
    }

    #[test]
    fn test_comment_introducer_is_ignored() {
        assert!(find_heredocs("# see <<EOT\nANS(1);\n").is_empty());
    }

    #[test]
    fn test_strip_heredocs_blanks_body_and_terminator() {
        let text = "f(<<E);\n) )\nE\ng(1);\n";
        let stripped = strip_heredocs(text);
        assert_eq!(stripped, "f(<<E);\n   \n \ng(1);\n");
    }
}
