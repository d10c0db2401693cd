//! Call finding and balanced delimiter walking.

use super::quote::{ByteClass, QuoteScanner};
use super::source::NewlineIndex;

/// An invocation of a named function found in normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: String,
    /// Raw text strictly between the call's outer parentheses.
    pub arg_text: String,
    /// 1-based line of the name.
    pub line: usize,
    /// Byte offset of the name.
    pub offset: usize,
    /// False when the closing parenthesis was missing and the arguments were
    /// truncated at end of text.
    pub closed: bool,
}

/// Scan `text` for calls to any of `names`, in source order.
///
/// A name only matches as a whole identifier that is not a variable
/// (`$name`, `@name`, `%name`), optionally followed by whitespace and `(`.
/// Scanning resumes right after each matched name, so nested calls are found
/// too. An unclosed call takes everything up to end of text as arguments.
pub fn iter_calls<'a>(
    text: &'a str,
    names: &'a [&'a str],
    newlines: &'a NewlineIndex,
) -> CallIter<'a> {
    CallIter {
        text,
        names,
        newlines,
        pos: 0,
    }
}

pub struct CallIter<'a> {
    text: &'a str,
    names: &'a [&'a str],
    newlines: &'a NewlineIndex,
    pos: usize,
}

impl Iterator for CallIter<'_> {
    type Item = Call;

    fn next(&mut self) -> Option<Call> {
        let text = self.text;
        let bytes = text.as_bytes();

        while self.pos < bytes.len() {
            let start = self.pos;
            if !is_ident_byte(bytes[start]) {
                self.pos += 1;
                continue;
            }

            let end = start
                + bytes[start..]
                    .iter()
                    .position(|&b| !is_ident_byte(b))
                    .unwrap_or(bytes.len() - start);
            self.pos = end;

            if bytes[start].is_ascii_digit() || is_sigil(start.checked_sub(1).map(|i| bytes[i])) {
                continue;
            }
            let ident = &text[start..end];
            if !self.names.contains(&ident) {
                continue;
            }

            let open = end
                + bytes[end..]
                    .iter()
                    .position(|b| !b.is_ascii_whitespace())
                    .unwrap_or(bytes.len() - end);
            if bytes.get(open) != Some(&b'(') {
                continue;
            }

            let close = find_closing(bytes, open, b'(', b')');
            let arg_end = close.unwrap_or(bytes.len());
            return Some(Call {
                name: ident.to_string(),
                arg_text: text[open + 1..arg_end].to_string(),
                line: self.newlines.line_of(start),
                offset: start,
                closed: close.is_some(),
            });
        }
        None
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_sigil(prev: Option<u8>) -> bool {
    matches!(prev, Some(b'$' | b'@' | b'%'))
}

/// Walk from `open` (which must hold `open_byte`) to its matching `close_byte`,
/// skipping quoted runs and escaped bytes.
fn find_closing(bytes: &[u8], open: usize, open_byte: u8, close_byte: u8) -> Option<usize> {
    let mut scanner = QuoteScanner::new();
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if scanner.step(b) != ByteClass::Code {
            continue;
        }
        if b == open_byte {
            depth += 1;
        } else if b == close_byte {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Offset of the `}` matching the `{` at `open`; `open` itself when unmatched.
pub fn find_matching_brace(text: &str, open: usize) -> usize {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return open;
    }
    find_closing(bytes, open, b'{', b'}').unwrap_or(open)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn calls(text: &str, names: &[&str]) -> Vec<Call> {
        let newlines = NewlineIndex::build(text);
        iter_calls(text, names, &newlines).collect()
    }

    #[test]
    fn test_finds_calls_in_source_order() {
        let found = calls("ans_rule(20);\nANS(num_cmp(1));\n", &["ANS", "ans_rule"]);
        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ans_rule", "ANS"]);
        assert_eq!(found[1].arg_text, "num_cmp(1)");
        assert_eq!(found[1].line, 2);
    }

    #[test]
    fn test_word_boundary() {
        assert!(calls("my_ANS(1); ANSWER(2); $ANS(3);", &["ANS"]).is_empty());
        assert_eq!(calls("&ANS(1);", &["ANS"]).len(), 1);
    }

    #[test]
    fn test_method_call_matches() {
        let found = calls("$mp->ans_rule(10)", &["ans_rule"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].arg_text, "10");
    }

    #[test]
    fn test_multiline_call_and_whitespace_before_paren() {
        let found = calls("ANS (\n  num_cmp(\n    3\n  )\n);\n", &["ANS"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 1);
        assert!(found[0].arg_text.contains("num_cmp("));
        assert!(found[0].closed);
    }

    #[test]
    fn test_parens_in_strings_are_ignored() {
        let found = calls("ANS(str_cmp(')(('));", &["ANS"]);
        assert_eq!(found[0].arg_text, "str_cmp(')((')");
    }

    #[test]
    fn test_unclosed_call_truncates_at_end() {
        let found = calls("ANS(num_cmp(1);\n", &["ANS"]);
        assert_eq!(found.len(), 1);
        assert!(!found[0].closed);
        assert_eq!(found[0].arg_text, "num_cmp(1);\n");
    }

    #[test]
    fn test_nested_calls_are_reported() {
        let found = calls("Real(Real(1))", &["Real"]);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].arg_text, "1");
    }

    #[test]
    fn test_name_without_paren_is_skipped() {
        assert!(calls("$f = \\&ANS;", &["ANS"]).is_empty());
    }

    #[test]
    fn test_find_matching_brace() {
        let text = "[_]{ $a->cmp(x => '}') }tail";
        let open = text.find('{').unwrap();
        let close = find_matching_brace(text, open);
        assert_eq!(&text[close + 1..], "tail");
    }

    #[test]
    fn test_unmatched_brace_returns_open() {
        let text = "{ never closed";
        assert_eq!(find_matching_brace(text, 0), 0);
        assert_eq!(find_matching_brace("abc", 1), 1);
    }
}
