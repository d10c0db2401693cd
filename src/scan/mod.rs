//! Heuristic scanner for PG source text.
//!
//! This is not a Perl parser. It tracks just enough state (quote runs,
//! escapes, heredocs, paren and brace depth) to find structural calls in
//! well-formed corpus files, and degrades by truncation on malformed input.

pub mod calls;
pub mod comments;
pub mod heredoc;
pub mod quote;
pub mod source;

pub use calls::{find_matching_brace, iter_calls, Call, CallIter};
pub use comments::strip_comments;
pub use heredoc::{find_heredocs, scan_heredoc_terminator, strip_heredocs, Heredoc};
pub use quote::{ByteClass, Quote, QuoteScanner};
pub use source::{build_newline_index, pos_to_line, NewlineIndex, SourceText};
