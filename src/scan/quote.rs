//! Quote and escape tracking shared by every scanner.
//!
//! The scanners walk text byte by byte. All structural characters they care
//! about (`#`, `(`, `)`, `{`, `}`, `<`, quotes, backslash) are ASCII, so byte
//! offsets always land on `char` boundaries of the original `&str`.

/// Which quoted run, if any, the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quote {
    #[default]
    None,
    Single,
    Double,
}

/// Classification of a single byte after feeding it to a [`QuoteScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteClass {
    /// Ordinary code outside any quoted run.
    Code,
    /// A backslash, or the byte a backslash escapes.
    Escaped,
    /// An opening or closing quote character.
    Delimiter,
    /// Content of a quoted run.
    Quoted,
}

/// Explicit scanner state: current quote run plus a pending escape.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteScanner {
    quote: Quote,
    escape: bool,
}

impl QuoteScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quote(&self) -> Quote {
        self.quote
    }

    pub fn in_string(&self) -> bool {
        self.quote != Quote::None
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feed one byte and report how it should be treated.
    pub fn step(&mut self, byte: u8) -> ByteClass {
        if self.escape {
            self.escape = false;
            return ByteClass::Escaped;
        }

        match (self.quote, byte) {
            (_, b'\\') => {
                self.escape = true;
                ByteClass::Escaped
            }
            (Quote::None, b'\'') => {
                self.quote = Quote::Single;
                ByteClass::Delimiter
            }
            (Quote::None, b'"') => {
                self.quote = Quote::Double;
                ByteClass::Delimiter
            }
            (Quote::Single, b'\'') | (Quote::Double, b'"') => {
                self.quote = Quote::None;
                ByteClass::Delimiter
            }
            (Quote::None, _) => ByteClass::Code,
            _ => ByteClass::Quoted,
        }
    }
}
