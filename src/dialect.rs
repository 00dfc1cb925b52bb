use crate::error::{CodecError, Result};
use std::fmt;

/// CSV dialect: delimiter and quote character.
///
/// Records are always terminated by [`Dialect::LINE_TERMINATOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    /// Field delimiter character.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl Dialect {
    /// Line terminator written after every record.
    pub const LINE_TERMINATOR: u8 = b'\n';

    /// Create a new Dialect with the given parameters.
    pub const fn new(delimiter: u8, quote: u8) -> Self {
        Self { delimiter, quote }
    }

    /// Resolve a dialect from optional delimiter and quote parameters.
    ///
    /// Absent parameters fall back to `,` and `"`. The delimiter accepts the
    /// escape token `\t`; the quote accepts `\'` and `\"`. After decoding,
    /// each parameter must be exactly one ASCII character.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] if a parameter decodes to
    /// anything other than a single ASCII character.
    pub fn resolve(delimiter: Option<&str>, quote: Option<&str>) -> Result<Self> {
        let mut dialect = Self::default();

        if let Some(param) = delimiter {
            dialect.delimiter = single_byte(decode_delimiter(param), "delimiter")?;
        }

        if let Some(param) = quote {
            dialect.quote = single_byte(decode_quote(param), "quote")?;
        }

        Ok(dialect)
    }

    /// Build a csv reader configured for this dialect.
    ///
    /// Headers are not consumed by the reader and records may vary in
    /// length; callers decide how to treat both.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quoting(true)
            .has_headers(false)
            .flexible(true);
        builder
    }

    /// Build a csv writer configured for this dialect.
    pub fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(Self::LINE_TERMINATOR))
            .has_headers(false);
        builder
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delimiter={:?} quote={:?}",
            self.delimiter as char, self.quote as char
        )
    }
}

fn decode_delimiter(param: &str) -> &str {
    match param {
        "\\t" => "\t",
        other => other,
    }
}

fn decode_quote(param: &str) -> &str {
    match param {
        "\\'" => "'",
        "\\\"" => "\"",
        other => other,
    }
}

fn single_byte(value: &str, what: &str) -> Result<u8> {
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(CodecError::InvalidArgument(format!(
            "Invalid CSV {what} character: {value:?}"
        ))),
    }
}
