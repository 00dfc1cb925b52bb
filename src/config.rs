use std::io::{Read, Seek};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::sniffer::Sniffer;

/// Dialect parameters as supplied by a client.
///
/// Each parameter is either a literal single character or an escape token
/// (`\t` for the delimiter, `\'` or `\"` for the quote). When neither is set
/// the dialect is sniffed from the input.
///
/// ```
/// use scoring_csv::FormatConfig;
///
/// let config: FormatConfig = serde_json::from_str(r#"{"delimiter":"\\t"}"#).unwrap();
/// assert_eq!(config.resolve().unwrap().delimiter, b'\t');
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    quote: Option<String>,
}

impl FormatConfig {
    /// Create a config with no parameters set.
    pub const fn new() -> Self {
        Self {
            delimiter: None,
            quote: None,
        }
    }

    /// Set the delimiter parameter.
    pub fn delimiter(&mut self, delimiter: impl Into<String>) -> &mut Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Set the quote parameter.
    pub fn quote(&mut self, quote: impl Into<String>) -> &mut Self {
        self.quote = Some(quote.into());
        self
    }

    /// Returns true if at least one parameter is set.
    pub fn is_explicit(&self) -> bool {
        self.delimiter.is_some() || self.quote.is_some()
    }

    /// Resolve the parameters without looking at any input.
    pub fn resolve(&self) -> Result<Dialect> {
        Dialect::resolve(self.delimiter.as_deref(), self.quote.as_deref())
    }

    /// Pick the dialect for `reader`: resolved from the parameters if any are
    /// set, sniffed otherwise. The reader position is unchanged either way.
    pub fn dialect_for<R: Read + Seek>(&self, reader: &mut R) -> Result<Dialect> {
        if self.is_explicit() {
            let dialect = self.resolve()?;
            debug!(%dialect, "using configured dialect");
            Ok(dialect)
        } else {
            Sniffer::new().sniff_reader(reader)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;
    use std::io::Cursor;

    #[test]
    fn test_builder() {
        let mut config = FormatConfig::new();
        assert!(!config.is_explicit());

        config.delimiter(";").quote("\\'");
        assert!(config.is_explicit());
        assert_eq!(config.resolve().unwrap(), Dialect::new(b';', b'\''));
    }

    #[test]
    fn test_explicit_skips_sniffing() {
        // Single-column input cannot be sniffed, but an explicit quote is enough.
        let mut input = Cursor::new(b"a\nb\n".to_vec());
        let mut config = FormatConfig::new();
        config.quote("'");

        let dialect = config.dialect_for(&mut input).unwrap();
        assert_eq!(dialect, Dialect::new(b',', b'\''));
    }

    #[test]
    fn test_sniffs_when_unset() {
        let mut input = Cursor::new(b"a;b\n1;2\n".to_vec());
        let dialect = FormatConfig::new().dialect_for(&mut input).unwrap();
        assert_eq!(dialect.delimiter, b';');
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_invalid_parameter() {
        let mut input = Cursor::new(b"a,b\n".to_vec());
        let mut config = FormatConfig::new();
        config.delimiter("::");

        let err = config.dialect_for(&mut input).unwrap_err();
        assert!(matches!(err, CodecError::InvalidArgument(_)));
    }

    #[test]
    fn test_deserialize() {
        let config: FormatConfig = serde_json::from_str(r#"{"quote":"\\\""}"#).unwrap();
        assert_eq!(config.resolve().unwrap(), Dialect::default());

        let config: FormatConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.is_explicit());
    }
}
