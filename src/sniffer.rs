//! Delimiter detection by probing a fixed list of candidates.
//!
//! Each candidate delimiter is used to parse the header row and the first ten
//! data rows. The first candidate that yields more than one column, with the
//! same column count on every probed row, wins.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, warn};

use crate::dialect::Dialect;
use crate::error::{CodecError, Result};

/// Candidate delimiters, in the order they are tried.
pub const DELIMITERS: &[u8] = b",;\t";

/// Rows inspected per candidate: the header plus ten data rows.
pub const PROBE_ROWS: usize = 1 + 10;

/// Bytes of look-ahead the sniffer may consume before rewinding.
pub const PROBE_LIMIT: usize = 10 * 1024;

/// Quote character assumed while sniffing.
const PROBE_QUOTE: u8 = b'"';

/// CSV dialect sniffer.
///
/// # Example
///
/// ```
/// use scoring_csv::Sniffer;
/// use std::io::Cursor;
///
/// let mut input = Cursor::new(b"a;b;c\n1;2;3\n".to_vec());
/// let dialect = Sniffer::new().sniff_reader(&mut input).unwrap();
///
/// assert_eq!(dialect.delimiter, b';');
/// assert_eq!(input.position(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Sniffer {
    /// Delimiters to try, in order.
    candidates: Vec<u8>,
    /// Maximum number of rows parsed per candidate.
    probe_rows: usize,
    /// Maximum number of bytes read ahead of the mark.
    probe_limit: usize,
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sniffer {
    /// Create a new Sniffer with default settings.
    pub fn new() -> Self {
        Self {
            candidates: DELIMITERS.to_vec(),
            probe_rows: PROBE_ROWS,
            probe_limit: PROBE_LIMIT,
        }
    }

    /// Replace the candidate delimiters.
    pub fn candidates(&mut self, delimiters: &[u8]) -> &mut Self {
        self.candidates = delimiters.to_vec();
        self
    }

    /// Set the number of rows parsed per candidate.
    pub fn probe_rows(&mut self, rows: usize) -> &mut Self {
        self.probe_rows = rows;
        self
    }

    /// Set the look-ahead bound in bytes.
    pub fn probe_limit(&mut self, bytes: usize) -> &mut Self {
        self.probe_limit = bytes;
        self
    }

    /// Sniff the CSV file at the given path.
    pub fn sniff_path<P: AsRef<Path>>(&self, path: P) -> Result<Dialect> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        self.sniff_reader(&mut reader)
    }

    /// Sniff CSV data from a seekable reader.
    ///
    /// The reader is returned to the position it had on entry, whether or not
    /// a dialect is found, so the caller can parse it from the same place.
    pub fn sniff_reader<R: Read + Seek>(&self, reader: &mut R) -> Result<Dialect> {
        let window = self.read_window(reader)?;

        // A full window that does not end on a line break was cut mid-record.
        let truncated = window.len() >= self.probe_limit
            && window.last() != Some(&Dialect::LINE_TERMINATOR);

        if window.len() >= self.probe_limit
            && bytecount::count(&window, Dialect::LINE_TERMINATOR) < self.probe_rows
        {
            warn!(
                limit = self.probe_limit,
                "probe rows exceed look-ahead bound, sniffing a truncated window"
            );
        }

        self.sniff_window(&window, truncated)
    }

    /// Sniff CSV data from bytes.
    pub fn sniff_bytes(&self, data: &[u8]) -> Result<Dialect> {
        self.sniff_window(data, false)
    }

    /// Probe each candidate against `data`. If `truncated`, a last record
    /// running up to the end of `data` is incomplete and ignored.
    fn sniff_window(&self, data: &[u8], truncated: bool) -> Result<Dialect> {
        for &delimiter in &self.candidates {
            let dialect = Dialect::new(delimiter, PROBE_QUOTE);

            match probe_columns(data, &dialect, self.probe_rows, truncated) {
                Some(columns) => {
                    debug!(delimiter = ?(delimiter as char), columns, "dialect detected");
                    return Ok(dialect);
                }
                None => debug!(delimiter = ?(delimiter as char), "candidate rejected"),
            }
        }

        Err(CodecError::UnrecognizedFormat)
    }

    /// Read up to `probe_limit` bytes, then seek back to where reading began.
    fn read_window<R: Read + Seek>(&self, reader: &mut R) -> Result<Vec<u8>> {
        let mark = reader.stream_position()?;

        let mut window = Vec::with_capacity(self.probe_limit);
        let read = reader
            .by_ref()
            .take(self.probe_limit as u64)
            .read_to_end(&mut window);

        // Rewind even when the read failed.
        reader.seek(SeekFrom::Start(mark))?;
        read?;

        Ok(window)
    }
}

/// Detect the dialect of a seekable reader with the default [`Sniffer`].
pub fn sniff_dialect<R: Read + Seek>(reader: &mut R) -> Result<Dialect> {
    Sniffer::new().sniff_reader(reader)
}

/// Parse up to `max_rows` rows and return the shared column count, if every
/// row has the same count and that count is greater than one.
fn probe_columns(
    data: &[u8],
    dialect: &Dialect,
    max_rows: usize,
    truncated: bool,
) -> Option<usize> {
    let mut parser = dialect.reader_builder().from_reader(data);
    let mut record = csv::ByteRecord::new();
    let mut columns = 0;

    for _ in 0..max_rows {
        match parser.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break, // EOF
            Err(_) => return None,
        }

        if truncated && parser.position().byte() >= data.len() as u64 {
            break;
        }

        // A single column is indistinguishable from "delimiter not present".
        let found = record.len();
        if found > 1 && (columns == 0 || columns == found) {
            columns = found;
        } else {
            return None;
        }
    }

    (columns > 1).then_some(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_sniffer_builder() {
        let mut sniffer = Sniffer::new();
        sniffer.candidates(b"|").probe_rows(3).probe_limit(64);

        assert_eq!(sniffer.candidates, vec![b'|']);
        assert_eq!(sniffer.probe_rows, 3);
        assert_eq!(sniffer.probe_limit, 64);
    }

    #[test]
    fn test_sniff_comma() {
        let dialect = Sniffer::new().sniff_bytes(b"a,b,c\n1,2,3\n4,5,6\n").unwrap();
        assert_eq!(dialect, Dialect::new(b',', b'"'));
    }

    #[test]
    fn test_sniff_semicolon() {
        let dialect = Sniffer::new().sniff_bytes(b"a;b;c\n1;2;3\n").unwrap();
        assert_eq!(dialect.delimiter, b';');
        assert_eq!(dialect.quote, b'"');
    }

    #[test]
    fn test_sniff_tsv() {
        let dialect = Sniffer::new()
            .sniff_bytes(b"name\tage\nAlice\t30\nBob\t25\n")
            .unwrap();
        assert_eq!(dialect.delimiter, b'\t');
    }

    #[test]
    fn test_single_column_rejected() {
        let err = Sniffer::new().sniff_bytes(b"a\nb\nc\n").unwrap_err();
        assert!(matches!(err, CodecError::UnrecognizedFormat));
    }

    #[test]
    fn test_sniff_empty() {
        let err = Sniffer::new().sniff_bytes(b"").unwrap_err();
        assert!(matches!(err, CodecError::UnrecognizedFormat));
    }

    #[test]
    fn test_candidate_order() {
        // Both comma and semicolon give two consistent columns; comma is tried first.
        let dialect = Sniffer::new().sniff_bytes(b"a,b;c\n1,2;3\n").unwrap();
        assert_eq!(dialect.delimiter, b',');
    }

    #[test]
    fn test_inconsistent_counts_fall_through() {
        // Comma counts disagree (2 vs 3), semicolon counts agree.
        let data = b"a;b,x\n1;2,y,z\n3;4\n";
        let dialect = Sniffer::new().sniff_bytes(data).unwrap();
        assert_eq!(dialect.delimiter, b';');
    }

    #[test]
    fn test_quoted_delimiters_ignored() {
        let data = b"name;comment\n\"Smith, John\";\"a, b, c\"\nDoe;none\n";
        let dialect = Sniffer::new().sniff_bytes(data).unwrap();
        assert_eq!(dialect.delimiter, b';');
    }

    #[test]
    fn test_only_probe_window_checked() {
        // Rows past the header + 10 data rows are not inspected.
        let mut data = String::from("a,b\n");
        for i in 0..10 {
            data.push_str(&format!("{i},{i}\n"));
        }
        data.push_str("x,y,z\n");

        let dialect = Sniffer::new().sniff_bytes(data.as_bytes()).unwrap();
        assert_eq!(dialect.delimiter, b',');

        let mut sniffer = Sniffer::new();
        sniffer.probe_rows(12);
        assert!(sniffer.sniff_bytes(data.as_bytes()).is_err());
    }

    #[test]
    fn test_reader_position_restored() {
        let mut cursor = Cursor::new(b"a\tb\n1\t2\n".to_vec());
        let dialect = Sniffer::new().sniff_reader(&mut cursor).unwrap();
        assert_eq!(dialect.delimiter, b'\t');
        assert_eq!(cursor.position(), 0);

        let mut cursor = Cursor::new(b"a\nb\n".to_vec());
        assert!(Sniffer::new().sniff_reader(&mut cursor).is_err());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_reader_mark_is_current_position() {
        let data = b"# preamble\na;b\n1;2\n".to_vec();
        let mut cursor = Cursor::new(data);
        cursor.set_position(11);

        let dialect = sniff_dialect(&mut cursor).unwrap();
        assert_eq!(dialect.delimiter, b';');
        assert_eq!(cursor.position(), 11);
    }

    #[test]
    fn test_truncated_window() {
        let mut data = String::from("a,b,c\n");
        for _ in 0..20 {
            data.push_str("1,2,3\n");
        }

        // The row cut at the window edge is ignored, the complete rows decide.
        let mut sniffer = Sniffer::new();
        sniffer.probe_limit(9);
        let mut cursor = Cursor::new(data.into_bytes());
        assert_eq!(sniffer.sniff_reader(&mut cursor).unwrap().delimiter, b',');
        assert_eq!(cursor.position(), 0);

        // A window cut on a row boundary keeps its last row.
        sniffer.probe_limit(12);
        assert_eq!(sniffer.sniff_reader(&mut cursor).unwrap().delimiter, b',');

        // Nothing complete inside the window.
        sniffer.probe_limit(4);
        assert!(sniffer.sniff_reader(&mut cursor).is_err());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_wide_rows_exceed_window() {
        // Eleven rows of ~2 KiB each do not fit in the default 10 KiB window.
        let header: Vec<String> = (0..400).map(|i| format!("col{i}")).collect();
        let row: Vec<String> = (0..400).map(|i| format!("{i:04}")).collect();
        let mut data = header.join(";");
        data.push('\n');
        for _ in 0..10 {
            data.push_str(&row.join(";"));
            data.push('\n');
        }
        assert!(data.len() > PROBE_LIMIT);

        let mut cursor = Cursor::new(data.into_bytes());
        let dialect = sniff_dialect(&mut cursor).unwrap();
        assert_eq!(dialect.delimiter, b';');
        assert_eq!(cursor.position(), 0);
    }

    /// Seekable stream whose reads always fail.
    struct FailingReader(Cursor<Vec<u8>>);

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            ))
        }
    }

    impl Seek for FailingReader {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.0.seek(pos)
        }
    }

    #[test]
    fn test_read_failure_restores_position() {
        let mut reader = FailingReader(Cursor::new(b"a,b\n1,2\n".to_vec()));
        reader.0.set_position(4);

        let err = Sniffer::new().sniff_reader(&mut reader).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
        assert!(!err.is_client_error());
        assert_eq!(reader.0.position(), 4);
    }
}
