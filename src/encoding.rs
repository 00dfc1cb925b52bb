//! Encoding detection and transcoding using chardetng and `encoding_rs`.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use simdutf8::basic::from_utf8;
use tracing::debug;

use crate::error::Result;

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (Byte Order Mark).
///
/// The UTF-8 BOM is the byte sequence: EF BB BF
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    if has_utf8_bom(data) { &data[3..] } else { data }
}

/// Detect the encoding of the data and transcode to UTF-8 if necessary.
///
/// Returns (`transcoded_data`, `was_transcoded`). If `was_transcoded` is false,
/// the original data is returned as-is.
pub fn detect_and_transcode(data: &[u8]) -> (Cow<'_, [u8]>, bool) {
    // UTF-16 BOMs first, chardetng doesn't handle these well
    if data.starts_with(&[0xFF, 0xFE]) {
        let (decoded, _, _) = encoding_rs::UTF_16LE.decode(data);
        return (Cow::Owned(decoded.into_owned().into_bytes()), true);
    }
    if data.starts_with(&[0xFE, 0xFF]) {
        let (decoded, _, _) = encoding_rs::UTF_16BE.decode(data);
        return (Cow::Owned(decoded.into_owned().into_bytes()), true);
    }

    if is_utf8(data) {
        return (Cow::Borrowed(data), false);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);

    // Detected as UTF-8 despite invalid bytes; leave it to the parser.
    if encoding == encoding_rs::UTF_8 {
        return (Cow::Borrowed(data), false);
    }

    debug!(encoding = encoding.name(), "transcoding input to UTF-8");
    let (decoded, _, _) = encoding.decode(data);
    (Cow::Owned(decoded.into_owned().into_bytes()), true)
}

/// Normalize raw input to BOM-less UTF-8 ready for parsing.
pub fn normalize_input(data: &[u8]) -> Cow<'_, [u8]> {
    match detect_and_transcode(data) {
        (Cow::Borrowed(bytes), _) => Cow::Borrowed(skip_bom(bytes)),
        (Cow::Owned(bytes), _) if has_utf8_bom(&bytes) => Cow::Owned(skip_bom(&bytes).to_vec()),
        (owned, _) => owned,
    }
}

/// Read a whole file and normalize it with [`normalize_input`].
pub fn load_input<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let data = fs::read(path.as_ref())?;
    Ok(normalize_input(&data).into_owned())
}
