use std::io;
use thiserror::Error;

/// Error type for dialect resolution, sniffing, and table I/O.
#[derive(Error, Debug)]
pub enum CodecError {
    /// IO error on the underlying stream.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing or formatting error.
    #[error("CSV parsing error: {0}")]
    Csv(csv::Error),

    /// A delimiter or quote parameter did not decode to a single character.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No candidate delimiter produced a consistent multi-column parse.
    #[error("Unrecognized CSV format")]
    UnrecognizedFormat,

    /// A data row holds more cells than the header declares.
    #[error("Row at line {line} has {found} fields, header has {expected}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecError {
    /// Returns true if the error was caused by the client's input rather than
    /// by the environment (I/O) or by the caller's own output.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CodecError::InvalidArgument(_)
                | CodecError::UnrecognizedFormat
                | CodecError::TooManyFields { .. }
                | CodecError::Csv(_)
        )
    }
}

impl From<csv::Error> for CodecError {
    fn from(err: csv::Error) -> Self {
        // Stream failures surface as plain IO errors, not as bad input.
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => CodecError::Io(io),
                _ => unreachable!("is_io_error implies ErrorKind::Io"),
            }
        } else {
            CodecError::Csv(err)
        }
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
