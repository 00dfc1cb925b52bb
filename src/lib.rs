//! scoring-csv: CSV dialect detection and keyed request/response tables
//!
//! Reads CSV input into a table of keyed evaluation requests and writes keyed
//! evaluation results back out as CSV, for services that score tabular data.
//!
//! # Quick Start
//!
//! ```
//! use scoring_csv::{read_table, sniff_dialect, write_table, Response};
//! use std::io::Cursor;
//!
//! let mut input = Cursor::new(b"id;x;y\n1;a;b\n".to_vec());
//!
//! // Detect the dialect, then parse from the same position
//! let dialect = sniff_dialect(&mut input).unwrap();
//! let requests = read_table(&mut input, &dialect).unwrap();
//!
//! assert_eq!(requests.id(), Some("id"));
//! assert_eq!(requests.rows()[0].arguments.get("x"), Some("a"));
//!
//! // Echo every request back as a response
//! let responses = requests.map(|request| Response::echo(&request));
//!
//! let mut output = Vec::new();
//! write_table(&mut output, &dialect, &responses).unwrap();
//! assert_eq!(output, b"id;x;y\n1;a;b\n");
//! ```
//!
//! # Dialects
//!
//! A [`Dialect`] is a delimiter and a quote character. It is either resolved
//! from client parameters ([`Dialect::resolve`], [`FormatConfig`]) or sniffed
//! from the input ([`Sniffer`]). Sniffing tries `,`, `;` and tab in that order
//! against the header and the first ten data rows, and picks the first
//! delimiter that splits every one of those rows into the same number (more
//! than one) of columns.

mod codec;
mod config;
mod dialect;
mod encoding;
mod error;
mod fields;
mod model;
mod sniffer;
mod table;

// Re-export public API
pub use codec::{DEFAULT_ID_COLUMN, read_table, write_table};
pub use config::FormatConfig;
pub use dialect::Dialect;
pub use error::{CodecError, Result};
pub use fields::Fields;
pub use model::{Request, Response};
pub use sniffer::{DELIMITERS, PROBE_LIMIT, PROBE_ROWS, Sniffer, sniff_dialect};
pub use table::Table;

// Re-export for input handling
pub use encoding::{is_utf8, load_input, normalize_input};
