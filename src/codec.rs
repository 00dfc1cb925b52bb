//! Conversion between CSV streams and keyed tables.

use std::borrow::Cow;
use std::io::{Read, Write};

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{CodecError, Result};
use crate::fields::Fields;
use crate::model::{Request, Response};
use crate::table::Table;

/// Column name used for response ids when the table has no id column.
pub const DEFAULT_ID_COLUMN: &str = "id";

/// Read a CSV stream into a table of requests.
///
/// The first row is the header. If its first cell is `id` (in any case), that
/// column becomes the table's id column and its value is moved out of each
/// row's arguments into the request id.
///
/// Rows shorter than the header leave the trailing columns out of the
/// arguments. Rows longer than the header are rejected.
pub fn read_table<R: Read>(reader: R, dialect: &Dialect) -> Result<Table<Request>> {
    let mut parser = dialect.reader_builder().from_reader(reader);
    let mut record = csv::StringRecord::new();

    if !parser.read_record(&mut record)? {
        return Ok(Table::default());
    }

    let header: Vec<String> = record.iter().map(str::to_string).collect();
    let id = header
        .first()
        .filter(|name| name.eq_ignore_ascii_case(DEFAULT_ID_COLUMN))
        .cloned();

    let mut requests = Vec::new();
    while parser.read_record(&mut record)? {
        if record.len() > header.len() {
            return Err(CodecError::TooManyFields {
                line: record.position().map_or(0, csv::Position::line),
                expected: header.len(),
                found: record.len(),
            });
        }

        let mut arguments: Fields = header.iter().zip(record.iter()).collect();
        let row_id = id.as_deref().and_then(|column| arguments.remove(column));

        requests.push(Request::new(row_id, arguments));
    }

    debug!(rows = requests.len(), id_column = ?id, "read table");
    Ok(Table::new(id, requests))
}

/// Write a table of responses as CSV.
///
/// Each response's id (if any) is placed under the table's id column, ahead of
/// the result values; a result entry with the same key overrides it. The
/// header is taken from the first row and reused for all later rows: header
/// keys missing from a row are written as empty cells and keys the header does
/// not name are dropped. An empty table produces no output at all, and so does
/// a table whose first row has no columns (no id and an empty result): with
/// an empty header there is nothing to write for any row.
pub fn write_table<W: Write>(writer: W, dialect: &Dialect, table: &Table<Response>) -> Result<()> {
    let mut formatter = dialect.writer_builder().from_writer(writer);
    let id_column = table.id().unwrap_or(DEFAULT_ID_COLUMN);

    let mut header: Option<Vec<String>> = None;

    for response in table.rows() {
        let row = output_row(id_column, response);

        if header.is_none() {
            let columns: Vec<String> = row.keys().map(str::to_string).collect();
            if !columns.is_empty() {
                formatter.write_record(&columns)?;
            }
            header = Some(columns);
        }
        let columns = header.as_deref().unwrap_or_default();
        if columns.is_empty() {
            break;
        }

        formatter.write_record(columns.iter().map(|column| row.get(column).unwrap_or_default()))?;
    }

    formatter.flush()?;

    debug!(
        rows = table.len(),
        columns = header.as_ref().map_or(0, Vec::len),
        "wrote table"
    );
    Ok(())
}

/// Join the response id and result into one output row.
fn output_row<'a>(id_column: &str, response: &'a Response) -> Cow<'a, Fields> {
    match &response.id {
        Some(id) => {
            let mut row = Fields::with_capacity(response.result.len() + 1);
            row.insert(id_column, id.as_str());
            row.extend_from(&response.result);
            Cow::Owned(row)
        }
        None => Cow::Borrowed(&response.result),
    }
}
