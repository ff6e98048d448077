//! Upload codec for Pulse.
//!
//! Turns an uploaded file into a [`RecordTable`]. Pure synchronous; no HTTP
//! dependencies.
//!
//! Pipeline:
//!   data URL
//!     └─ decode_contents()      → raw bytes
//!          └─ FileFormat        → CSV or Excel reader → RawSheet
//!               └─ into_table() → validated, typed RecordTable
//!
//! # Quick start
//!
//! ```no_run
//! let csv = "date,segment,visits,time_spent,conversion\n2023-01-01,New,5,10.5,0.2\n";
//! let table = pulse_ingest::parse("visits.csv", csv.as_bytes()).unwrap();
//! assert_eq!(table.len(), 1);
//! ```

pub mod error;
mod delimited;
mod sheet;
mod transport;
mod workbook;

use std::path::Path;

pub use error::{Error, ErrorKind, Result};
use pulse_core::record::RecordTable;
pub use transport::decode_contents;

// ─── Format dispatch ─────────────────────────────────────────────────────────

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
  Csv,
  /// `xls`, `xlsx`, `xlsm`, `xlsb`.
  Excel,
}

impl FileFormat {
  /// Pick a format from the file extension (case-insensitive).
  pub fn from_filename(filename: &str) -> Result<Self> {
    let ext = Path::new(filename)
      .extension()
      .and_then(|e| e.to_str())
      .map(str::to_ascii_lowercase);
    match ext.as_deref() {
      Some("csv") => Ok(Self::Csv),
      Some(e) if e.starts_with("xls") => Ok(Self::Excel),
      _ => Err(Error::UnsupportedFormat(filename.to_string())),
    }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse the decoded bytes of `filename` into a table.
///
/// Fails with [`Error::MissingColumns`] when any required column is absent,
/// before any row is coerced.
pub fn parse(filename: &str, bytes: &[u8]) -> Result<RecordTable> {
  let raw = match FileFormat::from_filename(filename)? {
    FileFormat::Csv => delimited::read(bytes)?,
    FileFormat::Excel => workbook::read(bytes)?,
  };
  sheet::into_table(raw)
}

/// Decode a browser upload (`data:<mime>;base64,<payload>`) and parse it.
///
/// The format is checked before the payload is decoded, so an unsupported
/// file name is reported as such even if the payload is malformed.
pub fn parse_upload(filename: &str, contents: &str) -> Result<RecordTable> {
  FileFormat::from_filename(filename)?;
  let bytes = decode_contents(contents)?;
  parse(filename, &bytes)
}

#[cfg(test)]
mod tests {
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

  use super::*;

  const VALID: &str = "\
date,segment,visits,time_spent,conversion,revenue
2023-02-01,New,5,10.5,0.2,120
2023-02-02,Loyal,8,18.5,0.45,
2023-02-03,Returning,7,15.3,0.35,210
";

  fn data_url(body: &str) -> String {
    format!("data:text/csv;base64,{}", B64.encode(body))
  }

  #[test]
  fn format_follows_extension() {
    assert_eq!(FileFormat::from_filename("a.CSV").unwrap(), FileFormat::Csv);
    assert_eq!(FileFormat::from_filename("a.xlsx").unwrap(), FileFormat::Excel);
    assert_eq!(FileFormat::from_filename("a.xls").unwrap(), FileFormat::Excel);
    let err = FileFormat::from_filename("notes.txt").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert!(FileFormat::from_filename("csv").is_err());
  }

  #[test]
  fn upload_round_trip_counts_rows_and_segments() {
    let table = parse_upload("activity.csv", &data_url(VALID)).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.segments(), vec!["New", "Loyal", "Returning"]);
    assert!(table.has_revenue());
    assert_eq!(table.records()[1].revenue, None);
  }

  #[test]
  fn missing_columns_are_reported_by_kind() {
    let body = "date,segment,visits\n2023-01-01,New,5\n";
    let err = parse_upload("short.csv", &data_url(body)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingColumns);
    match err {
      Error::MissingColumns(cols) => {
        assert_eq!(cols, vec!["time_spent", "conversion"]);
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn unsupported_extension_wins_over_bad_payload() {
    let err = parse_upload("report.pdf", "not base64 at all").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
  }

  #[test]
  fn trailing_empty_columns_are_accepted() {
    let body = "date,segment,visits,time_spent,conversion,,\n\
                2023-01-01,New,5,10.5,0.2,,\n";
    let table = parse("export.csv", body.as_bytes()).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.columns().len(), 7);
  }

  #[test]
  fn garbage_workbook_is_a_parse_error() {
    let err = parse("book.xlsx", b"definitely not a zip").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
  }
}
