//! Error types for the pulse-ingest codec.

use thiserror::Error;

/// The three ways an upload can fail, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The file name does not end in a CSV or Excel extension.
  UnsupportedFormat,
  /// The header lacks one or more required columns.
  MissingColumns,
  /// Anything else: bad encoding, malformed file, uncoercible cell.
  Parse,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("unsupported file format: {0:?}")]
  UnsupportedFormat(String),

  #[error("missing required columns: {}", .0.join(", "))]
  MissingColumns(Vec<String>),

  #[error("invalid upload payload: {0}")]
  Transport(String),

  #[error("invalid base64: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("file is not valid UTF-8: {0}")]
  Utf8(#[from] std::str::Utf8Error),

  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("Excel error: {0}")]
  Excel(#[from] calamine::Error),

  #[error("workbook has no worksheets")]
  NoWorksheet,

  #[error("file has no header row")]
  MissingHeader,

  #[error("duplicate column: {0:?}")]
  DuplicateColumn(String),

  #[error("row {row}, column {column}: {message}")]
  InvalidCell {
    row:     usize,
    column:  String,
    message: String,
  },

  #[error("table error: {0}")]
  Table(pulse_core::Error),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
      Self::MissingColumns(_) => ErrorKind::MissingColumns,
      _ => ErrorKind::Parse,
    }
  }
}

impl From<pulse_core::Error> for Error {
  fn from(e: pulse_core::Error) -> Self {
    match e {
      pulse_core::Error::MissingColumns(cols) => Self::MissingColumns(cols),
      other => Self::Table(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
