//! CSV reader.

use csv::{ReaderBuilder, Trim};

use crate::{
  error::Result,
  sheet::{RawCell, RawSheet},
};

/// Read UTF-8 CSV with a header row. A leading byte-order mark is dropped and
/// every field is trimmed.
pub(crate) fn read(bytes: &[u8]) -> Result<RawSheet> {
  let text = std::str::from_utf8(bytes)?;
  let text = text.strip_prefix('\u{feff}').unwrap_or(text);

  let mut reader = ReaderBuilder::new()
    .trim(Trim::All)
    .from_reader(text.as_bytes());

  let headers = reader.headers()?.iter().map(str::to_string).collect();

  let mut rows = Vec::new();
  for result in reader.records() {
    let record = result?;
    rows.push(record.iter().map(RawCell::text).collect());
  }

  Ok(RawSheet { headers, rows })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;

  #[test]
  fn reads_header_and_rows() {
    let sheet = read(b"\xEF\xBB\xBFa, b\n1, x\n,y\n").unwrap();
    assert_eq!(sheet.headers, vec!["a", "b"]);
    assert_eq!(sheet.rows.len(), 2);
    assert_eq!(sheet.rows[0][1], RawCell::Text("x".into()));
    assert_eq!(sheet.rows[1][0], RawCell::Empty);
  }

  #[test]
  fn ragged_rows_are_rejected() {
    let err = read(b"a,b\n1,2,3\n").unwrap_err();
    assert!(matches!(err, Error::Csv(_)));
  }

  #[test]
  fn non_utf8_is_rejected() {
    let err = read(b"a,b\n\xff,1\n").unwrap_err();
    assert!(matches!(err, Error::Utf8(_)));
  }
}
