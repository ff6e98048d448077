//! Format-independent sheet representation and coercion into records.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pulse_core::record::{
  REQUIRED_COLUMNS, REVENUE_COLUMN, Record, RecordTable, missing_columns,
};

use crate::{
  error::{Error, Result},
  workbook::serial_date,
};

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 3] = [
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M",
];

// ─── Raw representation ──────────────────────────────────────────────────────

/// A cell as read from the file, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawCell {
  Empty,
  Text(String),
  Number(f64),
  Date(NaiveDate),
}

impl RawCell {
  /// Trimmed text; blank strings become [`RawCell::Empty`].
  pub(crate) fn text(s: &str) -> Self {
    let s = s.trim();
    if s.is_empty() { Self::Empty } else { Self::Text(s.to_string()) }
  }

  fn is_empty(&self) -> bool { matches!(self, Self::Empty) }

  fn display(&self) -> String {
    match self {
      Self::Empty => String::new(),
      Self::Text(s) => s.clone(),
      Self::Number(n) => format_number(*n),
      Self::Date(d) => d.to_string(),
    }
  }
}

/// A header row plus data rows.
#[derive(Debug, Clone)]
pub(crate) struct RawSheet {
  pub headers: Vec<String>,
  pub rows:    Vec<Vec<RawCell>>,
}

/// Integral floats print without a fractional part.
pub(crate) fn format_number(n: f64) -> String {
  if n.fract() == 0.0 && n.abs() < 1e15 {
    format!("{}", n as i64)
  } else {
    n.to_string()
  }
}

// ─── Coercion ────────────────────────────────────────────────────────────────

struct Columns {
  date:       usize,
  segment:    usize,
  visits:     usize,
  time_spent: usize,
  conversion: usize,
  revenue:    Option<usize>,
  /// `(index, name)` of every column outside the known six.
  extra:      Vec<(usize, String)>,
}

impl Columns {
  fn locate(headers: &[String]) -> Result<Self> {
    let missing = missing_columns(headers);
    if !missing.is_empty() {
      return Err(Error::MissingColumns(missing));
    }
    let find = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
      find(name).ok_or_else(|| Error::MissingColumns(vec![name.to_string()]))
    };

    let extra = headers
      .iter()
      .enumerate()
      .filter(|(_, h)| {
        !REQUIRED_COLUMNS.contains(&h.as_str()) && h.as_str() != REVENUE_COLUMN
      })
      .map(|(i, h)| (i, h.clone()))
      .collect();

    Ok(Self {
      date: required("date")?,
      segment: required("segment")?,
      visits: required("visits")?,
      time_spent: required("time_spent")?,
      conversion: required("conversion")?,
      revenue: find(REVENUE_COLUMN),
      extra,
    })
  }
}

/// Validate the header and coerce every row into a [`Record`].
///
/// Fully blank rows are skipped. Row numbers in errors are 1-based and count
/// the header as row 1.
pub(crate) fn into_table(sheet: RawSheet) -> Result<RecordTable> {
  let RawSheet { headers, rows } = sheet;

  if headers.iter().all(|h| h.is_empty()) {
    return Err(Error::MissingHeader);
  }
  let headers = name_blank_headers(headers);
  for (i, h) in headers.iter().enumerate() {
    if headers[..i].contains(h) {
      return Err(Error::DuplicateColumn(h.clone()));
    }
  }

  let cols = Columns::locate(&headers)?;
  let empty = RawCell::Empty;

  let mut records = Vec::with_capacity(rows.len());
  for (i, row) in rows.iter().enumerate() {
    if row.iter().all(RawCell::is_empty) {
      continue;
    }
    let row_no = i + 2;
    let cell = |idx: usize| row.get(idx).unwrap_or(&empty);
    let invalid = |column: &str, message: String| Error::InvalidCell {
      row: row_no,
      column: column.to_string(),
      message,
    };

    let date = coerce_date(cell(cols.date)).map_err(|m| invalid("date", m))?;
    let segment = match cell(cols.segment) {
      RawCell::Empty => return Err(invalid("segment", "missing value".into())),
      other => other.display(),
    };
    let visits =
      coerce_integer(cell(cols.visits)).map_err(|m| invalid("visits", m))?;
    let time_spent = coerce_number(cell(cols.time_spent))
      .map_err(|m| invalid("time_spent", m))?;
    let conversion = coerce_number(cell(cols.conversion))
      .map_err(|m| invalid("conversion", m))?;
    let revenue = match cols.revenue.map(cell) {
      None | Some(RawCell::Empty) => None,
      Some(c) => Some(coerce_number(c).map_err(|m| invalid(REVENUE_COLUMN, m))?),
    };

    let extra: BTreeMap<String, String> = cols
      .extra
      .iter()
      .filter(|(idx, _)| !cell(*idx).is_empty())
      .map(|(idx, name)| (name.clone(), cell(*idx).display()))
      .collect();

    records.push(Record {
      date,
      segment,
      visits,
      time_spent,
      conversion,
      revenue,
      extra,
    });
  }

  Ok(RecordTable::new(headers, records)?)
}

/// Blank header cells become `Unnamed: <index>` (zero-based), so trailing
/// empty columns from spreadsheet exports do not collide.
fn name_blank_headers(headers: Vec<String>) -> Vec<String> {
  headers
    .into_iter()
    .enumerate()
    .map(|(i, h)| if h.is_empty() { format!("Unnamed: {i}") } else { h })
    .collect()
}

fn coerce_date(cell: &RawCell) -> Result<NaiveDate, String> {
  match cell {
    RawCell::Date(d) => Ok(*d),
    RawCell::Number(n) => {
      serial_date(*n).ok_or_else(|| format!("{n} is not a date"))
    }
    RawCell::Text(s) => parse_date(s).ok_or_else(|| format!("{s:?} is not a date")),
    RawCell::Empty => Err("missing value".into()),
  }
}

fn coerce_number(cell: &RawCell) -> Result<f64, String> {
  match cell {
    RawCell::Number(n) => Ok(*n),
    RawCell::Text(s) => s
      .parse::<f64>()
      .ok()
      .filter(|n| n.is_finite())
      .ok_or_else(|| format!("{s:?} is not a number")),
    RawCell::Date(d) => Err(format!("{d} is not a number")),
    RawCell::Empty => Err("missing value".into()),
  }
}

fn coerce_integer(cell: &RawCell) -> Result<i64, String> {
  if let RawCell::Text(s) = cell
    && let Ok(i) = s.parse::<i64>()
  {
    return Ok(i);
  }
  let n = coerce_number(cell)?;
  if n.fract() == 0.0 && n.abs() < 9.0e15 {
    Ok(n as i64)
  } else {
    Err(format!("{n} is not a whole number"))
  }
}

/// Accepts the date and date-time forms listed in [`DATE_FORMATS`],
/// [`DATETIME_FORMATS`] and RFC 3339; any time part is dropped.
fn parse_date(s: &str) -> Option<NaiveDate> {
  DATE_FORMATS
    .iter()
    .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
    .or_else(|| {
      DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|dt| dt.date())
    })
    .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
