//! Excel reader (`xls`, `xlsx`, `xlsm`, `xlsb`).
//!
//! Only the first worksheet is read; its first row is the header.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{Days, NaiveDate};

use crate::{
  error::{Error, Result},
  sheet::{RawCell, RawSheet, format_number},
};

pub(crate) fn read(bytes: &[u8]) -> Result<RawSheet> {
  let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
  let range = workbook.worksheet_range_at(0).ok_or(Error::NoWorksheet)??;

  let mut rows = range.rows();
  let headers = rows
    .next()
    .ok_or(Error::MissingHeader)?
    .iter()
    .map(|d| d.to_string().trim().to_string())
    .collect();
  let rows = rows.map(|row| row.iter().map(raw_cell).collect()).collect();

  Ok(RawSheet { headers, rows })
}

fn raw_cell(data: &Data) -> RawCell {
  match data {
    Data::Empty => RawCell::Empty,
    Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
      RawCell::text(s)
    }
    Data::Float(f) => RawCell::Number(*f),
    Data::Int(i) => RawCell::Number(*i as f64),
    Data::Bool(b) => RawCell::Text(b.to_string()),
    Data::DateTime(dt) => match serial_date(dt.as_f64()) {
      Some(date) => RawCell::Date(date),
      None => RawCell::Text(format_number(dt.as_f64())),
    },
    Data::Error(e) => RawCell::Text(format!("#{e:?}")),
  }
}

/// Convert an Excel serial day number (1900 date system) to a date.
pub(crate) fn serial_date(serial: f64) -> Option<NaiveDate> {
  if !serial.is_finite() || serial < 1.0 {
    return None;
  }
  NaiveDate::from_ymd_opt(1899, 12, 30)?
    .checked_add_days(Days::new(serial.floor() as u64))
}
