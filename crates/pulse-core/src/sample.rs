//! The built-in sample table served until the first upload.

use chrono::NaiveDate;

use crate::record::{REQUIRED_COLUMNS, REVENUE_COLUMN, Record, RecordTable};

/// Ten days of activity across the `New`, `Returning` and `Loyal` segments.
const ROWS: [(u32, &str, i64, f64, f64, f64); 10] = [
  (1, "New", 5, 10.5, 0.20, 120.0),
  (2, "New", 3, 8.2, 0.15, 90.0),
  (3, "Returning", 7, 15.3, 0.35, 210.0),
  (4, "Returning", 6, 12.1, 0.30, 180.0),
  (5, "Loyal", 10, 20.0, 0.50, 300.0),
  (6, "New", 4, 9.0, 0.18, 108.0),
  (7, "Loyal", 8, 18.5, 0.45, 270.0),
  (8, "Returning", 5, 11.2, 0.25, 150.0),
  (9, "New", 6, 10.8, 0.22, 132.0),
  (10, "Loyal", 9, 19.2, 0.48, 288.0),
];

/// Build the sample table (January 2023).
pub fn table() -> RecordTable {
  let january = |day| NaiveDate::from_ymd_opt(2023, 1, day);
  let records = ROWS
    .iter()
    .map(|&(day, segment, visits, time_spent, conversion, revenue)| Record {
      date: january(day).expect("sample days fall within January"),
      segment: segment.to_string(),
      visits,
      time_spent,
      conversion,
      revenue: Some(revenue),
      extra: Default::default(),
    })
    .collect();

  let columns = REQUIRED_COLUMNS
    .iter()
    .chain(std::iter::once(&REVENUE_COLUMN))
    .map(|c| c.to_string())
    .collect();

  RecordTable::new(columns, records)
    .expect("sample columns include every required column")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_sample_row_is_kept() {
    let table = table();
    assert_eq!(table.len(), ROWS.len());
    let first = table.records().first().unwrap().date;
    let last = table.records().last().unwrap().date;
    assert_eq!(first, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    assert_eq!(last, NaiveDate::from_ymd_opt(2023, 1, 10).unwrap());
  }
}
