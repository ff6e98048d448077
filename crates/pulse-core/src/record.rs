//! The record table, the single entity the dashboard works on.
//!
//! A table is a list of typed [`Record`]s plus the column order of the file
//! it was loaded from. The five required columns are always present; the
//! `revenue` column is optional, and any further columns are carried along as
//! text so they can be shown in the data table.

use std::{cmp::Ordering, collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, selector::Metric};

/// Columns every table must contain, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 5] =
  ["date", "segment", "visits", "time_spent", "conversion"];

/// The optional currency column.
pub const REVENUE_COLUMN: &str = "revenue";

// ─── Record ──────────────────────────────────────────────────────────────────

/// One row of customer-activity data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  pub date:       NaiveDate,
  pub segment:    String,
  pub visits:     i64,
  /// Minutes on site.
  pub time_spent: f64,
  /// Ratio in `0.0..=1.0`.
  pub conversion: f64,
  /// `None` when the column is absent or the cell is empty.
  pub revenue:    Option<f64>,
  /// Columns beyond the known six, keyed by header name.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub extra:      BTreeMap<String, String>,
}

impl Record {
  /// The value of `metric` for this row. Only revenue can be missing.
  pub fn metric(&self, metric: Metric) -> Option<f64> {
    match metric {
      Metric::Visits => Some(self.visits as f64),
      Metric::TimeSpent => Some(self.time_spent),
      Metric::Conversion => Some(self.conversion),
      Metric::Revenue => self.revenue,
    }
  }

  /// The display cell for `column`.
  pub fn cell(&self, column: &str) -> Cell {
    match column {
      "date" => Cell::Text(self.date.to_string()),
      "segment" => Cell::Text(self.segment.clone()),
      "visits" => Cell::Integer(self.visits),
      "time_spent" => Cell::Number(self.time_spent),
      "conversion" => Cell::Number(self.conversion),
      REVENUE_COLUMN => self.revenue.map_or(Cell::Empty, Cell::Number),
      other => self
        .extra
        .get(other)
        .map_or(Cell::Empty, |v| Cell::Text(v.clone())),
    }
  }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single value as shown in the data table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
  Text(String),
  Integer(i64),
  Number(f64),
  Empty,
}

impl Cell {
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Integer(i) => Some(*i as f64),
      Self::Number(n) => Some(*n),
      Self::Text(_) | Self::Empty => None,
    }
  }

  /// Total order used when sorting table columns. Numbers compare
  /// numerically, everything else by its text; empty cells sort last.
  pub fn compare(&self, other: &Cell) -> Ordering {
    if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
      return a.total_cmp(&b);
    }
    match (self, other) {
      (Self::Empty, Self::Empty) => Ordering::Equal,
      (Self::Empty, _) => Ordering::Greater,
      (_, Self::Empty) => Ordering::Less,
      _ => self.to_string().cmp(&other.to_string()),
    }
  }
}

impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(s) => f.write_str(s),
      Self::Integer(i) => write!(f, "{i}"),
      Self::Number(n) => write!(f, "{n}"),
      Self::Empty => Ok(()),
    }
  }
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// An ordered set of records with the column layout of their source.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
  columns: Vec<String>,
  records: Vec<Record>,
}

impl RecordTable {
  /// Build a table, rejecting a column list that lacks any of
  /// [`REQUIRED_COLUMNS`].
  pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
    let missing = missing_columns(&columns);
    if !missing.is_empty() {
      return Err(Error::MissingColumns(missing));
    }
    Ok(Self { columns, records })
  }

  pub fn columns(&self) -> &[String] { &self.columns }

  pub fn records(&self) -> &[Record] { &self.records }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn has_revenue(&self) -> bool {
    self.columns.iter().any(|c| c == REVENUE_COLUMN)
  }

  /// Distinct segment labels in order of first appearance.
  pub fn segments(&self) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in &self.records {
      if !seen.contains(&record.segment) {
        seen.push(record.segment.clone());
      }
    }
    seen
  }

  /// One record rendered as cells in column order.
  pub fn row(&self, record: &Record) -> Vec<Cell> {
    self.columns.iter().map(|c| record.cell(c)).collect()
  }
}

/// The required columns absent from `columns`, in canonical order.
pub fn missing_columns(columns: &[String]) -> Vec<String> {
  REQUIRED_COLUMNS
    .iter()
    .filter(|req| !columns.iter().any(|c| c == *req))
    .map(|req| req.to_string())
    .collect()
}
