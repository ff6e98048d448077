//! The dashboard view: everything recomputed when the table or a selector
//! changes.
//!
//! Pipeline:
//!   RecordTable
//!     └─ filter_segments()        → rows in the selected segments
//!          ├─ resample()          → per-period sums     → line chart
//!          ├─ totals_by_segment() → per-segment sums    → pie chart
//!          ├─ (rows)              → histogram, scatter
//!          └─ summarize()         → four summary cards

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
  Error, Result,
  figure::{self, Figure},
  record::{Record, RecordTable},
  selector::{Metric, Period},
};

// ─── Request ─────────────────────────────────────────────────────────────────

/// The selector state a view is computed for.
#[derive(Debug, Clone, Default)]
pub struct ViewRequest {
  pub period:   Period,
  pub metric:   Metric,
  /// Segments to keep. Empty means every segment.
  pub segments: Vec<String>,
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Rows whose segment is in `segments`; all rows when `segments` is empty.
pub fn filter_segments<'a>(
  table: &'a RecordTable,
  segments: &[String],
) -> Vec<&'a Record> {
  table
    .records()
    .iter()
    .filter(|r| segments.is_empty() || segments.contains(&r.segment))
    .collect()
}

// ─── Resampling ──────────────────────────────────────────────────────────────

/// Column sums for one resampling bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotals {
  /// The bin label (see [`Period::bucket`]).
  pub date:       NaiveDate,
  pub visits:     f64,
  pub time_spent: f64,
  pub conversion: f64,
  /// Sum of the non-empty revenue cells.
  pub revenue:    f64,
}

impl PeriodTotals {
  fn zero(date: NaiveDate) -> Self {
    Self {
      date,
      visits: 0.0,
      time_spent: 0.0,
      conversion: 0.0,
      revenue: 0.0,
    }
  }

  fn add(&mut self, record: &Record) {
    self.visits += record.visits as f64;
    self.time_spent += record.time_spent;
    self.conversion += record.conversion;
    self.revenue += record.revenue.unwrap_or(0.0);
  }

  pub fn get(&self, metric: Metric) -> f64 {
    match metric {
      Metric::Visits => self.visits,
      Metric::TimeSpent => self.time_spent,
      Metric::Conversion => self.conversion,
      Metric::Revenue => self.revenue,
    }
  }
}

/// Sum `records` into consecutive `period` bins.
///
/// Every bin from the first populated one to the last is returned, in date
/// order; bins with no rows are all zeros.
pub fn resample(records: &[&Record], period: Period) -> Vec<PeriodTotals> {
  let mut bins: BTreeMap<NaiveDate, PeriodTotals> = BTreeMap::new();
  for record in records {
    let label = period.bucket(record.date);
    bins
      .entry(label)
      .or_insert_with(|| PeriodTotals::zero(label))
      .add(record);
  }

  let (Some(&first), Some(&last)) = (bins.keys().next(), bins.keys().last())
  else {
    return Vec::new();
  };

  let mut out = Vec::with_capacity(bins.len());
  let mut label = first;
  loop {
    out.push(
      bins
        .remove(&label)
        .unwrap_or_else(|| PeriodTotals::zero(label)),
    );
    match period.next(label) {
      Some(next) if next > label && next <= last => label = next,
      _ => break,
    }
  }
  out
}

// ─── Grouping ────────────────────────────────────────────────────────────────

/// Per-segment sum of `metric`, segments sorted by name. Missing values are
/// skipped.
pub fn totals_by_segment(
  records: &[&Record],
  metric: Metric,
) -> Vec<(String, f64)> {
  let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
  for record in records {
    let entry = totals.entry(record.segment.as_str()).or_insert(0.0);
    *entry += record.metric(metric).unwrap_or(0.0);
  }
  totals
    .into_iter()
    .map(|(segment, total)| (segment.to_string(), total))
    .collect()
}

/// Rows grouped by segment in order of first appearance.
pub fn group_by_segment<'a>(
  records: &[&'a Record],
) -> Vec<(String, Vec<&'a Record>)> {
  let mut groups: Vec<(String, Vec<&'a Record>)> = Vec::new();
  for record in records {
    match groups.iter_mut().find(|(s, _)| *s == record.segment) {
      Some((_, rows)) => rows.push(*record),
      None => groups.push((record.segment.clone(), vec![*record])),
    }
  }
  groups
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// The raw numbers behind the four summary cards.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Summary {
  pub rows:            usize,
  pub mean_time_spent: Option<f64>,
  pub mean_conversion: Option<f64>,
  /// `None` when the table has no revenue column or no revenue values.
  pub mean_revenue:    Option<f64>,
}

/// The formatted text of the four summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCards {
  pub total_customers:  String,
  pub avg_time:         String,
  pub total_conversion: String,
  pub avg_revenue:      String,
}

impl Summary {
  pub fn cards(&self) -> SummaryCards {
    SummaryCards {
      total_customers:  self.rows.to_string(),
      avg_time:         self
        .mean_time_spent
        .map_or_else(|| "0 min".to_string(), |m| format!("{m:.1} min")),
      total_conversion: self
        .mean_conversion
        .map_or_else(|| "0%".to_string(), |m| format!("{:.1}%", m * 100.0)),
      avg_revenue:      self
        .mean_revenue
        .map_or_else(|| "$0".to_string(), |m| format!("${m:.0}")),
    }
  }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
  let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
  (count > 0).then(|| sum / count as f64)
}

/// Summarise `records`. Revenue is only averaged when `has_revenue`.
pub fn summarize(records: &[&Record], has_revenue: bool) -> Summary {
  Summary {
    rows:            records.len(),
    mean_time_spent: mean(records.iter().map(|r| r.time_spent)),
    mean_conversion: mean(records.iter().map(|r| r.conversion)),
    mean_revenue:    if has_revenue {
      mean(records.iter().filter_map(|r| r.revenue))
    } else {
      None
    },
  }
}

// ─── View ────────────────────────────────────────────────────────────────────

/// The four chart figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figures {
  pub time_series: Figure,
  pub pie:         Figure,
  pub histogram:   Figure,
  pub scatter:     Figure,
}

impl Figures {
  pub fn empty() -> Self {
    Self {
      time_series: Figure::empty(),
      pie:         Figure::empty(),
      histogram:   Figure::empty(),
      scatter:     Figure::empty(),
    }
  }
}

/// Everything the dashboard renders for one selector state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
  pub figures: Figures,
  pub summary: Summary,
  pub cards:   SummaryCards,
  /// Number of resampled points in the line chart.
  pub points:  usize,
}

/// Compute the full view of `table` for `request`.
///
/// Returns [`Error::MetricUnavailable`] when revenue is requested from a table
/// without a revenue column. A selection that leaves no rows yields empty
/// figures and zeroed cards.
pub fn build_view(table: &RecordTable, request: &ViewRequest) -> Result<View> {
  if request.metric == Metric::Revenue && !table.has_revenue() {
    return Err(Error::MetricUnavailable(request.metric));
  }

  let rows = filter_segments(table, &request.segments);
  if rows.is_empty() {
    let summary = Summary::default();
    return Ok(View {
      figures: Figures::empty(),
      cards: summary.cards(),
      summary,
      points: 0,
    });
  }

  let series = resample(&rows, request.period);
  let segment_totals = totals_by_segment(&rows, request.metric);
  let groups = group_by_segment(&rows);
  let summary = summarize(&rows, table.has_revenue());

  let figures = Figures {
    time_series: figure::time_series(&series, request.metric),
    pie:         figure::segment_pie(&segment_totals, request.metric),
    histogram:   figure::distribution(&groups, request.metric),
    scatter:     figure::visits_vs_conversion(&groups, table.has_revenue()),
  };

  Ok(View {
    figures,
    cards: summary.cards(),
    summary,
    points: series.len(),
  })
}
