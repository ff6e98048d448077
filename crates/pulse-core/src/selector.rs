//! User-selectable inputs: aggregation [`Period`] and charted [`Metric`].

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A `{label, value}` pair for a drop-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
  pub label: String,
  pub value: String,
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// Resampling granularity. The string forms are the one-letter codes the
/// page sends (`D`, `W`, `M`, `Q`, `Y`).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
pub enum Period {
  #[default]
  #[serde(rename = "D")]
  #[strum(serialize = "D")]
  Day,
  #[serde(rename = "W")]
  #[strum(serialize = "W")]
  Week,
  #[serde(rename = "M")]
  #[strum(serialize = "M")]
  Month,
  #[serde(rename = "Q")]
  #[strum(serialize = "Q")]
  Quarter,
  #[serde(rename = "Y")]
  #[strum(serialize = "Y")]
  Year,
}

impl Period {
  pub fn label(self) -> &'static str {
    match self {
      Self::Day => "Day",
      Self::Week => "Week",
      Self::Month => "Month",
      Self::Quarter => "Quarter",
      Self::Year => "Year",
    }
  }

  /// The label of the bin that contains `date`.
  ///
  /// Weeks end on Sunday; months, quarters and years are labelled by their
  /// last calendar day.
  pub fn bucket(self, date: NaiveDate) -> NaiveDate {
    let end = match self {
      Self::Day => Some(date),
      Self::Week => {
        let to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
        date.checked_add_days(Days::new(u64::from(to_sunday)))
      }
      Self::Month => month_end(date.year(), date.month()),
      Self::Quarter => {
        month_end(date.year(), (date.month() - 1) / 3 * 3 + 3)
      }
      Self::Year => NaiveDate::from_ymd_opt(date.year(), 12, 31),
    };
    end.unwrap_or(NaiveDate::MAX)
  }

  /// The label of the bin following the one labelled `label`.
  pub fn next(self, label: NaiveDate) -> Option<NaiveDate> {
    label.succ_opt().map(|d| self.bucket(d))
  }

  pub fn options() -> Vec<SelectOption> {
    Self::iter()
      .map(|p| SelectOption {
        label: p.label().to_string(),
        value: p.to_string(),
      })
      .collect()
  }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
  let (next_year, next_month) =
    if month == 12 { (year + 1, 1) } else { (year, month + 1) };
  NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

// ─── Metric ──────────────────────────────────────────────────────────────────

/// The numeric column charted by the dashboard.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
  #[default]
  Visits,
  TimeSpent,
  Conversion,
  Revenue,
}

impl Metric {
  /// Column name in the record table.
  pub fn column(self) -> &'static str {
    match self {
      Self::Visits => "visits",
      Self::TimeSpent => "time_spent",
      Self::Conversion => "conversion",
      Self::Revenue => "revenue",
    }
  }

  /// Human-readable label used in chart titles and axes.
  pub fn label(self) -> &'static str {
    match self {
      Self::Visits => "Visits",
      Self::TimeSpent => "Time on site (min)",
      Self::Conversion => "Conversion (%)",
      Self::Revenue => "Revenue ($)",
    }
  }

  pub fn options() -> Vec<SelectOption> {
    Self::iter()
      .map(|m| SelectOption {
        label: m.label().to_string(),
        value: m.column().to_string(),
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn week_bins_end_on_sunday() {
    // 2023-01-01 is itself a Sunday.
    assert_eq!(Period::Week.bucket(date(2023, 1, 1)), date(2023, 1, 1));
    assert_eq!(Period::Week.bucket(date(2023, 1, 2)), date(2023, 1, 8));
    assert_eq!(Period::Week.bucket(date(2023, 1, 8)), date(2023, 1, 8));
    assert_eq!(Period::Week.bucket(date(2023, 1, 10)), date(2023, 1, 15));
  }

  #[test]
  fn calendar_bins_use_last_day() {
    assert_eq!(Period::Month.bucket(date(2024, 2, 10)), date(2024, 2, 29));
    assert_eq!(Period::Month.bucket(date(2023, 12, 1)), date(2023, 12, 31));
    assert_eq!(Period::Quarter.bucket(date(2023, 5, 3)), date(2023, 6, 30));
    assert_eq!(Period::Quarter.bucket(date(2023, 11, 3)), date(2023, 12, 31));
    assert_eq!(Period::Year.bucket(date(2023, 7, 4)), date(2023, 12, 31));
  }

  #[test]
  fn next_steps_one_bin() {
    assert_eq!(Period::Day.next(date(2023, 1, 31)), Some(date(2023, 2, 1)));
    assert_eq!(Period::Month.next(date(2023, 1, 31)), Some(date(2023, 2, 28)));
    assert_eq!(Period::Quarter.next(date(2023, 12, 31)), Some(date(2024, 3, 31)));
  }

  #[test]
  fn string_forms_match_page_values() {
    assert_eq!(Period::from_str("Q").unwrap(), Period::Quarter);
    assert_eq!(Period::Week.to_string(), "W");
    assert_eq!(Metric::from_str("time_spent").unwrap(), Metric::TimeSpent);
    assert_eq!(Metric::Conversion.to_string(), "conversion");
    let json = serde_json::to_string(&Period::Month).unwrap();
    assert_eq!(json, "\"M\"");
  }

  #[test]
  fn options_cover_every_variant() {
    let periods: Vec<String> =
      Period::options().into_iter().map(|o| o.value).collect();
    assert_eq!(periods, vec!["D", "W", "M", "Q", "Y"]);
    assert_eq!(Metric::options().len(), 4);
  }
}
