//! The dashboard page, rendered once at startup.
//!
//! The page is static apart from the selector options seeded from the
//! initial dataset; everything else is filled in by `dashboard.js` through
//! the JSON API.

use askama::Template;
use pulse_core::{
  selector::{Metric, Period, SelectOption},
  store::Dataset,
  table::DEFAULT_PAGE_SIZE,
};

pub const TITLE: &str = "Customer activity";
pub const SUBTITLE: &str = "Interactive dashboard for analysing customer behaviour";

/// One summary card: element id and heading.
pub struct Card {
  pub id:    &'static str,
  pub title: &'static str,
}

const CARDS: [Card; 4] = [
  Card { id: "total-customers",  title: "Total customers" },
  Card { id: "avg-time",         title: "Average time" },
  Card { id: "total-conversion", title: "Overall conversion" },
  Card { id: "avg-revenue",      title: "Average revenue" },
];

#[derive(Template)]
#[template(path = "index.html")]
pub struct Dashboard<'a> {
  pub title:          &'a str,
  pub subtitle:       &'a str,
  pub periods:        Vec<SelectOption>,
  pub default_period: String,
  pub metrics:        Vec<SelectOption>,
  pub default_metric: String,
  /// Segments of the initial dataset, all selected.
  pub segments:       Vec<String>,
  pub cards:          &'a [Card],
  pub page_size:      usize,
}

impl<'a> Dashboard<'a> {
  pub fn new(initial: &Dataset) -> Self {
    Self {
      title:          TITLE,
      subtitle:       SUBTITLE,
      periods:        Period::options(),
      default_period: Period::default().to_string(),
      metrics:        Metric::options(),
      default_metric: Metric::default().to_string(),
      segments:       initial.table.segments(),
      cards:          &CARDS,
      page_size:      DEFAULT_PAGE_SIZE,
    }
  }
}

/// Render the page for `initial`.
pub fn render(initial: &Dataset) -> askama::Result<String> {
  Dashboard::new(initial).render()
}
