//! Plotly figure descriptions.
//!
//! Each constructor returns a [`Figure`]: the `{data, layout}` pair that
//! Plotly.js' `Plotly.react` accepts. Binning for the histogram is left to
//! Plotly (`nbinsx`); everything else is computed here.

use serde::Serialize;
use serde_json::{Value, json};

use crate::{
  record::Record,
  selector::Metric,
  view::PeriodTotals,
};

/// Plotly's default qualitative palette, assigned to segments in order.
const PALETTE: [&str; 10] = [
  "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3",
  "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

/// Largest scatter marker diameter, in pixels.
const MAX_MARKER_SIZE: f64 = 20.0;

/// A chart description: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
  pub data:   Vec<Value>,
  pub layout: Value,
}

impl Figure {
  /// A figure with no traces; Plotly renders it as a blank plot.
  pub fn empty() -> Self {
    Self {
      data:   Vec::new(),
      layout: json!({}),
    }
  }
}

fn color(index: usize) -> &'static str { PALETTE[index % PALETTE.len()] }

/// Shared look of every chart: white background with light grid lines.
fn base_layout(title: &str) -> Value {
  json!({
    "title": { "text": title },
    "paper_bgcolor": "white",
    "plot_bgcolor": "white",
    "xaxis": { "gridcolor": "#EBF0F8", "zerolinecolor": "#EBF0F8" },
    "yaxis": { "gridcolor": "#EBF0F8", "zerolinecolor": "#EBF0F8" },
    "legend": { "tracegroupgap": 0 },
    "margin": { "t": 60 }
  })
}

fn set_axis_titles(layout: &mut Value, x: &str, y: &str) {
  layout["xaxis"]["title"] = json!({ "text": x });
  layout["yaxis"]["title"] = json!({ "text": y });
}

// ─── Line ────────────────────────────────────────────────────────────────────

/// `metric` summed per period over time.
pub fn time_series(points: &[PeriodTotals], metric: Metric) -> Figure {
  let x: Vec<String> = points.iter().map(|p| p.date.to_string()).collect();
  let y: Vec<f64> = points.iter().map(|p| p.get(metric)).collect();

  let trace = json!({
    "type": "scatter",
    "mode": "lines",
    "x": x,
    "y": y,
    "line": { "color": color(0) },
    "hovertemplate": format!("Date=%{{x}}<br>{}=%{{y}}<extra></extra>", metric.label()),
  });

  let mut layout = base_layout(&format!("{} by period", metric.label()));
  layout["hovermode"] = json!("x unified");
  set_axis_titles(&mut layout, "Date", metric.label());

  Figure {
    data: vec![trace],
    layout,
  }
}

// ─── Pie ─────────────────────────────────────────────────────────────────────

/// Share of `metric` per segment, as a donut.
pub fn segment_pie(totals: &[(String, f64)], metric: Metric) -> Figure {
  let labels: Vec<&str> = totals.iter().map(|(s, _)| s.as_str()).collect();
  let values: Vec<f64> = totals.iter().map(|(_, v)| *v).collect();

  let trace = json!({
    "type": "pie",
    "labels": labels,
    "values": values,
    "hole": 0.3,
    "textposition": "inside",
    "textinfo": "percent+label",
  });

  Figure {
    data:   vec![trace],
    layout: base_layout(&format!("{} by segment", metric.label())),
  }
}

// ─── Histogram ───────────────────────────────────────────────────────────────

/// Distribution of `metric`, one overlaid histogram per segment.
pub fn distribution(groups: &[(String, Vec<&Record>)], metric: Metric) -> Figure {
  let data = groups
    .iter()
    .enumerate()
    .map(|(i, (segment, rows))| {
      let x: Vec<f64> = rows.iter().filter_map(|r| r.metric(metric)).collect();
      json!({
        "type": "histogram",
        "name": segment,
        "legendgroup": segment,
        "x": x,
        "nbinsx": 10,
        "opacity": 0.6,
        "marker": { "color": color(i) },
      })
    })
    .collect();

  let mut layout = base_layout(&format!("Distribution of {}", metric.label()));
  layout["barmode"] = json!("overlay");
  layout["bargap"] = json!(0.1);
  set_axis_titles(&mut layout, metric.label(), "Number of records");

  Figure { data, layout }
}

// ─── Scatter ─────────────────────────────────────────────────────────────────

/// Visits against conversion, coloured by segment. When the table has a
/// revenue column, marker area is proportional to revenue.
pub fn visits_vs_conversion(
  groups: &[(String, Vec<&Record>)],
  has_revenue: bool,
) -> Figure {
  let max_revenue = groups
    .iter()
    .flat_map(|(_, rows)| rows.iter().filter_map(|r| r.revenue))
    .fold(0.0_f64, f64::max);
  let sized = has_revenue && max_revenue > 0.0;

  let data = groups
    .iter()
    .enumerate()
    .map(|(i, (segment, rows))| {
      let x: Vec<i64> = rows.iter().map(|r| r.visits).collect();
      let y: Vec<f64> = rows.iter().map(|r| r.conversion).collect();
      let dates: Vec<String> = rows.iter().map(|r| r.date.to_string()).collect();

      let mut marker = json!({ "color": color(i) });
      if sized {
        let sizes: Vec<f64> =
          rows.iter().map(|r| r.revenue.unwrap_or(0.0)).collect();
        marker["size"] = json!(sizes);
        marker["sizemode"] = json!("area");
        marker["sizeref"] =
          json!(2.0 * max_revenue / (MAX_MARKER_SIZE * MAX_MARKER_SIZE));
      }

      json!({
        "type": "scatter",
        "mode": "markers",
        "name": segment,
        "legendgroup": segment,
        "x": x,
        "y": y,
        "customdata": dates,
        "marker": marker,
        "hovertemplate": "Date=%{customdata}<br>Visits=%{x}<br>Conversion=%{y}<extra></extra>",
      })
    })
    .collect();

  let mut layout = base_layout("Visits vs. conversion");
  layout["legend"]["title"] = json!({ "text": "Segment" });
  set_axis_titles(&mut layout, "Visits", "Conversion rate");

  Figure { data, layout }
}
