//! Paging, sorting and free-text filtering for the detail data table.

use serde::Serialize;

use crate::{
  Error, Result,
  record::{Cell, RecordTable},
};

/// Rows per page unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Parameters for [`RecordTable::page`].
#[derive(Debug, Clone)]
pub struct TableQuery {
  /// Zero-based page index; clamped to the last page.
  pub page:       usize,
  pub page_size:  usize,
  /// Column to sort by. Rows keep file order when `None`.
  pub sort:       Option<String>,
  pub descending: bool,
  /// Case-insensitive substring matched against every cell.
  pub filter:     Option<String>,
}

impl Default for TableQuery {
  fn default() -> Self {
    Self {
      page:       0,
      page_size:  DEFAULT_PAGE_SIZE,
      sort:       None,
      descending: false,
      filter:     None,
    }
  }
}

/// One page of the data table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
  pub columns:    Vec<String>,
  /// Cells in `columns` order.
  pub rows:       Vec<Vec<Cell>>,
  pub page:       usize,
  pub page_size:  usize,
  /// Rows matching the filter, across all pages.
  pub total_rows: usize,
  pub page_count: usize,
}

impl RecordTable {
  /// Filter, sort and slice the table according to `query`.
  pub fn page(&self, query: &TableQuery) -> Result<TablePage> {
    let sort_index = match &query.sort {
      Some(column) => Some(
        self
          .columns()
          .iter()
          .position(|c| c == column)
          .ok_or_else(|| Error::UnknownColumn(column.clone()))?,
      ),
      None => None,
    };

    let needle = query
      .filter
      .as_deref()
      .map(|f| f.trim().to_lowercase())
      .filter(|f| !f.is_empty());

    let mut rows: Vec<Vec<Cell>> = self
      .records()
      .iter()
      .map(|r| self.row(r))
      .filter(|row| match &needle {
        Some(n) => row.iter().any(|c| c.to_string().to_lowercase().contains(n)),
        None => true,
      })
      .collect();

    if let Some(idx) = sort_index {
      // Empty cells stay at the bottom in either direction.
      rows.sort_by(|a, b| match (&a[idx], &b[idx]) {
        (Cell::Empty, _) | (_, Cell::Empty) => a[idx].compare(&b[idx]),
        (x, y) if query.descending => x.compare(y).reverse(),
        (x, y) => x.compare(y),
      });
    }

    let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
    let total_rows = rows.len();
    let page_count = total_rows.div_ceil(page_size).max(1);
    let page = query.page.min(page_count - 1);

    let rows = rows
      .into_iter()
      .skip(page * page_size)
      .take(page_size)
      .collect();

    Ok(TablePage {
      columns: self.columns().to_vec(),
      rows,
      page,
      page_size,
      total_rows,
      page_count,
    })
  }
}
