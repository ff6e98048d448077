//! Core types and computations for the Pulse dashboard.
//!
//! This crate is deliberately free of HTTP and file-format dependencies.
//! It owns the record table, the period/metric selectors, the dataset store
//! abstraction, and every derived value the dashboard shows: filtered and
//! resampled series, per-segment totals, summary cards and chart figures.

pub mod error;
pub mod figure;
pub mod record;
pub mod sample;
pub mod selector;
pub mod store;
pub mod table;
pub mod view;

pub use error::{Error, Result};
