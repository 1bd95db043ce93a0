//! Aggregation engine behind the movie revenue dashboard.
//!
//! Data flows one way: `loader` builds an immutable [`RecordStore`],
//! `categories` indexes a categorical column, `aggregate` produces a
//! [`SummaryTable`], and `present` orders it and derives highlight
//! partitions for whatever draws the charts.
pub mod aggregate;
pub mod categories;
pub mod config;
pub mod error;
pub mod histogram;
pub mod loader;
pub mod output;
pub mod present;
pub mod reports;
pub mod stats;
pub mod types;
pub mod util;

pub use aggregate::{aggregate, aggregate_column, SeriesPoint, SummaryRow, SummaryTable, TargetStats};
pub use categories::{categories, CategoryIndex};
pub use config::{DashboardConfig, ParsePolicy};
pub use error::{DashboardError, Result};
pub use loader::{load_and_clean, load_from_reader, LoadReport, RecordStore};
pub use present::{highlight, sort_by, Metric, SortKey};
pub use stats::standard_error;
pub use types::{CategoryColumn, MovieRecord, NumericField};
