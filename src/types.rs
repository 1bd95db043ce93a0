use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Header names the loader insists on before any row is read.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Revenue",
    "Rating",
    "Runtime",
    "Release Date",
    "Distributor",
    "Genres",
];

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Revenue")]
    pub revenue: Option<String>,
    #[serde(rename = "Rating")]
    pub rating: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Release Date")]
    pub release_date: Option<String>,
    #[serde(rename = "Distributor")]
    pub distributor: Option<String>,
    #[serde(rename = "Genres")]
    pub genres: Option<String>,
}

/// One movie after cleaning. Numeric fields are `None` when the source cell
/// was missing or unusable; such a record is left out of statistics over
/// that field only.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: Option<String>,
    pub revenue: Option<f64>,
    pub rating: Option<f64>,
    pub runtime: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub distributor: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericField {
    Revenue,
    Rating,
    Runtime,
}

impl NumericField {
    pub fn name(self) -> &'static str {
        match self {
            NumericField::Revenue => "Revenue",
            NumericField::Rating => "Rating",
            NumericField::Runtime => "Runtime",
        }
    }

    pub fn value(self, record: &MovieRecord) -> Option<f64> {
        match self {
            NumericField::Revenue => record.revenue,
            NumericField::Rating => record.rating,
            NumericField::Runtime => record.runtime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryColumn {
    /// Single-valued: every record has exactly one distributor.
    Distributor,
    /// Multi-valued: every record has a non-empty set of genres.
    Genres,
}

impl CategoryColumn {
    pub fn name(self) -> &'static str {
        match self {
            CategoryColumn::Distributor => "Distributor",
            CategoryColumn::Genres => "Genres",
        }
    }

    pub fn is_multi_valued(self) -> bool {
        matches!(self, CategoryColumn::Genres)
    }

    /// Labels a record carries for this column, as a slice in both cases so
    /// callers never branch on cardinality.
    pub fn labels(self, record: &MovieRecord) -> &[String] {
        match self {
            CategoryColumn::Distributor => std::slice::from_ref(&record.distributor),
            CategoryColumn::Genres => &record.genres,
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ChartRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Sum")]
    #[tabled(rename = "Sum")]
    pub sum: String,
    #[serde(rename = "Mean")]
    #[tabled(rename = "Mean")]
    pub mean: String,
    #[serde(rename = "SD")]
    #[tabled(rename = "SD")]
    pub sd: String,
    #[serde(rename = "SE")]
    #[tabled(rename = "SE")]
    pub se: String,
    #[serde(rename = "Color")]
    #[tabled(rename = "Color")]
    pub color: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct HistogramRow {
    #[serde(rename = "BinStart")]
    #[tabled(rename = "BinStart")]
    pub bin_start: String,
    #[serde(rename = "BinEnd")]
    #[tabled(rename = "BinEnd")]
    pub bin_end: String,
    #[serde(rename = "Movies")]
    #[tabled(rename = "Movies")]
    pub movies: usize,
    #[serde(rename = "SumRevenue")]
    #[tabled(rename = "SumRevenue")]
    pub sum_revenue: String,
    #[serde(rename = "AvgRevenue")]
    #[tabled(rename = "AvgRevenue")]
    pub avg_revenue: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_movies: usize,
    pub skipped_rows: usize,
    pub distinct_genres: usize,
    pub distinct_distributors: usize,
    pub earliest_release: Option<NaiveDate>,
    pub latest_release: Option<NaiveDate>,
    pub total_revenue: f64,
    pub avg_rating: f64,
}
