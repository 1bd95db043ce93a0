use crate::config::ParsePolicy;
use crate::error::{DashboardError, Result};
use crate::types::{MovieRecord, RawRow, REQUIRED_COLUMNS};
use crate::util::{parse_date_safe, parse_f64_safe, parse_label_list};
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
}

/// Immutable snapshot of every cleaned record. Built once by the loader;
/// everything downstream only borrows it.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<MovieRecord>,
}

impl RecordStore {
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn load_and_clean(path: &Path, policy: ParsePolicy) -> Result<(RecordStore, LoadReport)> {
    let rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_path(path)
        .map_err(|source| DashboardError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), "loading movie table");
    load_records(rdr, policy)
}

pub fn load_from_reader<R: Read>(reader: R, policy: ParsePolicy) -> Result<(RecordStore, LoadReport)> {
    let rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);
    load_records(rdr, policy)
}

fn load_records<R: Read>(
    mut rdr: csv::Reader<R>,
    policy: ParsePolicy,
) -> Result<(RecordStore, LoadReport)> {
    let headers = rdr.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DashboardError::MissingColumn(required));
        }
    }

    let mut report = LoadReport::default();
    let mut records: Vec<MovieRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row_no = report.total_rows;
        let cleaned = result
            .map_err(|e| DashboardError::Parse {
                row: row_no,
                column: "row",
                value: String::new(),
                reason: e.to_string(),
            })
            .and_then(|raw| clean_row(raw, row_no));

        match cleaned {
            Ok(record) => records.push(record),
            Err(err) => match policy {
                ParsePolicy::Strict => return Err(err),
                ParsePolicy::Skip => {
                    warn!("skipping record: {err}");
                    report.skipped_rows += 1;
                }
            },
        }
    }

    report.loaded_rows = records.len();
    info!(
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.skipped_rows,
        "movie table loaded"
    );
    Ok((RecordStore::from_records(records), report))
}

fn clean_row(row: RawRow, row_no: usize) -> Result<MovieRecord> {
    let distributor = row
        .distributor
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if distributor.is_empty() {
        return Err(DashboardError::Parse {
            row: row_no,
            column: "Distributor",
            value: String::new(),
            reason: "a distributor is required".to_string(),
        });
    }

    let raw_genres = row.genres.unwrap_or_default();
    let genres = parse_label_list(&raw_genres).map_err(|reason| DashboardError::Parse {
        row: row_no,
        column: "Genres",
        value: raw_genres.clone(),
        reason,
    })?;

    let revenue = non_negative(parse_f64_safe(row.revenue.as_deref()), "Revenue", row_no);
    let runtime = non_negative(parse_f64_safe(row.runtime.as_deref()), "Runtime", row_no);

    Ok(MovieRecord {
        title: row
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        revenue,
        rating: parse_f64_safe(row.rating.as_deref()),
        runtime,
        release_date: parse_date_safe(row.release_date.as_deref()),
        distributor,
        genres,
    })
}

fn non_negative(value: Option<f64>, column: &str, row_no: usize) -> Option<f64> {
    match value {
        Some(v) if v < 0.0 => {
            debug!(row = row_no, column, value = v, "negative value treated as missing");
            None
        }
        other => other,
    }
}
