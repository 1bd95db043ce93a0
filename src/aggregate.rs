use crate::categories::CategoryIndex;
use crate::error::{DashboardError, Result};
use crate::loader::RecordStore;
use crate::stats::{standard_error, RunningStats};
use crate::types::{CategoryColumn, NumericField};
use serde::Serialize;
use tracing::debug;

/// Statistics of one numeric target within one category. `count` only
/// includes records that actually had a value for the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub sd: f64,
    pub se: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub category: String,
    /// Records whose column equals / contains `category`.
    pub members: usize,
    stats: Vec<(NumericField, TargetStats)>,
}

impl SummaryRow {
    pub fn stats(&self, target: NumericField) -> Option<&TargetStats> {
        self.stats
            .iter()
            .find(|(field, _)| *field == target)
            .map(|(_, stats)| stats)
    }
}

/// The flat `{category, count, sum, mean, sd, se}` shape handed to charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub category: String,
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub sd: f64,
    pub se: f64,
}

/// Summary rows for one (column, targets) aggregation. Never mutated after
/// construction; sorting yields a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub(crate) column: CategoryColumn,
    pub(crate) targets: Vec<NumericField>,
    pub(crate) rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn column(&self) -> CategoryColumn {
        self.column
    }

    pub fn targets(&self) -> &[NumericField] {
        &self.targets
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows flattened for a single target, in the table's current order.
    pub fn series(&self, target: NumericField) -> Vec<SeriesPoint> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.stats(target).map(|s| SeriesPoint {
                    category: row.category.clone(),
                    count: s.count,
                    sum: s.sum,
                    mean: s.mean,
                    sd: s.sd,
                    se: s.se,
                })
            })
            .collect()
    }
}

/// One summary row per label of `universe`, in universe order.
///
/// Fails with `EmptyCategory` when a label has no record carrying a value for
/// one of the targets; the partial table is discarded.
pub fn aggregate(
    store: &RecordStore,
    index: &CategoryIndex,
    universe: &[String],
    targets: &[NumericField],
) -> Result<SummaryTable> {
    let records = store.records();
    let mut rows = Vec::with_capacity(universe.len());
    for category in universe {
        let members = index.members(category);
        let mut stats = Vec::with_capacity(targets.len());
        for &target in targets {
            let acc: RunningStats = members
                .iter()
                .filter_map(|&i| records.get(i))
                .filter_map(|record| target.value(record))
                .collect();
            stats.push((target, summarize(category, target, &acc)?));
        }
        rows.push(SummaryRow {
            category: category.clone(),
            members: members.len(),
            stats,
        });
    }
    debug!(
        column = index.column().name(),
        multi_valued = index.column().is_multi_valued(),
        categories = rows.len(),
        "aggregation complete"
    );
    Ok(SummaryTable {
        column: index.column(),
        targets: targets.to_vec(),
        rows,
    })
}

/// Convenience wrapper: index the column and aggregate over its full universe.
pub fn aggregate_column(
    store: &RecordStore,
    column: CategoryColumn,
    targets: &[NumericField],
) -> Result<SummaryTable> {
    let index = CategoryIndex::build(store, column);
    aggregate(store, &index, index.universe(), targets)
}

fn summarize(category: &str, target: NumericField, acc: &RunningStats) -> Result<TargetStats> {
    let (Some(mean), Some(sd)) = (acc.mean(), acc.std_pop()) else {
        return Err(DashboardError::EmptyCategory {
            category: category.to_string(),
            target: target.name(),
        });
    };
    Ok(TargetStats {
        count: acc.count(),
        sum: acc.sum(),
        mean,
        sd,
        se: standard_error(sd, acc.count())?,
    })
}
