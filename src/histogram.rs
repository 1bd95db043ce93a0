use crate::error::{DashboardError, Result};
use crate::loader::RecordStore;
use crate::stats::RunningStats;
use crate::types::NumericField;

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    /// Records whose `x` falls in the bin, with or without a `y` value.
    pub count: usize,
    /// Sum of `y` over the records in the bin that have one.
    pub sum: f64,
    /// `None` when no record in the bin has a `y` value.
    pub mean: Option<f64>,
}

/// Equal-width bins of `x` over its observed range, accumulating `y`.
///
/// Bins are half-open `[start, end)` except the last, which also takes the
/// maximum. A degenerate range collapses into a single bin. Every record with
/// an `x` value is counted and shapes the range; only those that also have a
/// `y` value feed `sum` and `mean`.
pub fn histogram(
    store: &RecordStore,
    x: NumericField,
    y: NumericField,
    bins: usize,
) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(DashboardError::Config(
            "histogram needs at least one bin".to_string(),
        ));
    }
    let points: Vec<(f64, Option<f64>)> = store
        .records()
        .iter()
        .filter_map(|r| Some((x.value(r)?, y.value(r))))
        .collect();
    let Some(min) = points.iter().map(|p| p.0).reduce(f64::min) else {
        return Ok(Vec::new());
    };
    let max = points.iter().map(|p| p.0).fold(min, f64::max);

    let bins = if max > min { bins } else { 1 };
    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    let mut accs = vec![RunningStats::default(); bins];
    for (xv, yv) in points {
        let slot = if width > 0.0 {
            (((xv - min) / width).floor() as usize).min(bins - 1)
        } else {
            0
        };
        counts[slot] += 1;
        if let Some(yv) = yv {
            accs[slot].push(yv);
        }
    }

    Ok(accs
        .into_iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (acc, count))| HistogramBin {
            start: min + width * i as f64,
            end: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count,
            sum: acc.sum(),
            mean: acc.mean(),
        })
        .collect())
}
