use crate::aggregate::{aggregate, SummaryTable};
use crate::categories::CategoryIndex;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::histogram::histogram;
use crate::loader::{LoadReport, RecordStore};
use crate::present::{Metric, SortKey};
use crate::stats::RunningStats;
use crate::types::{CategoryColumn, ChartRow, DashboardSummary, HistogramRow, NumericField};
use crate::util::format_number;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{info, warn};

/// One chart variant the dashboard can switch to.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub slug: &'static str,
    pub title: &'static str,
    pub column: CategoryColumn,
    pub target: NumericField,
    pub metric: Metric,
}

pub const CHARTS: [ChartSpec; 4] = [
    ChartSpec {
        slug: "genre_revenue_per_movie",
        title: "Genre Revenue per Movie",
        column: CategoryColumn::Genres,
        target: NumericField::Revenue,
        metric: Metric::Mean,
    },
    ChartSpec {
        slug: "genre_overall_revenue",
        title: "Overall Genre Revenue",
        column: CategoryColumn::Genres,
        target: NumericField::Revenue,
        metric: Metric::Sum,
    },
    ChartSpec {
        slug: "genre_average_rating",
        title: "Average Rating per Genre",
        column: CategoryColumn::Genres,
        target: NumericField::Rating,
        metric: Metric::Mean,
    },
    ChartSpec {
        slug: "distributor_revenue_per_movie",
        title: "Distributor Revenue per Movie",
        column: CategoryColumn::Distributor,
        target: NumericField::Revenue,
        metric: Metric::Mean,
    },
];

#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub spec: ChartSpec,
    pub rows: Vec<ChartRow>,
}

/// Build every chart in `CHARTS`. A chart whose aggregation fails is logged
/// and left out; the others are still produced.
pub fn generate_charts(store: &RecordStore, config: &DashboardConfig) -> Vec<ChartSeries> {
    let preferred = config.preferred_set();
    let mut indexes: HashMap<CategoryColumn, CategoryIndex> = HashMap::new();
    let mut tables: HashMap<(CategoryColumn, NumericField), SummaryTable> = HashMap::new();
    let mut charts = Vec::new();

    for spec in CHARTS {
        let table = match tables.entry((spec.column, spec.target)) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let index: &CategoryIndex = indexes
                    .entry(spec.column)
                    .or_insert_with(|| CategoryIndex::build(store, spec.column));
                match aggregate(store, index, index.universe(), &[spec.target]) {
                    Ok(table) => e.insert(table),
                    Err(err) => {
                        warn!(chart = spec.slug, "skipping chart: {err}");
                        continue;
                    }
                }
            }
        };

        // Highlight is computed from the sorted view, never the cached table.
        let sorted = table.sorted_by(SortKey::Stat(spec.target, spec.metric), true);
        let colors = sorted.highlight(
            &preferred,
            config.base_color.clone(),
            config.alt_color.clone(),
        );
        charts.push(ChartSeries {
            spec,
            rows: chart_rows(&sorted, spec.target, colors, config.decimals),
        });
    }
    info!(charts = charts.len(), "charts generated");
    charts
}

pub fn chart_rows(
    table: &SummaryTable,
    target: NumericField,
    colors: Vec<String>,
    decimals: usize,
) -> Vec<ChartRow> {
    table
        .series(target)
        .into_iter()
        .zip(colors)
        .map(|(point, color)| ChartRow {
            category: point.category,
            count: point.count,
            sum: format_number(point.sum, decimals),
            mean: format_number(point.mean, decimals),
            sd: format_number(point.sd, decimals),
            se: format_number(point.se, decimals),
            color,
        })
        .collect()
}

/// Revenue against runtime, binned; feeds the sum / average / count views.
pub fn generate_runtime_histogram(
    store: &RecordStore,
    config: &DashboardConfig,
) -> Result<Vec<HistogramRow>> {
    let bins = histogram(
        store,
        NumericField::Runtime,
        NumericField::Revenue,
        config.histogram_bins,
    )?;
    Ok(bins
        .into_iter()
        .map(|bin| HistogramRow {
            bin_start: format_number(bin.start, config.decimals),
            bin_end: format_number(bin.end, config.decimals),
            movies: bin.count,
            sum_revenue: format_number(bin.sum, config.decimals),
            avg_revenue: bin
                .mean
                .map(|m| format_number(m, config.decimals))
                .unwrap_or_default(),
        })
        .collect())
}

pub fn generate_summary(store: &RecordStore, load: &LoadReport) -> DashboardSummary {
    let records = store.records();
    let revenue: RunningStats = records.iter().filter_map(|r| r.revenue).collect();
    let rating: RunningStats = records.iter().filter_map(|r| r.rating).collect();
    let dates = records.iter().filter_map(|r| r.release_date);
    DashboardSummary {
        total_movies: records.len(),
        skipped_rows: load.skipped_rows,
        distinct_genres: CategoryIndex::build(store, CategoryColumn::Genres).universe().len(),
        distinct_distributors: CategoryIndex::build(store, CategoryColumn::Distributor)
            .universe()
            .len(),
        earliest_release: dates.clone().min(),
        latest_release: dates.max(),
        total_revenue: revenue.sum(),
        avg_rating: rating.mean().unwrap_or(0.0),
    }
}
