// Entry point and high-level CLI flow.
//
// Loads the movie table once, then writes every chart series, the runtime
// histogram and a JSON summary into the output directory, printing a
// markdown preview of each as it goes.
use clap::Parser;
use movie_dashboard::config::{DashboardConfig, ParsePolicy};
use movie_dashboard::loader::{self, LoadReport, RecordStore};
use movie_dashboard::{output, reports, util};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "movie-dashboard", about = "Per-category revenue statistics for the movie dashboard")]
struct Args {
    /// CSV export of the movie table.
    #[arg(long)]
    data: PathBuf,

    /// JSON file overriding the default configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the CSV/JSON outputs are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Preferred category to highlight; repeat to add more. Replaces the
    /// configured list when given.
    #[arg(long = "preferred")]
    preferred: Vec<String>,

    /// Abort on the first malformed record instead of skipping it.
    #[arg(long)]
    strict: bool,
}

fn resolve_config(args: &Args) -> Result<DashboardConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)?,
        None => DashboardConfig::default(),
    };
    if !args.preferred.is_empty() {
        config.preferred_labels = args.preferred.clone();
    }
    if args.strict {
        config.parse_policy = ParsePolicy::Strict;
    }
    config.validate()?;
    Ok(config)
}

fn handle_load(path: &Path, config: &DashboardConfig) -> Result<(RecordStore, LoadReport), Box<dyn Error>> {
    let (store, load_report) = loader::load_and_clean(path, config.parse_policy)?;
    println!(
        "Processing dataset... ({} rows read, {} movies loaded)",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.loaded_rows)
    );
    if load_report.skipped_rows > 0 {
        println!(
            "Note: {} rows skipped due to parse/validation errors.",
            util::format_int(load_report.skipped_rows)
        );
    }
    println!();
    Ok((store, load_report))
}

fn handle_generate_reports(
    store: &RecordStore,
    load_report: &LoadReport,
    config: &DashboardConfig,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(out_dir)?;

    for chart in reports::generate_charts(store, config) {
        let file = out_dir.join(format!("chart_{}.csv", chart.spec.slug));
        if let Err(e) = output::write_csv(&file, &chart.rows) {
            error!(file = %file.display(), "write error: {e}");
        }
        output::preview_table(
            chart.spec.title,
            Some(format!("sorted by {:?} of {}", chart.spec.metric, chart.spec.target.name()).as_str()),
            &chart.rows,
            config.preview_rows,
        );
        println!("(Full table exported to {})\n", file.display());
    }

    let histogram = reports::generate_runtime_histogram(store, config)?;
    let file = out_dir.join("histogram_runtime.csv");
    if let Err(e) = output::write_csv(&file, &histogram) {
        error!(file = %file.display(), "write error: {e}");
    }
    output::preview_table(
        "Revenue by Runtime",
        Some(format!("{} equal-width bins", config.histogram_bins).as_str()),
        &histogram,
        config.histogram_bins,
    );

    let summary = reports::generate_summary(store, load_report);
    let file = out_dir.join("summary.json");
    output::write_json(&file, &summary)?;
    println!("Summary Stats ({}):", file.display());
    println!(
        "{{\"total_revenue\": {}, \"avg_rating\": {}}}\n",
        util::format_number(summary.total_revenue, config.decimals),
        util::format_number(summary.avg_rating, config.decimals)
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    info!(data = %args.data.display(), out_dir = %args.out_dir.display(), "starting");

    let (store, load_report) = handle_load(&args.data, &config)?;
    handle_generate_reports(&store, &load_report, &config, &args.out_dir)
}
