use anyhow::Result;
use clap::Parser;
use ringcap::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

use ringcap::models::ReportMode;
use ringcap::pipeline::{Pipeline, PipelineSettings};
use ringcap::summarizer::CapacityPolicy;
use ringcap::window::FetchWindow;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

/// p95 / peak bandwidth vs. capacity per device, ring and region.
#[derive(Debug, Parser)]
#[command(name = "ringcap", version, about)]
struct Cli {
    /// Topology JSON (overrides report.topology_path).
    #[arg(long, env = "RINGCAP_TOPOLOGY")]
    topology: Option<PathBuf>,
    /// First day of the window, YYYY-MM-DD (default: end - report.lookback_days).
    #[arg(long)]
    start: Option<String>,
    /// Last day of the window, YYYY-MM-DD (default: today).
    #[arg(long)]
    end: Option<String>,
    #[arg(long, value_enum)]
    mode: Option<ReportMode>,
    #[arg(long, value_enum)]
    capacity_policy: Option<CapacityPolicy>,
    /// CSV destination (overrides report.output_path).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Concurrent fetch sessions (overrides fetch.parallelism).
    #[arg(long)]
    parallelism: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let mut app_config = config::AppConfig::load()?;
    if let Some(mode) = cli.mode {
        app_config.report.mode = mode;
    }
    if let Some(policy) = cli.capacity_policy {
        app_config.report.capacity_policy = Some(policy);
    }
    if let Some(path) = &cli.topology {
        app_config.report.topology_path = path.display().to_string();
    }
    if let Some(path) = &cli.output {
        app_config.report.output_path = path.display().to_string();
    }
    if let Some(n) = cli.parallelism {
        app_config.fetch.parallelism = n;
    }
    app_config.validate()?;

    let end = match &cli.end {
        Some(s) => window::parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let start = match &cli.start {
        Some(s) => window::parse_date(s)?,
        None => end
            .checked_sub_days(chrono::Days::new(app_config.report.lookback_days.into()))
            .ok_or_else(|| anyhow::anyhow!("lookback window underflows the calendar"))?,
    };
    let fetch_window = FetchWindow::from_dates(start, end)?;

    let report_config = &app_config.report;
    let interfaces = topology::load_topology(&report_config.topology_path)?;
    tracing::info!(
        topology = %report_config.topology_path,
        interfaces = interfaces.len(),
        mode = report_config.mode.as_str(),
        %start,
        %end,
        "Processing data"
    );

    let settings = PipelineSettings {
        mode: report_config.mode,
        policy: report_config.effective_policy(),
        merge_by: report_config.merge_by,
        parallelism: app_config.fetch.parallelism,
    };
    let pipeline = Pipeline::new(source::from_config(&app_config.source), settings);
    let summary = pipeline.run(&interfaces, fetch_window).await;

    if !summary.has_data() {
        tracing::warn!(
            interfaces = summary.interfaces,
            skipped = summary.skipped(),
            "No usable data found in RRD"
        );
        return Ok(());
    }

    report::write_csv(&report_config.output_path, &summary.rows, report_config.mode)?;
    println!("{}", report::render_table(&summary.rows, report_config.mode));
    tracing::info!(
        output = %report_config.output_path,
        rows = summary.rows.len(),
        skipped = summary.skipped(),
        "Analysis complete"
    );
    Ok(())
}
