//! Snapshot Report Runner
//!
//! Feeds an exported observation snapshot through the analytics engine and
//! prints the selected report as JSON. The binary owns the clock and the
//! filesystem; the engine itself stays pure.
//!
//! Usage:
//!   cargo run --bin cropsight-report -- --snapshot observations.json --report dashboard
//!   cargo run --bin cropsight-report -- --snapshot observations.json --report advanced --days 14
//!   cargo run --bin cropsight-report -- --snapshot observations.json --report moisture --field F-012

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cropsight::{AnalyticsConfig, AnalyticsEngine, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportKind {
    /// Windowed dashboard statistics
    Dashboard,
    /// Soil-moisture time series
    Moisture,
    /// Growth time series with fertilizer comparison
    Growth,
    /// Narrative insights
    Insights,
    /// Combined advanced-analytics report
    Advanced,
}

#[derive(Debug, Parser)]
#[command(
    name = "cropsight-report",
    about = "Run an analytics report over an observation snapshot"
)]
struct Args {
    /// Path to the snapshot JSON ({"fields": [...], "observations": [...]})
    #[arg(long)]
    snapshot: PathBuf,

    /// Report to run
    #[arg(long, value_enum, default_value_t = ReportKind::Dashboard)]
    report: ReportKind,

    /// Report window length in days (default from config)
    #[arg(long)]
    days: Option<i64>,

    /// Window end date (defaults to today, UTC)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Restrict to one field (moisture/growth reports)
    #[arg(long)]
    field: Option<String>,

    /// Restrict to one crop variety (growth report)
    #[arg(long)]
    variety: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let contents = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read snapshot {}", args.snapshot.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse snapshot {}", args.snapshot.display()))?;

    info!(
        fields = snapshot.fields.len(),
        observations = snapshot.observations.len(),
        "loaded snapshot"
    );

    let config = AnalyticsConfig::load();
    let days = args.days.unwrap_or(config.report.default_window_days);
    let today = args
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let engine = AnalyticsEngine::new(config);

    let output = match args.report {
        ReportKind::Dashboard => {
            serde_json::to_value(engine.dashboard_stats(&snapshot, today, days)?)?
        }
        ReportKind::Moisture => serde_json::to_value(engine.moisture_trends(
            &snapshot,
            today,
            days,
            args.field.as_deref(),
        )?)?,
        ReportKind::Growth => serde_json::to_value(engine.growth_analysis(
            &snapshot,
            args.variety.as_deref(),
            args.field.as_deref(),
        ))?,
        ReportKind::Insights => serde_json::to_value(engine.insights(&snapshot, today, days)?)?,
        ReportKind::Advanced => {
            serde_json::to_value(engine.advanced_analytics(&snapshot, today, days)?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
