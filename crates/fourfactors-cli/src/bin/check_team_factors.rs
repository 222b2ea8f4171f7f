// Loads the newest processed team factors and prints a freshness report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use fourfactors_cli::init_tracing;
use fourfactors_core::config;
use fourfactors_core::load_team_factors;

#[derive(Parser)]
#[command(name = "check-team-factors")]
#[command(about = "Validate the latest processed team factors and report staleness", long_about = None)]
struct Cli {
    /// Base data directory (default: from config, else ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Maximum acceptable age in days (default: from config, else 3)
    #[arg(long)]
    max_age_days: Option<i64>,

    /// Number of rows to print
    #[arg(long, default_value = "5")]
    top: usize,

    /// Path to ingest.toml (default: config/ingest.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let max_age_days = cli.max_age_days.unwrap_or(config.max_age_days);
    info!("checking {} (max age {} days)", data_dir.display(), max_age_days);

    let loaded = load_team_factors(&data_dir, max_age_days)
        .with_context(|| format!("failed to load team factors from {}", data_dir.display()))?;

    println!("File: {}", loaded.path.display());
    match loaded.stamp {
        Some(stamp) => println!("Snapshot date: {stamp}"),
        None => println!("Snapshot date: unknown"),
    }
    println!("Rows: {}", loaded.table.len());
    if let Some(w) = &loaded.staleness {
        println!("WARNING: {w}");
    }

    let records = loaded
        .table
        .to_records()
        .context("processed file does not match the team factor schema")?;
    for r in records.iter().take(cli.top) {
        println!(
            "  {:<4} ORtg {:>6} DRtg {:>6} Net {:>6}",
            r.team,
            fmt_opt(r.ortg),
            fmt_opt(r.drtg),
            fmt_opt(r.netrtg)
        );
    }

    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".into(), |v| format!("{v:.1}"))
}
