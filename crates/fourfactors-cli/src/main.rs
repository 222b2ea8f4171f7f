// Four Factors importer entry point.
//
// 1. Initialize tracing (stderr)
// 2. Load config (optional ingest.toml)
// 3. Normalize the raw export and write current + dated snapshots
// 4. Print a short run report

use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;

use fourfactors_cli::init_tracing;
use fourfactors_core::config;
use fourfactors_core::Importer;

#[derive(Parser)]
#[command(name = "import-team-factors")]
#[command(about = "Normalize a team Four Factors export and write processed snapshots", long_about = None)]
struct Cli {
    /// Raw export file (CSV)
    #[arg(long)]
    input: PathBuf,

    /// Snapshot date, YYYY-MM-DD (default: today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Output data directory; files go to <outdir>/processed (default: ./data)
    #[arg(long)]
    outdir: Option<PathBuf>,

    /// Path to ingest.toml (default: config/ingest.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = config::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let outdir = cli.outdir.unwrap_or_else(|| config.data_dir.clone());
    info!(
        "importing {} for {} into {}",
        cli.input.display(),
        date,
        outdir.display()
    );

    let summary = Importer::from_config(&config)
        .import_file(&cli.input, &outdir, date)
        .with_context(|| format!("import of {} failed", cli.input.display()))?;

    println!("[OK] {} import complete for {}", config.source, summary.date);
    println!(
        "Rows: {} | Sample teams: {}",
        summary.rows,
        summary.sample_teams.join(", ")
    );
    println!("Wrote:");
    for path in summary.paths.iter() {
        println!("  - {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_requires_input() {
        assert!(Cli::try_parse_from(["import-team-factors"]).is_err());
    }

    #[test]
    fn cli_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "import-team-factors",
            "--input",
            "raw.csv",
            "--date",
            "2025-11-05",
            "--outdir",
            "/tmp/out",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("raw.csv"));
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 11, 5));
        assert_eq!(cli.outdir, Some(PathBuf::from("/tmp/out")));
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_rejects_bad_date() {
        let res = Cli::try_parse_from([
            "import-team-factors",
            "--input",
            "raw.csv",
            "--date",
            "11/05/2025",
        ]);
        assert!(res.is_err());
    }
}
