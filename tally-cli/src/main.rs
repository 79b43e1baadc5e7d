use anyhow::{Context, Result};
use clap::Parser;
use std::io::stderr;
use std::path::PathBuf;
use tally_finance::render_workbook;
use tally_ingest::ingest_dir;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

mod config;

use config::load_config;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Consolidate bank statement spreadsheets into an expense tracker workbook"
)]
struct Cli {
    /// Directory holding the statement files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Config file (default: <dir>/tally.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output workbook name, overrides the config
    #[arg(long)]
    output: Option<String>,

    /// error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Print the parse log as JSON after writing the workbook
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    let mut cfg = load_config(&cli.dir, cli.config.as_deref())?;
    if let Some(output) = cli.output {
        cfg.output = output;
    }

    let Some(ingestion) = ingest_dir(&cli.dir, &cfg.ingest, &cfg.output)? else {
        info!("No statements parsed in {}; nothing written", cli.dir.display());
        return Ok(());
    };

    let out_path = cfg.output_path(&cli.dir);
    render_workbook(&ingestion.ledger, &ingestion.log, cfg.layout, &out_path)
        .with_context(|| format!("writing {}", out_path.display()))?;

    println!("Saved -> {}", out_path.display());

    if cli.json {
        let json = serde_json::to_string_pretty(&ingestion.log).context("serialize parse log")?;
        println!("{json}");
    }
    Ok(())
}

fn setup_logging(level: LevelFilter) {
    // stdout carries the result line and JSON
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["tally"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("."));
        assert_eq!(cli.log_level, LevelFilter::INFO);
        assert!(cli.config.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "tally",
            "--dir",
            "statements",
            "--output",
            "out.xlsx",
            "--log-level",
            "debug",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.dir, PathBuf::from("statements"));
        assert_eq!(cli.output.as_deref(), Some("out.xlsx"));
        assert_eq!(cli.log_level, LevelFilter::DEBUG);
        assert!(cli.json);
    }

    #[test]
    fn test_bad_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["tally", "--log-level", "loud"]).is_err());
    }
}
