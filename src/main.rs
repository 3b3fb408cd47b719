use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use tx_latency::{write_artifacts, Extractor, ExtractorConfig, Report};

/// Turn JSON Lines load-test logs into latency CSVs and summary statistics
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read JSON Lines from stdin and write timestamp/latency CSVs
    Parse {
        /// Directory the CSV files are written to
        #[arg(long, default_value = "docs")]
        out_dir: PathBuf,
        /// Only write the full set, without create/update subsets
        #[arg(long)]
        no_categorize: bool,
    },
    /// Print throughput and latency statistics from previously written CSVs
    Report {
        /// Directory holding the CSV files
        #[arg(long, default_value = "docs")]
        dir: PathBuf,
    },
}

fn parse(out_dir: PathBuf, no_categorize: bool) -> Result<()> {
    let config = ExtractorConfig {
        enable_categorization: !no_categorize,
    };
    let extraction =
        Extractor::extract(config, io::stdin().lock()).context("failed to read log from stdin")?;
    debug!(
        "skipped {} malformed and {} incomplete lines",
        extraction.malformed(),
        extraction.incomplete()
    );

    let written = write_artifacts(&out_dir, &extraction)
        .with_context(|| format!("failed to write csv files to {}", out_dir.display()))?;
    for path in &written {
        info!("wrote {}", path.display());
    }

    println!("{}", extraction.summary());
    Ok(())
}

fn report(dir: PathBuf) -> Result<()> {
    let report = Report::from_dir(&dir)
        .with_context(|| format!("failed to read csv files from {}", dir.display()))?;
    println!("{report}");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Parse {
            out_dir,
            no_categorize,
        } => parse(out_dir, no_categorize),
        Command::Report { dir } => report(dir),
    }
}
