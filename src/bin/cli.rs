//! UAP Watch CLI
//!
//! Offline inspection of the sightings dataset:
//! - List months
//! - Show the per-country ranking for a month
//! - Validate the CSV
//! - Print a default config file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use uapwatch::charts::rank_by_sightings;
use uapwatch::config::{generate_default_config, Config};
use uapwatch::sightings::{load_dataset, SightingsDataset};

#[derive(Parser)]
#[command(name = "uapwatch-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect the UAP sightings dataset")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sightings CSV (default: dataset.path from config)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the distinct months, oldest first
    Months,

    /// Rank countries by sightings for a month
    Ranking {
        /// Month to rank (default: earliest month)
        #[arg(short, long)]
        month: Option<String>,
        /// Show only the top N countries
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Validate the dataset and print a summary
    Check,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let path = cli
        .data
        .clone()
        .unwrap_or_else(|| Config::from_env().dataset.path);
    let dataset =
        load_dataset(&path).with_context(|| format!("loading dataset {}", path.display()))?;
    let json = cli.format == OutputFormat::Json;

    match cli.command {
        Commands::Months => print_months(&dataset, json)?,
        Commands::Ranking { month, top } => print_ranking(&dataset, month, top, json)?,
        Commands::Check => print_check(&dataset, json)?,
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_months(dataset: &SightingsDataset, json: bool) -> Result<()> {
    let months = dataset.months();

    if json {
        println!("{}", serde_json::to_string_pretty(&months)?);
        return Ok(());
    }

    println!("{:<12} {:>10} {:>10}", "MONTH", "COUNTRIES", "SIGHTINGS");
    for month in months {
        let view = dataset.filter_by_month(&month);
        println!(
            "{:<12} {:>10} {:>10}",
            month,
            view.records.len(),
            view.total_sightings()
        );
    }
    Ok(())
}

fn print_ranking(
    dataset: &SightingsDataset,
    month: Option<String>,
    top: Option<usize>,
    json: bool,
) -> Result<()> {
    let Some(month) = month.or_else(|| dataset.default_month()) else {
        bail!("dataset has no months");
    };

    let view = dataset.filter_by_month(&month);
    let mut ranked = rank_by_sightings(&view.records);
    if let Some(n) = top {
        ranked.truncate(n);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No sightings for {}", month);
        return Ok(());
    }

    println!("Sightings for {}", month);
    println!("{:<4} {:<24} {:>10}", "#", "COUNTRY", "SIGHTINGS");
    for (idx, record) in ranked.iter().enumerate() {
        println!("{:<4} {:<24} {:>10}", idx + 1, record.country, record.sightings);
    }
    Ok(())
}

fn print_check(dataset: &SightingsDataset, json: bool) -> Result<()> {
    let months = dataset.months();
    let total: u64 = dataset.records().iter().map(|r| r.sightings).sum();

    if json {
        let summary = serde_json::json!({
            "records": dataset.len(),
            "months": months.len(),
            "first_month": months.first(),
            "last_month": months.last(),
            "total_sightings": total,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("✓ Dataset OK");
    println!("  Records:   {}", dataset.len());
    println!("  Months:    {}", months.len());
    if let (Some(first), Some(last)) = (months.first(), months.last()) {
        println!("  Range:     {} .. {}", first, last);
    }
    println!("  Sightings: {}", total);
    Ok(())
}
