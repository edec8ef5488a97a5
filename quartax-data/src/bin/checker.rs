use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use quartax_core::FilingStatus;
use quartax_core::calculations::TableId;
use quartax_core::calculations::common::to_currency_string;
use quartax_data::BracketTableLoader;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Validate a bracket-table override CSV file.
///
/// The CSV file should have the following columns:
/// - table: the table id (india, usa-single, usa-married, uk, canada,
///   australia, germany, france, japan)
/// - upper_bound: the bracket's upper income bound (empty for unbounded)
/// - rate: the marginal tax rate as a decimal (e.g. 0.22)
///
/// Optionally evaluates a sample annual income against the loaded tables
/// so new figures can be sanity-checked before deployment.
#[derive(Parser, Debug)]
#[command(name = "quartax-data-checker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing bracket table overrides
    #[arg(short, long)]
    file: PathBuf,

    /// Country to evaluate the sample income against (free text, e.g. "USA")
    #[arg(short, long, requires = "income")]
    country: Option<String>,

    /// Annual taxable income to evaluate against the loaded tables
    #[arg(short, long, requires = "country")]
    income: Option<Decimal>,

    /// Filing status for the sample evaluation (only affects USA)
    #[arg(long, default_value = "single")]
    filing_status: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = BracketTableLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} bracket rows from CSV", records.len());

    let tables = BracketTableLoader::build(&records)
        .context("Failed to validate bracket tables")?;

    for id in TableId::ALL {
        let rows = records.iter().filter(|r| r.table == id.as_str()).count();
        if rows > 0 {
            println!("  {}: {} brackets (override)", id.as_str(), rows);
        }
    }
    println!("All tables valid.");

    if let (Some(country), Some(income)) = (args.country, args.income) {
        let filing_status = FilingStatus::from_input(&args.filing_status);
        let result = tables.annual_tax_for(&country, income, filing_status);

        println!(
            "Annual tax for {} at {}: {}",
            country,
            income,
            to_currency_string(result.amount)
        );
        if result.fallback_rate_applied {
            println!("Warning: no bracket table for that country; flat 15% fallback was used.");
        }
    }

    Ok(())
}
