use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use policy_core::analysis::differences_for_year;
use policy_core::format::format_number;
use policy_core::{ReformParams, Simulation};
use policy_data::CsvSimulation;

/// Summarise a directory of simulation results.
///
/// The directory must hold `base_<year>.csv` and `reform_<year>.csv` for
/// every year from `--start-year` to `--end-year`. For each year this prints
/// the record count and the weighted change in each tax.
#[derive(Parser, Debug)]
#[command(name = "policy-results")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the result CSV files
    #[arg(short, long)]
    dir: PathBuf,

    /// First year of the budget window
    #[arg(short, long)]
    start_year: i32,

    /// Last year of the budget window (defaults to the start year)
    #[arg(short, long)]
    end_year: Option<i32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let end_year = args.end_year.unwrap_or(args.start_year);

    println!("Loading results from: {}", args.dir.display());

    let mut sim = CsvSimulation::new(&args.dir, args.start_year, end_year, ReformParams::default());
    sim.run()
        .with_context(|| format!("Failed to load results from: {}", args.dir.display()))?;

    for year in sim.years() {
        let rows = sim.base_results(year)?.rows();
        println!("{year}: {rows} records");

        let diffs = differences_for_year(&sim, year)
            .with_context(|| format!("Failed to compute differences for {year}"))?;
        for diff in diffs {
            println!(
                "  {:<12} {:>20} -> {:>20} ({})",
                diff.label,
                format_number(diff.base, 0),
                format_number(diff.reform, 0),
                format_number(diff.difference, 0),
            );
        }
    }

    Ok(())
}
