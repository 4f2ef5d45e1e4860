//! Command-line ranking: reads a decision CSV, scores it and writes the
//! ranked CSV next to wherever the caller points it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use topsis_ranker::criteria::Criteria;
use topsis_ranker::engine;
use topsis_ranker::table::DataTable;

/// Rank alternatives in a CSV file with the TOPSIS method.
#[derive(Parser)]
#[command(name = "topsis", version, about)]
struct Cli {
    /// Input CSV: header row, identifier column, numeric criteria columns.
    input: PathBuf,
    /// Comma-separated criterion weights, e.g. "0.25,0.25,0.25,0.25".
    weights: String,
    /// Comma-separated criterion impacts, "+" or "-" per column.
    impacts: String,
    /// Where to write the ranked CSV.
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let table = DataTable::read_csv(&cli.input)?;
    let criteria = Criteria::parse(&cli.weights, &cli.impacts)?;
    let matrix = table.numeric_matrix()?;
    let ranking = engine::score(&matrix, &criteria.weights, &criteria.impacts)?;
    let ranked = table.into_ranked(&ranking)?;
    ranked.write_csv(&cli.output)?;

    println!(
        "Ranked {} alternatives -> {}",
        ranked.rows.len(),
        cli.output.display()
    );
    Ok(())
}
