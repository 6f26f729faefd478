//! Scorecard CLI - prepare and validate Scorecard subset CSVs
//!
//! ```bash
//! scorecard prepare --input Most_Recent_Cohorts.csv            # default output + states
//! scorecard prepare --input raw.csv --output out.csv --states MD,DC,VA
//! scorecard validate --input data/scorecard_subset.csv
//! ```

use clap::{Parser, Subcommand};
use scorecard_prep::{prepare, validate_file};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "scorecard")]
#[command(about = "Prepare and validate College Scorecard subset CSVs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare a presentation-ready subset CSV from a raw Scorecard export
    Prepare {
        /// Raw source CSV (Most_Recent_Cohorts*.csv)
        #[arg(long)]
        input: PathBuf,

        /// Destination CSV path
        #[arg(long, default_value = "data/scorecard_subset.csv")]
        output: PathBuf,

        /// States to keep (space- or comma-separated, case-insensitive)
        #[arg(
            long,
            num_args = 1..,
            value_delimiter = ',',
            default_values_t = ["MD".to_string(), "DC".to_string(), "VA".to_string()]
        )]
        states: Vec<String>,
    },

    /// Validate a prepared subset CSV
    Validate {
        /// CSV produced by the prepare stage
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Prepare { input, output, states } => cmd_prepare(&input, &output, &states),
        Commands::Validate { input } => cmd_validate(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_prepare(
    input: &Path,
    output: &Path,
    states: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Preparing: {}", input.display());
    prepare(input, output, states)?;
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    match validate_file(input) {
        Ok(report) => {
            eprintln!("   Rows: {}", report.rows);
            eprintln!("   States: {}", report.regions.join(", "));
            println!("VALIDATION PASSED");
            Ok(())
        }
        Err(e) => {
            eprintln!("VALIDATION FAILED: {}", e);
            std::process::exit(1);
        }
    }
}
