mod cli;

use cli::{Cli, Commands};

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::error;
use visual_diff::ImageDiffer;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

// returns whether the images matched
fn run(cli: &Cli) -> Result<bool> {
    let differ = ImageDiffer::new(cli.config())?;

    match &cli.command {
        Commands::Compare { reference, current, output, threshold } => {
            let comparison = differ.compare(reference, current, output, threshold.threshold()?)?;
            println!(
                "{}: {:.5}% of pixels differ ({} of {}), {} region(s)",
                if comparison.is_match { "match" } else { "mismatch" },
                comparison.difference_percentage,
                comparison.different_pixels,
                comparison.total_pixels,
                comparison.regions.len(),
            );
            if let Some(path) = &comparison.diff_image {
                println!("diff image: {}", path.display());
            }
            Ok(comparison.is_match)
        }
        Commands::Similar { reference, current, threshold } => {
            let similar = differ.is_similar(reference, current, threshold.threshold()?)?;
            println!("{}", if similar { "similar" } else { "different" });
            Ok(similar)
        }
    }
}
