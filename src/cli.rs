use visual_diff::{Config, MissingImage, ResizePolicy, Threshold};

use std::path::PathBuf;
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// fail instead of comparing against a white image when an input cannot be loaded
    #[arg(short, long, default_value_t = false)]
    pub strict: bool,

    /// shrink both images to their common minimum size instead of stretching the current image to the reference
    #[arg(short, long, default_value_t = false)]
    pub resize_minimum: bool,

    /// grayscale difference (1-255) at which a pixel counts as changed; default is 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..))]
    pub sensitivity: u8,

    /// width of the circles drawn around changed regions; default is 2
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub stroke_width: u32,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// compares two images and writes `reference | annotated current | diff` to `output` when they differ too much
    Compare {
        reference: PathBuf,
        current: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        threshold: ThresholdArgs,
    },

    /// checks whether two images are similar without writing anything; always strict and resizes to the minimum
    Similar {
        reference: PathBuf,
        current: PathBuf,
        #[command(flatten)]
        threshold: ThresholdArgs,
    },
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ThresholdArgs {
    /// percentage of pixels allowed to differ, e.g. 5.0
    #[arg(long)]
    pub allowed_percent: Option<f64>,

    /// fraction of pixels required to be identical, e.g. 0.99
    #[arg(long)]
    pub similarity: Option<f64>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            missing_image: if self.strict { MissingImage::Fail } else { MissingImage::SubstituteWhite },
            resize: if self.resize_minimum { ResizePolicy::MatchMinimum } else { ResizePolicy::MatchReference },
            sensitivity_floor: self.sensitivity,
            stroke_width: self.stroke_width,
            ..Config::default()
        }
    }
}

impl ThresholdArgs {
    pub fn threshold(&self) -> Result<Threshold> {
        match (self.allowed_percent, self.similarity) {
            (Some(percent), None) => Ok(Threshold::AllowedPercent(percent)),
            (None, Some(similarity)) => Ok(Threshold::RequiredSimilarity(similarity)),
            _ => bail!("exactly one of --allowed-percent or --similarity must be given"),
        }
    }
}
