mod diff;
mod draw;
mod load;
pub mod region;

use crate::error::CompareError;
use crate::threshold::{within_allowed, Threshold};
use diff::DiffMaps;
use load::ImagePair;
use region::Region;

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use log::info;

/// What to do when an image cannot be decoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissingImage {
    /// skip the comparison and report a mismatch
    Fail,
    /// compare against a solid white image instead
    SubstituteWhite,
}

/// How two images of different sizes are brought to a common size.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResizePolicy {
    /// stretch the current image to the reference's exact size
    MatchReference,
    /// shrink both images to the element-wise minimum of their sizes
    MatchMinimum,
}

#[derive(Copy, Clone, Debug)]
pub struct Config {
    pub missing_image: MissingImage,
    pub resize: ResizePolicy,
    /// size of both placeholders when neither image loads
    pub placeholder_width: u32,
    pub placeholder_height: u32,
    /// grayscale difference at or above which a pixel counts as changed. The color difference is
    /// reduced with truncated Rec.709 luma, so a one-step change in a single channel, such as
    /// (0, 1, 0), reduces to 0 and is never flagged
    pub sensitivity_floor: u8,
    pub stroke_color: Rgb<u8>,
    pub stroke_width: u32,
    pub filter: FilterType,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            missing_image: MissingImage::SubstituteWhite,
            resize: ResizePolicy::MatchReference,
            placeholder_width: 1920,
            placeholder_height: 1080,
            sensitivity_floor: 1,
            stroke_color: Rgb([255, 0, 0]),
            stroke_width: 2,
            filter: FilterType::Triangle,
        }
    }
}

/// The verdict of one comparison along with the numbers behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub is_match: bool,
    pub difference_percentage: f64,
    pub different_pixels: u64,
    pub total_pixels: u64,
    /// only detected when the images do not match
    pub regions: Vec<Region>,
    /// set when a composite was actually written
    pub diff_image: Option<PathBuf>,
}

impl Comparison {
    // nothing could be compared, so nothing can be said to match
    fn unloaded() -> Comparison {
        Comparison {
            is_match: false,
            difference_percentage: 100.0,
            different_pixels: 0,
            total_pixels: 0,
            regions: Vec::new(),
            diff_image: None,
        }
    }
}

/// Compares a reference image against a current image and renders a composite when they diverge.
///
/// Each call loads, diffs and drops its own buffers, so one differ can serve many threads.
/// Calls that share an output path race on the final write and must be serialized by the caller.
#[derive(Clone, Debug)]
pub struct ImageDiffer {
    config: Config,
}

impl ImageDiffer {
    pub fn new(config: Config) -> Result<ImageDiffer, CompareError> {
        if config.sensitivity_floor == 0 {
            return Err(CompareError::InvalidConfig("sensitivity floor must be at least 1".into()));
        }
        if config.stroke_width == 0 {
            return Err(CompareError::InvalidConfig("stroke width must be at least 1".into()));
        }
        if config.placeholder_width == 0 || config.placeholder_height == 0 {
            return Err(CompareError::InvalidConfig(format!(
                "placeholder size must be non-zero, got {}x{}",
                config.placeholder_width, config.placeholder_height
            )));
        }
        Ok(ImageDiffer { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compares the images at `reference_path` and `current_path`. On mismatch, writes
    /// `reference | annotated current | diff` to `output_path`.
    ///
    /// Only an invalid threshold is an error. Unreadable images follow the configured
    /// [`MissingImage`] policy and a failed write only leaves `diff_image` unset.
    pub fn compare(&self, reference_path: &Path, current_path: &Path, output_path: &Path, threshold: Threshold) -> Result<Comparison, CompareError> {
        let allowed_percent = threshold.allowed_percent()?;
        let placeholder = (self.config.placeholder_width, self.config.placeholder_height);

        match load::load_pair(reference_path, current_path, self.config.missing_image, placeholder) {
            Some(pair) => Ok(self.compare_pair(pair, output_path, allowed_percent)),
            None => Ok(Comparison::unloaded()),
        }
    }

    /// Same as [`ImageDiffer::compare`] for images already in memory. The caller's buffers are
    /// copied, never annotated in place.
    pub fn compare_images(&self, reference: &RgbImage, current: &RgbImage, output_path: &Path, threshold: Threshold) -> Result<Comparison, CompareError> {
        let allowed_percent = threshold.allowed_percent()?;
        let pair = ImagePair {
            reference: reference.clone(),
            current: current.clone(),
        };
        Ok(self.compare_pair(pair, output_path, allowed_percent))
    }

    /// A quick pass/fail check that never writes anything. Always loads strictly and shrinks
    /// both images to their common minimum size, whatever the differ was configured with.
    pub fn is_similar(&self, reference_path: &Path, current_path: &Path, threshold: Threshold) -> Result<bool, CompareError> {
        let allowed_percent = threshold.allowed_percent()?;
        let placeholder = (self.config.placeholder_width, self.config.placeholder_height);

        let mut pair = match load::load_pair(reference_path, current_path, MissingImage::Fail, placeholder) {
            Some(pair) => pair,
            None => return Ok(false),
        };
        diff::reconcile_sizes(&mut pair, ResizePolicy::MatchMinimum, self.config.filter);

        let maps = DiffMaps::new(&pair, self.config.sensitivity_floor);
        let percentage = maps.percentage();
        info!("Difference percentage: {:.5}% ({} pixels)", percentage, maps.different_pixels);
        Ok(within_allowed(percentage, allowed_percent))
    }

    fn compare_pair(&self, mut pair: ImagePair, output_path: &Path, allowed_percent: f64) -> Comparison {
        diff::reconcile_sizes(&mut pair, self.config.resize, self.config.filter);

        let maps = DiffMaps::new(&pair, self.config.sensitivity_floor);
        let difference_percentage = maps.percentage();
        info!("Difference percentage: {:.5}% ({} different pixels)", difference_percentage, maps.different_pixels);

        let is_match = within_allowed(difference_percentage, allowed_percent);
        let mut comparison = Comparison {
            is_match,
            difference_percentage,
            different_pixels: maps.different_pixels,
            total_pixels: maps.total_pixels,
            regions: Vec::new(),
            diff_image: None,
        };
        if is_match {
            info!("Images match within the given threshold");
            return comparison;
        }

        info!("Images do not match, generating difference image");
        let ImagePair { reference, mut current } = pair;
        comparison.regions = region::find_regions(&maps.mask);
        draw::draw_regions(&mut current, &comparison.regions, self.config.stroke_color, self.config.stroke_width);

        let composite = draw::compose(&reference, &current, &maps.color);
        if draw::save_composite(&composite, output_path) {
            comparison.diff_image = Some(output_path.to_path_buf());
        }
        comparison
    }
}
