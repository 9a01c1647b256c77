use super::ResizePolicy;
use super::load::ImagePair;

use image::{GrayImage, Rgb, RgbImage};
use image::imageops::{self, FilterType};
use itertools::izip;
use log::warn;

/// Everything derived from one reconciled image pair.
pub struct DiffMaps {
    /// per-channel absolute difference, kept in color for the composite
    pub color: RgbImage,
    /// 255 where the grayscale difference reaches the sensitivity floor, 0 elsewhere
    pub mask: GrayImage,
    pub different_pixels: u64,
    pub total_pixels: u64,
}

impl DiffMaps {
    pub fn new(pair: &ImagePair, sensitivity_floor: u8) -> DiffMaps {
        debug_assert_eq!(pair.reference.dimensions(), pair.current.dimensions());

        let color = absolute_difference(&pair.reference, &pair.current);
        let mask = binarize(imageops::grayscale(&color), sensitivity_floor);
        let different_pixels = mask.pixels().filter(|p| p[0] != 0).count() as u64;
        let total_pixels = u64::from(mask.width()) * u64::from(mask.height());

        DiffMaps {
            color,
            mask,
            different_pixels,
            total_pixels,
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        // multiply first so exact ratios like 100 / 10000 land exactly on 1.0
        self.different_pixels as f64 * 100.0 / self.total_pixels as f64
    }
}

/// Brings both images to the same size. Pairs that already agree are left untouched.
pub fn reconcile_sizes(pair: &mut ImagePair, policy: ResizePolicy, filter: FilterType) {
    let (ref_w, ref_h) = pair.reference.dimensions();
    let (cur_w, cur_h) = pair.current.dimensions();
    if (ref_w, ref_h) == (cur_w, cur_h) {
        return;
    }

    match policy {
        ResizePolicy::MatchReference => {
            warn!("Image sizes differ ({}x{} vs {}x{}), resizing current image to match reference", ref_w, ref_h, cur_w, cur_h);
            pair.current = imageops::resize(&pair.current, ref_w, ref_h, filter);
        }
        ResizePolicy::MatchMinimum => {
            let (width, height) = (ref_w.min(cur_w), ref_h.min(cur_h));
            warn!("Image sizes differ ({}x{} vs {}x{}), resizing both images to {}x{}", ref_w, ref_h, cur_w, cur_h, width, height);
            if pair.reference.dimensions() != (width, height) {
                pair.reference = imageops::resize(&pair.reference, width, height, filter);
            }
            if pair.current.dimensions() != (width, height) {
                pair.current = imageops::resize(&pair.current, width, height, filter);
            }
        }
    }
}

fn absolute_difference(a: &RgbImage, b: &RgbImage) -> RgbImage {
    let mut diff = RgbImage::new(a.width(), a.height());
    for (d, pa, pb) in izip!(diff.pixels_mut(), a.pixels(), b.pixels()) {
        *d = Rgb([pa[0].abs_diff(pb[0]), pa[1].abs_diff(pb[1]), pa[2].abs_diff(pb[2])]);
    }
    diff
}

fn binarize(mut gray: GrayImage, floor: u8) -> GrayImage {
    for p in gray.pixels_mut() {
        p[0] = if p[0] >= floor { 255 } else { 0 };
    }
    gray
}
