use super::region::Region;
use crate::utils::ensure_parent_dir;

use std::path::Path;

use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;
use log::{error, info};

/// Outlines every region on `canvas`. The stroke is centered on the circle's radius.
pub fn draw_regions(canvas: &mut RgbImage, regions: &[Region], color: Rgb<u8>, stroke_width: u32) {
    let stroke_width = stroke_width as i32;
    for region in regions {
        let center = (region.center.x.round() as i32, region.center.y.round() as i32);
        let radius = region.radius as i32;
        for offset in 0..stroke_width {
            let ring = radius - stroke_width / 2 + offset;
            if ring >= 0 {
                draw_hollow_circle_mut(canvas, center, ring, color);
            }
        }
    }
}

/// Lays out `reference | annotated | diff` side by side. All three panels share the reference's size.
pub fn compose(reference: &RgbImage, annotated: &RgbImage, diff: &RgbImage) -> RgbImage {
    let (width, height) = reference.dimensions();
    let mut composite = RgbImage::new(width * 3, height);
    for (i, panel) in [reference, annotated, diff].into_iter().enumerate() {
        imageops::replace(&mut composite, panel, i64::from(width) * i as i64, 0);
    }
    composite
}

/// Writes the composite, creating missing parent directories first. Failures are logged, never returned.
pub fn save_composite(composite: &RgbImage, path: &Path) -> bool {
    // a failed mkdir still lets the write report its own error
    ensure_parent_dir(path);

    match composite.save(path) {
        Ok(()) => {
            info!("Diff image saved to: {}", path.display());
            true
        }
        Err(e) => {
            error!("Failed to save diff image to {}: {}", path.display(), e);
            false
        }
    }
}
