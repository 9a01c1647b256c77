use super::MissingImage;

use std::path::Path;

use image::{Rgb, RgbImage};
use log::warn;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// The two operands of a comparison, owned by the differ for the duration of one call.
pub struct ImagePair {
    pub reference: RgbImage,
    pub current: RgbImage,
}

pub fn load_pair(reference_path: &Path, current_path: &Path, policy: MissingImage, placeholder: (u32, u32)) -> Option<ImagePair> {
    let reference = open_rgb(reference_path);
    let current = open_rgb(current_path);
    resolve_missing(reference, current, policy, placeholder)
}

// any decode failure, including a missing file, counts as a missing image
pub fn open_rgb(path: &Path) -> Option<RgbImage> {
    match image::open(path) {
        Ok(img) => Some(img.into_rgb8()),
        Err(e) => {
            warn!("Failed to load image {}: {}", path.display(), e);
            None
        }
    }
}

pub fn resolve_missing(
    reference: Option<RgbImage>,
    current: Option<RgbImage>,
    policy: MissingImage,
    (placeholder_width, placeholder_height): (u32, u32),
) -> Option<ImagePair> {
    match (reference, current, policy) {
        (Some(reference), Some(current), _) => Some(ImagePair { reference, current }),
        (_, _, MissingImage::Fail) => {
            warn!("Failed to load one or both images, skipping comparison");
            None
        }
        (None, None, MissingImage::SubstituteWhite) => {
            warn!("Both images are missing, comparing two white {}x{} placeholders", placeholder_width, placeholder_height);
            Some(ImagePair {
                reference: white(placeholder_width, placeholder_height),
                current: white(placeholder_width, placeholder_height),
            })
        }
        (None, Some(current), MissingImage::SubstituteWhite) => {
            warn!("Reference image is missing, substituting a white image the size of the current image");
            Some(ImagePair {
                reference: white(current.width(), current.height()),
                current,
            })
        }
        (Some(reference), None, MissingImage::SubstituteWhite) => {
            warn!("Current image is missing, substituting a white image the size of the reference image");
            Some(ImagePair {
                current: white(reference.width(), reference.height()),
                reference,
            })
        }
    }
}

pub fn white(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    fn is_all_white(img: &RgbImage) -> bool {
        img.pixels().all(|p| *p == WHITE)
    }

    #[test]
    fn test_open_missing_file() {
        assert!(open_rgb(Path::new("test_results/does/not/exist.png")).is_none());
    }

    #[test]
    fn test_open_garbage_file() {
        let dir = Path::new("test_results/load_open_garbage_file");
        fs::create_dir_all(dir).expect("failed to create test dir");
        let path = dir.join("garbage.png");
        fs::write(&path, b"definitely not a png").expect("failed to write garbage");

        assert!(open_rgb(&path).is_none());
    }

    #[test]
    fn test_open_drops_alpha() {
        let dir = Path::new("test_results/load_open_drops_alpha");
        fs::create_dir_all(dir).expect("failed to create test dir");
        let path = dir.join("rgba.png");
        image::RgbaImage::from_pixel(7, 3, image::Rgba([10, 20, 30, 128])).save(&path).expect("failed to save image");

        let img = open_rgb(&path).expect("image should load");
        assert_eq!(img.dimensions(), (7, 3));
        assert_eq!(*img.get_pixel(0, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_both_present() {
        let pair = resolve_missing(Some(RgbImage::new(4, 5)), Some(RgbImage::new(6, 7)), MissingImage::Fail, (1, 1))
            .expect("both images are present");
        assert_eq!(pair.reference.dimensions(), (4, 5));
        assert_eq!(pair.current.dimensions(), (6, 7));
    }

    #[test]
    fn test_strict_rejects_missing() {
        assert!(resolve_missing(None, Some(RgbImage::new(4, 4)), MissingImage::Fail, (8, 8)).is_none());
        assert!(resolve_missing(Some(RgbImage::new(4, 4)), None, MissingImage::Fail, (8, 8)).is_none());
        assert!(resolve_missing(None, None, MissingImage::Fail, (8, 8)).is_none());
    }

    #[test]
    fn test_substitute_reference() {
        let pair = resolve_missing(None, Some(RgbImage::new(12, 9)), MissingImage::SubstituteWhite, (8, 8))
            .expect("placeholder should be substituted");
        assert_eq!(pair.reference.dimensions(), (12, 9));
        assert!(is_all_white(&pair.reference));
        assert!(!is_all_white(&pair.current));
    }

    #[test]
    fn test_substitute_current() {
        let pair = resolve_missing(Some(RgbImage::new(3, 11)), None, MissingImage::SubstituteWhite, (8, 8))
            .expect("placeholder should be substituted");
        assert_eq!(pair.current.dimensions(), (3, 11));
        assert!(is_all_white(&pair.current));
    }

    #[test]
    fn test_substitute_both() {
        let pair = resolve_missing(None, None, MissingImage::SubstituteWhite, (16, 9))
            .expect("placeholders should be substituted");
        assert_eq!(pair.reference.dimensions(), (16, 9));
        assert_eq!(pair.current.dimensions(), (16, 9));
        assert!(is_all_white(&pair.reference));
        assert!(is_all_white(&pair.current));
    }
}
