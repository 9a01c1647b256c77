use crate::error::CompareError;

// absorbs the rounding of `100 - similarity * 100`; far below one pixel's share of any image
const BOUNDARY_EPSILON: f64 = 1e-9;

/// How much of an image may change before two images stop matching.
///
/// Both variants name their unit so a bare `0.99` can never be read as
/// "0.99 percent" by accident.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Threshold {
    /// percentage of pixels allowed to differ, in `0.0..=100.0`
    AllowedPercent(f64),
    /// fraction of pixels required to be identical, in `0.0..=1.0`
    RequiredSimilarity(f64),
}

impl Threshold {
    /// Validates the threshold and converts it into an allowed difference percentage.
    pub fn allowed_percent(&self) -> Result<f64, CompareError> {
        match *self {
            Threshold::AllowedPercent(percent) => {
                if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
                    return Err(CompareError::InvalidThreshold(format!(
                        "allowed difference must be between 0 and 100 percent, got {}", percent
                    )));
                }
                Ok(percent)
            }
            Threshold::RequiredSimilarity(similarity) => {
                if !similarity.is_finite() || !(0.0..=1.0).contains(&similarity) {
                    return Err(CompareError::InvalidThreshold(format!(
                        "required similarity must be between 0 and 1, got {}", similarity
                    )));
                }
                Ok(100.0 - similarity * 100.0)
            }
        }
    }
}

/// Inclusive boundary check between a measured difference and an allowed percentage.
pub fn within_allowed(difference_percentage: f64, allowed_percent: f64) -> bool {
    difference_percentage <= allowed_percent + BOUNDARY_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_percent_passthrough() {
        assert_eq!(Threshold::AllowedPercent(5.0).allowed_percent(), Ok(5.0));
        assert_eq!(Threshold::AllowedPercent(0.0).allowed_percent(), Ok(0.0));
        assert_eq!(Threshold::AllowedPercent(100.0).allowed_percent(), Ok(100.0));
    }

    #[test]
    fn test_similarity_conversion() {
        let allowed = Threshold::RequiredSimilarity(0.99).allowed_percent().expect("valid similarity");
        assert!((allowed - 1.0).abs() < 1e-9);

        assert_eq!(Threshold::RequiredSimilarity(1.0).allowed_percent(), Ok(0.0));
        assert_eq!(Threshold::RequiredSimilarity(0.0).allowed_percent(), Ok(100.0));
    }

    #[test]
    fn test_similarity_boundary_inclusive() {
        // every similarity k/1000 on a 1000 pixel image sits exactly on its boundary
        for k in 0..=1000u64 {
            let similarity = k as f64 / 1000.0;
            let allowed = Threshold::RequiredSimilarity(similarity).allowed_percent().expect("valid similarity");
            let measured = (1000 - k) as f64 * 100.0 / 1000.0;
            assert!(within_allowed(measured, allowed), "similarity {} allowed {} measured {}", similarity, allowed, measured);
        }
    }

    #[test]
    fn test_one_pixel_over_boundary() {
        let allowed = Threshold::RequiredSimilarity(0.278).allowed_percent().expect("valid similarity");
        assert!(!within_allowed(723.0 * 100.0 / 1000.0, allowed));
        assert!(!within_allowed(1.0 + 1e-6, 1.0));
    }

    #[test]
    fn test_rejects_negative() {
        assert!(Threshold::AllowedPercent(-0.1).allowed_percent().is_err());
        assert!(Threshold::RequiredSimilarity(-0.5).allowed_percent().is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Threshold::AllowedPercent(100.5).allowed_percent().is_err());
        // 99 reads like a percentage, not a fraction
        assert!(Threshold::RequiredSimilarity(99.0).allowed_percent().is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(Threshold::AllowedPercent(f64::NAN).allowed_percent().is_err());
        assert!(Threshold::AllowedPercent(f64::INFINITY).allowed_percent().is_err());
        assert!(Threshold::RequiredSimilarity(f64::NAN).allowed_percent().is_err());
    }
}
