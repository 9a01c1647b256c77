use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

// keeps the shuffle, and therefore the reported circles, identical from run to run
const SHUFFLE_SEED: u64 = 0x5eed;

// slack for points that sit on the circle up to floating point error
const CONTAINS_EPSILON: f64 = 1e-7;

/// A connected group of differing pixels, described by its minimal enclosing circle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    pub center: Point<f64>,
    pub radius: f64,
}

impl Region {
    fn from_two(a: Point<f64>, b: Point<f64>) -> Region {
        let center = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        Region {
            center,
            radius: distance(center, a).max(distance(center, b)),
        }
    }

    fn from_three(a: Point<f64>, b: Point<f64>, c: Point<f64>) -> Option<Region> {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d == 0.0 {
            return None;
        }

        let a_sq = a.x * a.x + a.y * a.y;
        let b_sq = b.x * b.x + b.y * b.y;
        let c_sq = c.x * c.x + c.y * c.y;
        let center = Point::new(
            (a_sq * (b.y - c.y) + b_sq * (c.y - a.y) + c_sq * (a.y - b.y)) / d,
            (a_sq * (c.x - b.x) + b_sq * (a.x - c.x) + c_sq * (b.x - a.x)) / d,
        );
        let radius = distance(center, a).max(distance(center, b)).max(distance(center, c));
        Some(Region { center, radius })
    }

    pub fn contains(&self, p: Point<f64>) -> bool {
        distance(self.center, p) <= self.radius + CONTAINS_EPSILON
    }
}

/// Finds the external boundary of every blob in the mask and returns one enclosing circle per blob.
/// Holes and blobs nested inside holes are not reported separately.
pub fn find_regions(mask: &GrayImage) -> Vec<Region> {
    let regions = find_contours::<u32>(mask)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .filter(|contour| !contour.points.is_empty())
        .map(|contour| {
            let points = contour
                .points
                .iter()
                .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                .collect_vec();
            min_enclosing_circle(points)
        })
        .collect_vec();

    for region in &regions {
        debug!("Region at ({:.1}, {:.1}) with radius {:.2}", region.center.x, region.center.y, region.radius);
    }
    regions
}

/// Welzl's algorithm in its incremental form: expected linear time once the points are shuffled.
/// `points` must not be empty.
pub fn min_enclosing_circle(mut points: Vec<Point<f64>>) -> Region {
    let mut rng = StdRng::seed_from_u64(SHUFFLE_SEED);
    points.shuffle(&mut rng);

    let mut circle = Region { center: points[0], radius: 0.0 };
    for i in 1..points.len() {
        if !circle.contains(points[i]) {
            circle = circle_with_one_point(&points[..i], points[i]);
        }
    }
    circle
}

// smallest circle around `points` that has `p` on its boundary
fn circle_with_one_point(points: &[Point<f64>], p: Point<f64>) -> Region {
    let mut circle = Region { center: p, radius: 0.0 };
    for (i, &q) in points.iter().enumerate() {
        if circle.contains(q) {
            continue;
        }
        circle = if circle.radius == 0.0 {
            Region::from_two(p, q)
        } else {
            circle_with_two_points(&points[..=i], p, q)
        };
    }
    circle
}

// smallest circle around `points` that has both `p` and `q` on its boundary
fn circle_with_two_points(points: &[Point<f64>], p: Point<f64>, q: Point<f64>) -> Region {
    let diameter = Region::from_two(p, q);
    let mut left: Option<Region> = None;
    let mut right: Option<Region> = None;

    for &r in points {
        if diameter.contains(r) {
            continue;
        }

        let side = cross(p, q, r);
        let circle = match Region::from_three(p, q, r) {
            Some(circle) => circle,
            None => continue,
        };
        let offset = cross(p, q, circle.center);
        if side > 0.0 && left.map_or(true, |best| offset > cross(p, q, best.center)) {
            left = Some(circle);
        } else if side < 0.0 && right.map_or(true, |best| offset < cross(p, q, best.center)) {
            right = Some(circle);
        }
    }

    match (left, right) {
        (None, None) => diameter,
        (Some(l), None) => l,
        (None, Some(r)) => r,
        (Some(l), Some(r)) => if l.radius <= r.radius { l } else { r },
    }
}

fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

// twice the signed area of triangle (a, b, c)
fn cross(a: Point<f64>, b: Point<f64>, c: Point<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}
