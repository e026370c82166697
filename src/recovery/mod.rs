use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use tracing::debug;

pub mod interpolation;
pub mod polynomial;

pub use interpolation::{InterpolationError, interpolate};

/// Maximum distance between a point ordinate and its recomputed value for the point to be consistent
pub const IMPOSTER_TOLERANCE: f64 = 1e-6;

/// Constant term of the reconstructed polynomial
pub type Secret = BigInt;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: i64,
    pub y: BigInt,
}

impl Point {
    pub fn new(x: i64, y: BigInt) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Debug)]
pub struct PointSet {
    /// Number of points announced by the source record
    pub n: usize,
    /// Number of points required to determine the polynomial
    pub k: usize,
    /// Points in encounter order
    pub points: Vec<Point>,
}

impl PointSet {
    pub fn new(n: usize, k: usize, points: Vec<Point>) -> Self {
        Self { n, k, points }
    }

    /// Interpolates the first `k` points of the set.
    pub fn recover_secret(&self) -> Result<Secret, InterpolationError> {
        let end = self.k.min(self.points.len());
        interpolate(&self.points[..end])
    }

    pub fn find_imposters(&self) -> Result<ImposterReport, InterpolationError> {
        find_imposters(&self.points, self.k)
    }
}

#[derive(Clone, Debug)]
pub struct ImposterReport {
    /// Secret interpolated from the first `k` points
    pub fitted_secret: Secret,
    /// Points matching their leave-one-out value, in encounter order
    pub consistent: Vec<Point>,
    /// Points deviating from their leave-one-out value, in encounter order
    pub imposters: Vec<Point>,
}

/// Classifies every point as consistent or imposter.
///
/// For each point `i`, the point is removed from the set, the first `k` remaining points are
/// interpolated at `x = 0` and the resulting constant term is compared with `y_i`.
/// The point is an imposter if the two differ by more than [`IMPOSTER_TOLERANCE`].
///
/// Note that the comparison is made against the constant term of the candidate fit and not
/// against the value that fit takes at `x_i`, so a point of a genuine polynomial is only
/// consistent when its ordinate equals the constant term.
///
/// When fewer than `k` points remain, the available points are interpolated, an empty
/// candidate subset giving a constant term of 0.
///
/// # Arguments
/// * `points` - The decoded points, in encounter order.
/// * `k` - Number of points used for each interpolation.
pub fn find_imposters(points: &[Point], k: usize) -> Result<ImposterReport, InterpolationError> {
    let coordinates = interpolation::to_coordinates(points)?;

    let end = k.min(coordinates.len());
    let fitted_secret = interpolation::interpolate_coordinates(&coordinates[..end])?;

    let mut consistent = vec![];
    let mut imposters = vec![];
    for (i, point) in points.iter().enumerate() {
        let candidates: Vec<(i64, f64)> = coordinates
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != i)
            .map(|(_, c)| *c)
            .take(k)
            .collect();
        let calculated_y = interpolation::interpolate_coordinates(&candidates)?;

        let deviation = (&point.y - &calculated_y)
            .abs()
            .to_f64()
            .unwrap_or(f64::INFINITY);
        if deviation > IMPOSTER_TOLERANCE {
            debug!("point {point} is an imposter, calculated y is {calculated_y}");
            imposters.push(point.clone());
        } else {
            debug!("point {point} is consistent");
            consistent.push(point.clone());
        }
    }

    Ok(ImposterReport {
        fitted_secret,
        consistent,
        imposters,
    })
}
