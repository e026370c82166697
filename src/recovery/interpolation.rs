use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use thiserror::Error;

use super::{Point, Secret};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("two points share the abscissa x = {0}")]
    DuplicateAbscissa(i64),
    #[error("interpolation did not produce a finite value")]
    NonFiniteResult,
}

/// Evaluates at `x = 0` the Lagrange polynomial going through `points`, i.e. its constant term.
///
/// The basis terms are accumulated in `f64` and the sum is rounded to the nearest integer.
/// Ordinates above 2^53 lose precision on the way in, so the result is only exact
/// for moderately sized inputs.
///
/// An empty input is the empty sum and yields 0.
///
/// # Arguments
/// * `points` - Points with pairwise distinct abscissas.
pub fn interpolate(points: &[Point]) -> Result<Secret, InterpolationError> {
    let coordinates = to_coordinates(points)?;
    interpolate_coordinates(&coordinates)
}

pub(super) fn to_coordinates(points: &[Point]) -> Result<Vec<(i64, f64)>, InterpolationError> {
    points
        .iter()
        .map(|point| {
            point
                .y
                .to_f64()
                .map(|y| (point.x, y))
                .ok_or(InterpolationError::NonFiniteResult)
        })
        .collect()
}

pub(super) fn interpolate_coordinates(
    coordinates: &[(i64, f64)],
) -> Result<Secret, InterpolationError> {
    let mut secret = 0_f64;
    for (i, &(xi, yi)) in coordinates.iter().enumerate() {
        // L_i(0) = y_i * prod_{j != i} (0 - x_j) / (x_i - x_j)
        let mut term = yi;
        for (j, &(xj, _)) in coordinates.iter().enumerate() {
            if i == j {
                continue;
            }
            if xi == xj {
                return Err(InterpolationError::DuplicateAbscissa(xi));
            }
            term *= -(xj as f64) / (xi as f64 - xj as f64);
        }
        secret += term;
    }

    if !secret.is_finite() {
        return Err(InterpolationError::NonFiniteResult);
    }
    BigInt::from_f64(secret.round()).ok_or(InterpolationError::NonFiniteResult)
}
