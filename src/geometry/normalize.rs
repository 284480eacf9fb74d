use crate::domain::Point;
use crate::error::{FootprintError, Result};

use super::Bounds;

/// Map raw `(lon, lat)` pairs into a unit-scale frame.
///
/// Both axes are divided by the larger of the two ranges, so the
/// outline keeps its aspect ratio: the wider axis spans exactly `[0, 1]`
/// and the other spans `[0, range / max_range]`.
///
/// # Errors
/// * `EmptyInput` - no pairs were given
/// * `NonFiniteCoordinate` - a pair contains NaN or infinity
/// * `DegenerateExtent` - every pair is the same location
/// * `UnboundedExtent` - the range between pairs overflows to infinity
pub fn normalize_coordinates(coords: &[(f64, f64)]) -> Result<Vec<Point>> {
    if let Some(index) = coords
        .iter()
        .position(|&(lon, lat)| !lon.is_finite() || !lat.is_finite())
    {
        return Err(FootprintError::NonFiniteCoordinate { index });
    }

    let bounds = Bounds::from_pairs(coords.iter().copied()).ok_or(FootprintError::EmptyInput)?;

    let max_range = bounds.max_range();
    if !max_range.is_finite() {
        return Err(FootprintError::UnboundedExtent);
    }
    if max_range <= 0.0 {
        return Err(FootprintError::DegenerateExtent);
    }

    Ok(coords
        .iter()
        .map(|&(lon, lat)| {
            Point::new(
                (lon - bounds.min_x) / max_range,
                (lat - bounds.min_y) / max_range,
            )
        })
        .collect())
}
