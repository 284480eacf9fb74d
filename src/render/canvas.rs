use crate::domain::Point;
use crate::error::{FootprintError, Result};
use crate::geometry::Bounds;

/// Fraction of the canvas the shape may occupy; the rest is margin
const FILL_FRACTION: f64 = 0.9;

/// Maps normalized footprint coordinates onto a fixed-size canvas.
///
/// The shape's bounding-box center lands on the canvas center and the
/// tighter axis fills 90% of the canvas.
#[derive(Debug, Clone)]
pub struct CanvasTransform {
    scale: f64,
    shape_center: (f64, f64),
    canvas_center: (f64, f64),
}

impl CanvasTransform {
    /// Fit `bounds` into a `width` x `height` canvas.
    ///
    /// A flat axis (zero extent) does not constrain the scale. When both
    /// axes are flat the scale is 1.
    pub fn fit(bounds: &Bounds, width: f64, height: f64) -> Result<Self> {
        validate_canvas(width, height)?;

        let scale_x = axis_scale(width, bounds.width());
        let scale_y = axis_scale(height, bounds.height());

        let scale = match (scale_x, scale_y) {
            (Some(sx), Some(sy)) => sx.min(sy) * FILL_FRACTION,
            (Some(s), None) | (None, Some(s)) => s * FILL_FRACTION,
            (None, None) => 1.0,
        };

        Ok(Self {
            scale,
            shape_center: bounds.center(),
            canvas_center: (width / 2.0, height / 2.0),
        })
    }

    /// Canvas position of a normalized point
    pub fn map(&self, point: &Point) -> (f64, f64) {
        (
            self.canvas_center.0 + (point.x - self.shape_center.0) * self.scale,
            self.canvas_center.1 + (point.y - self.shape_center.1) * self.scale,
        )
    }

    pub fn map_points(&self, points: &[Point]) -> Vec<(f64, f64)> {
        points.iter().map(|p| self.map(p)).collect()
    }

    /// Canvas units per normalized unit
    pub fn scale_factor(&self) -> f64 {
        self.scale
    }
}

fn axis_scale(canvas: f64, extent: f64) -> Option<f64> {
    (extent > 0.0).then(|| canvas / extent)
}

pub(crate) fn validate_canvas(width: f64, height: f64) -> Result<()> {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if ok(width) && ok(height) {
        Ok(())
    } else {
        Err(FootprintError::InvalidCanvas { width, height })
    }
}
