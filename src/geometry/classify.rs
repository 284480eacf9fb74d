//! Rule-based footprint classification
//!
//! Rules are evaluated in order and the first match wins. The l-shape and
//! u-shape rules are coarse approximations kept for compatibility with
//! existing layouts: an elongated outline that misses the rectangle area
//! test reports `u-shape` whether or not it has a courtyard.

use geo::{Area, LineString, Polygon};

use super::Bounds;
use crate::domain::{Point, ShapeKind};

/// Polygon area over bounding-box area above which an outline is a rectangle
const RECTANGLE_FILL_RATIO: f64 = 0.8;

/// Half-width of the band around each midline, as a fraction of the extent
const MIDLINE_BAND: f64 = 0.2;

/// Aspect ratio beyond which a many-sided outline is called a u-shape
const ELONGATION_RATIO: f64 = 1.5;

/// Anything that can label a simplified outline
pub trait ShapeClassifier {
    fn classify(&self, points: &[Point]) -> ShapeKind;
}

/// Predicate paired with the label it assigns
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub kind: ShapeKind,
    pub predicate: fn(&[Point], &Bounds) -> bool,
}

impl ClassificationRule {
    pub const fn new(kind: ShapeKind, predicate: fn(&[Point], &Bounds) -> bool) -> Self {
        Self { kind, predicate }
    }
}

/// Ordered table of [`ClassificationRule`]s.
///
/// Outlines with fewer than 3 points, or that match no rule, are
/// [`ShapeKind::Complex`].
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<ClassificationRule>,
}

impl RuleClassifier {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new(vec![
            ClassificationRule::new(ShapeKind::Rectangle, is_roughly_rectangular),
            ClassificationRule::new(ShapeKind::LShape, has_midline_indentation),
            ClassificationRule::new(ShapeKind::UShape, is_elongated),
        ])
    }
}

impl ShapeClassifier for RuleClassifier {
    fn classify(&self, points: &[Point]) -> ShapeKind {
        if points.len() < 3 {
            return ShapeKind::Complex;
        }
        let Some(bounds) = Bounds::from_points(points) else {
            return ShapeKind::Complex;
        };

        self.rules
            .iter()
            .find(|rule| (rule.predicate)(points, &bounds))
            .map_or(ShapeKind::Complex, |rule| rule.kind)
    }
}

/// Classify with the default rule table
pub fn detect_shape_type(points: &[Point]) -> ShapeKind {
    RuleClassifier::default().classify(points)
}

/// Unsigned polygon area by the shoelace formula.
///
/// The ring is closed implicitly; a repeated first point is harmless.
pub fn shoelace_area(points: &[Point]) -> f64 {
    let exterior: LineString<f64> = points.iter().map(|&p| geo::Coord::from(p)).collect();
    Polygon::new(exterior, Vec::new()).unsigned_area()
}

/// Outline fills more than 80% of its bounding box
pub fn is_roughly_rectangular(points: &[Point], bounds: &Bounds) -> bool {
    if points.len() < 4 {
        return false;
    }

    let box_area = bounds.area();
    if box_area <= 0.0 {
        return false;
    }

    shoelace_area(points) / box_area > RECTANGLE_FILL_RATIO
}

/// More than two vertices sit near the horizontal or vertical midline.
///
/// Stands in for "has an indentation"; it does not inspect concavity.
pub fn has_midline_indentation(points: &[Point], bounds: &Bounds) -> bool {
    if points.len() < 6 {
        return false;
    }

    let (mid_x, mid_y) = bounds.center();
    let band_x = bounds.width() * MIDLINE_BAND;
    let band_y = bounds.height() * MIDLINE_BAND;

    let near_midline = points
        .iter()
        .filter(|p| (p.x - mid_x).abs() < band_x || (p.y - mid_y).abs() < band_y)
        .count();

    near_midline > 2
}

/// One side is more than 1.5x the other
pub fn is_elongated(points: &[Point], bounds: &Bounds) -> bool {
    if points.len() < 6 {
        return false;
    }

    let width = bounds.width();
    let height = bounds.height();
    width > height * ELONGATION_RATIO || height > width * ELONGATION_RATIO
}
