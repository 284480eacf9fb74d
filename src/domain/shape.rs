use serde::{Deserialize, Serialize};
use std::fmt;

use super::Point;
use crate::geometry::Bounds;

/// Coarse archetype assigned to a simplified footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    LShape,
    UShape,
    Complex,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::LShape => "l-shape",
            ShapeKind::UShape => "u-shape",
            ShapeKind::Complex => "complex",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simplified outline together with its label and bounding box.
///
/// `bounds` is always the bounding box of `coordinates`; use
/// [`SimplifiedShape::new`] to keep the two in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedShape {
    pub coordinates: Vec<Point>,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub bounds: Bounds,
}

impl SimplifiedShape {
    /// Returns `None` for an empty outline, which has no bounding box.
    pub fn new(coordinates: Vec<Point>, kind: ShapeKind) -> Option<Self> {
        let bounds = Bounds::from_points(&coordinates)?;
        Some(Self {
            coordinates,
            kind,
            bounds,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderMetadata {
    pub original_points: usize,
    pub simplified_points: usize,
    pub shape_type: ShapeKind,
    /// Set when the input collapsed to a single location and the
    /// fallback square was rendered instead.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degenerate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    pub svg: String,
    pub metadata: RenderMetadata,
}

/// Everything the pipeline hands back for one footprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFootprint {
    pub simplified: SimplifiedShape,
    pub svg: String,
    pub metadata: RenderMetadata,
}
