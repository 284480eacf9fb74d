pub mod point;
pub mod shape;

pub use point::Point;
pub use shape::{ProcessedFootprint, RenderMetadata, RenderResult, ShapeKind, SimplifiedShape};
