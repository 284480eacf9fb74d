pub mod bounds;
pub mod classify;
pub mod normalize;
pub mod simplify;

pub use bounds::Bounds;
pub use classify::{
    ClassificationRule, RuleClassifier, ShapeClassifier, detect_shape_type, shoelace_area,
};
pub use normalize::normalize_coordinates;
pub use simplify::{DEFAULT_TOLERANCE, segment_distance, simplify_polygon};
