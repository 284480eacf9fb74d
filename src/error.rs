use thiserror::Error;

/// Errors raised by the footprint pipeline stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FootprintError {
    #[error("coordinate list is empty")]
    EmptyInput,

    #[error("coordinate {index} is not a finite number")]
    NonFiniteCoordinate { index: usize },

    #[error("tolerance must be a finite non-negative number, got {0}")]
    InvalidTolerance(f64),

    #[error("stroke width must be a finite non-negative number, got {0}")]
    InvalidStrokeWidth(f64),

    #[error("canvas must be positive and finite, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },

    /// All input points coincide, so there is no range to normalize against.
    #[error("all coordinates coincide, footprint has zero extent")]
    DegenerateExtent,

    /// Coordinate range overflows `f64`, so no finite scale exists.
    #[error("coordinate range is too large to normalize")]
    UnboundedExtent,
}

pub type Result<T> = std::result::Result<T, FootprintError>;
