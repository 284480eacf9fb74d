pub mod canvas;
pub mod svg;

pub use canvas::CanvasTransform;
pub use svg::{SvgStyle, polygon_svg, render_shape, write_svg};
