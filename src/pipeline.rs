//! Normalize, simplify, classify and render one footprint at a time.
//!
//! Every stage is a pure function of its input, so independent footprints
//! can be processed on any thread without coordination.

use crate::domain::{Point, ProcessedFootprint, SimplifiedShape};
use crate::error::{FootprintError, Result};
use crate::geometry::{
    DEFAULT_TOLERANCE, RuleClassifier, ShapeClassifier, normalize_coordinates, simplify_polygon,
};
use crate::render::canvas::validate_canvas;
use crate::render::{SvgStyle, render_shape};

pub const DEFAULT_CANVAS_SIZE: f64 = 500.0;

/// Stand-in outline for input whose points all coincide
pub const FALLBACK_SQUARE: [Point; 4] = [
    Point::new(0.0, 0.0),
    Point::new(1.0, 0.0),
    Point::new(1.0, 1.0),
    Point::new(0.0, 1.0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Simplification tolerance in normalized units
    pub tolerance: f64,
    pub width: f64,
    pub height: f64,
    pub style: SvgStyle,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
            style: SvgStyle::default(),
        }
    }
}

impl PipelineOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_style(mut self, style: SvgStyle) -> Self {
        self.style = style;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(FootprintError::InvalidTolerance(self.tolerance));
        }
        let stroke_width = self.style.stroke_width;
        if !stroke_width.is_finite() || stroke_width < 0.0 {
            return Err(FootprintError::InvalidStrokeWidth(stroke_width));
        }
        validate_canvas(self.width, self.height)
    }
}

/// One outline plus any per-footprint overrides
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FootprintRequest {
    /// Raw `(lon, lat)` pairs
    pub coordinates: Vec<(f64, f64)>,
    pub tolerance: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl FootprintRequest {
    pub fn new(coordinates: Vec<(f64, f64)>) -> Self {
        Self {
            coordinates,
            ..Default::default()
        }
    }

    /// Apply this request's overrides on top of `base`
    pub fn options(&self, base: &PipelineOptions) -> PipelineOptions {
        PipelineOptions {
            tolerance: self.tolerance.unwrap_or(base.tolerance),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            style: base.style.clone(),
        }
    }
}

/// Run the full pipeline with the default classification rules
pub fn process_footprint(
    coordinates: &[(f64, f64)],
    options: &PipelineOptions,
) -> Result<ProcessedFootprint> {
    process_footprint_with(coordinates, options, &RuleClassifier::default())
}

/// Run the full pipeline with a caller-supplied classifier.
///
/// # Errors
/// * `EmptyInput` / `NonFiniteCoordinate` - the outline is rejected before
///   normalization
/// * `UnboundedExtent` - the coordinate range overflows
/// * `InvalidTolerance` / `InvalidStrokeWidth` / `InvalidCanvas` - bad options
///
/// Input that collapses to a single location is not an error: it renders
/// [`FALLBACK_SQUARE`] with `metadata.degenerate` set.
pub fn process_footprint_with<C: ShapeClassifier + ?Sized>(
    coordinates: &[(f64, f64)],
    options: &PipelineOptions,
    classifier: &C,
) -> Result<ProcessedFootprint> {
    options.validate()?;

    let (normalized, degenerate) = match normalize_coordinates(coordinates) {
        Ok(points) => (points, false),
        Err(FootprintError::DegenerateExtent) => (FALLBACK_SQUARE.to_vec(), true),
        Err(e) => return Err(e),
    };

    let simplified = simplify_polygon(&normalized, options.tolerance);
    let kind = classifier.classify(&simplified);
    let shape = SimplifiedShape::new(simplified, kind).ok_or(FootprintError::EmptyInput)?;

    let rendered = render_shape(
        &shape,
        coordinates.len(),
        options.width,
        options.height,
        &options.style,
    )?;

    let mut metadata = rendered.metadata;
    metadata.degenerate = degenerate;

    Ok(ProcessedFootprint {
        simplified: shape,
        svg: rendered.svg,
        metadata,
    })
}

/// Process independent requests; one failure does not affect the others
pub fn process_batch(
    requests: &[FootprintRequest],
    base: &PipelineOptions,
) -> Vec<Result<ProcessedFootprint>> {
    process_batch_with(requests, base, |_, _| {})
}

/// Like [`process_batch`], calling `on_each` with every result as it lands
pub fn process_batch_with<F>(
    requests: &[FootprintRequest],
    base: &PipelineOptions,
    mut on_each: F,
) -> Vec<Result<ProcessedFootprint>>
where
    F: FnMut(usize, &Result<ProcessedFootprint>),
{
    requests
        .iter()
        .enumerate()
        .map(|(i, request)| {
            let result = process_footprint(&request.coordinates, &request.options(base));
            on_each(i, &result);
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShapeKind;
    use crate::render::CanvasTransform;

    fn tall_rectangle() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (0.0, 20.0), (10.0, 20.0), (10.0, 0.0)]
    }

    #[test]
    fn test_end_to_end_rectangle() {
        let result = process_footprint(&tall_rectangle(), &PipelineOptions::default()).unwrap();

        assert_eq!(result.metadata.shape_type, ShapeKind::Rectangle);
        assert_eq!(result.metadata.original_points, 4);
        assert_eq!(result.metadata.simplified_points, 4);
        assert!(!result.metadata.degenerate);

        let transform = CanvasTransform::fit(&result.simplified.bounds, 500.0, 500.0).unwrap();
        let mapped = transform.map_points(&result.simplified.coordinates);
        assert_eq!(mapped.len(), 4);

        // Opposite corners mirror each other through the canvas center
        for i in 0..2 {
            let (ax, ay) = mapped[i];
            let (bx, by) = mapped[i + 2];
            assert!((ax + bx - 500.0).abs() < 1e-9);
            assert!((ay + by - 500.0).abs() < 1e-9);
        }
        assert!(
            result
                .svg
                .contains("points=\"137.5,25 137.5,475 362.5,475 362.5,25\"")
        );
    }

    #[test]
    fn test_noisy_rectangle_simplifies() {
        let coords = vec![
            (0.0, 0.0),
            (0.0, 10.0),
            (0.0, 20.0),
            (5.0, 20.1),
            (10.0, 20.0),
            (10.0, 10.0),
            (10.0, 0.0),
            (5.0, 0.0),
        ];
        let result = process_footprint(&coords, &PipelineOptions::default()).unwrap();

        assert_eq!(result.metadata.original_points, 8);
        assert_eq!(result.metadata.simplified_points, 5);
        assert_eq!(result.metadata.shape_type, ShapeKind::Rectangle);
        assert_eq!(
            result.simplified.coordinates.first(),
            Some(&Point::new(0.0, 0.0))
        );
        assert_eq!(
            result.simplified.coordinates.last(),
            Some(&Point::new(0.25, 0.0))
        );
    }

    #[test]
    fn test_bounds_match_simplified_coordinates() {
        let coords = vec![
            (2.0, 1.0),
            (6.0, 1.0),
            (6.0, 3.0),
            (4.0, 3.0),
            (4.0, 5.0),
            (2.0, 5.0),
        ];
        let result = process_footprint(&coords, &PipelineOptions::default()).unwrap();
        let expected =
            crate::geometry::Bounds::from_points(&result.simplified.coordinates).unwrap();
        assert_eq!(result.simplified.bounds, expected);
    }

    #[test]
    fn test_coincident_points_use_fallback() {
        let coords = vec![(13.4, 52.5); 5];
        let result = process_footprint(&coords, &PipelineOptions::default()).unwrap();

        assert!(result.metadata.degenerate);
        assert_eq!(result.metadata.original_points, 5);
        assert_eq!(result.simplified.coordinates, FALLBACK_SQUARE.to_vec());
        assert_eq!(result.metadata.shape_type, ShapeKind::Rectangle);
        assert!(!result.svg.contains("NaN"));
        assert!(!result.svg.contains("inf"));
    }

    #[test]
    fn test_single_point_uses_fallback() {
        let result = process_footprint(&[(1.0, 1.0)], &PipelineOptions::default()).unwrap();
        assert!(result.metadata.degenerate);
        assert_eq!(result.metadata.original_points, 1);
    }

    #[test]
    fn test_collinear_input_renders() {
        let coords = vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)];
        let result = process_footprint(&coords, &PipelineOptions::default()).unwrap();

        assert_eq!(result.metadata.simplified_points, 2);
        assert_eq!(result.metadata.shape_type, ShapeKind::Complex);
        assert!(!result.svg.contains("NaN"));
        assert!(!result.svg.contains("inf"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(
            process_footprint(&[], &PipelineOptions::default()),
            Err(FootprintError::EmptyInput)
        );
    }

    #[test]
    fn test_invalid_options_rejected() {
        let coords = tall_rectangle();

        let negative = PipelineOptions::default().with_tolerance(-0.1);
        assert_eq!(
            process_footprint(&coords, &negative),
            Err(FootprintError::InvalidTolerance(-0.1))
        );

        let flat_canvas = PipelineOptions::default().with_canvas(500.0, 0.0);
        assert!(matches!(
            process_footprint(&coords, &flat_canvas),
            Err(FootprintError::InvalidCanvas { .. })
        ));
    }

    #[test]
    fn test_overflowing_range_rejected() {
        let coords = vec![(-1e308, 0.0), (1e308, 0.0), (1e308, 1.0), (-1e308, 1.0)];
        assert_eq!(
            process_footprint(&coords, &PipelineOptions::default()),
            Err(FootprintError::UnboundedExtent)
        );
    }

    #[test]
    fn test_invalid_stroke_width_rejected() {
        let coords = tall_rectangle();
        for stroke_width in [f64::NAN, -1.0, f64::INFINITY] {
            let options = PipelineOptions::default().with_style(SvgStyle {
                stroke_width,
                ..SvgStyle::default()
            });
            assert!(matches!(
                process_footprint(&coords, &options),
                Err(FootprintError::InvalidStrokeWidth(_))
            ));
        }

        let hairline = PipelineOptions::default().with_style(SvgStyle {
            stroke_width: 0.0,
            ..SvgStyle::default()
        });
        assert!(process_footprint(&coords, &hairline).is_ok());
    }

    #[test]
    fn test_custom_classifier() {
        struct Everything;
        impl ShapeClassifier for Everything {
            fn classify(&self, _: &[Point]) -> ShapeKind {
                ShapeKind::UShape
            }
        }

        let result =
            process_footprint_with(&tall_rectangle(), &PipelineOptions::default(), &Everything)
                .unwrap();
        assert_eq!(result.simplified.kind, ShapeKind::UShape);
        assert_eq!(result.metadata.shape_type, ShapeKind::UShape);
    }

    #[test]
    fn test_request_overrides() {
        let base = PipelineOptions::default();
        let request = FootprintRequest {
            coordinates: tall_rectangle(),
            tolerance: Some(0.5),
            width: Some(800.0),
            height: None,
        };
        let options = request.options(&base);
        assert_eq!(options.tolerance, 0.5);
        assert_eq!(options.width, 800.0);
        assert_eq!(options.height, DEFAULT_CANVAS_SIZE);
    }

    #[test]
    fn test_batch_results_are_independent() {
        let requests = vec![
            FootprintRequest::new(tall_rectangle()),
            FootprintRequest::new(Vec::new()),
            FootprintRequest {
                width: Some(1000.0),
                ..FootprintRequest::new(tall_rectangle())
            },
        ];
        let results = process_batch(&requests, &PipelineOptions::default());

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(FootprintError::EmptyInput));
        let wide = results[2].as_ref().unwrap();
        assert!(wide.svg.starts_with("<svg viewBox=\"0 0 1000 500\""));
    }

    #[test]
    fn test_batch_callback_sees_every_result() {
        let requests = vec![
            FootprintRequest::new(Vec::new()),
            FootprintRequest::new(tall_rectangle()),
        ];
        let mut seen = Vec::new();
        let results = process_batch_with(&requests, &PipelineOptions::default(), |i, result| {
            seen.push((i, result.is_ok()));
        });

        assert_eq!(seen, vec![(0, false), (1, true)]);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_output_json_shape() {
        let result = process_footprint(&tall_rectangle(), &PipelineOptions::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["simplified"]["type"], "rectangle");
        assert_eq!(json["simplified"]["bounds"]["maxY"], 1.0);
        assert_eq!(json["simplified"]["coordinates"][2]["x"], 0.5);
        assert_eq!(json["metadata"]["originalPoints"], 4);
        assert_eq!(json["metadata"]["simplifiedPoints"], 4);
        assert_eq!(json["metadata"]["shapeType"], "rectangle");
        assert!(json["metadata"].get("degenerate").is_none());
        assert!(json["svg"].as_str().unwrap().starts_with("<svg"));
    }
}
