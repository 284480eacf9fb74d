use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::CanvasTransform;
use crate::domain::{RenderMetadata, RenderResult, SimplifiedShape};
use crate::error::FootprintError;

/// Paint applied to the footprint polygon
#[derive(Debug, Clone, PartialEq)]
pub struct SvgStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            fill: "#d1d5db".to_string(),
            stroke: "#374151".to_string(),
            stroke_width: 2.0,
        }
    }
}

/// Render a classified shape onto a `width` x `height` canvas.
///
/// Emits one filled, stroked `<polygon>` through every coordinate in
/// order. `original_points` is the raw input length, carried through
/// to the metadata.
pub fn render_shape(
    shape: &SimplifiedShape,
    original_points: usize,
    width: f64,
    height: f64,
    style: &SvgStyle,
) -> std::result::Result<RenderResult, FootprintError> {
    let transform = CanvasTransform::fit(&shape.bounds, width, height)?;
    let mapped = transform.map_points(&shape.coordinates);

    Ok(RenderResult {
        svg: polygon_svg(&mapped, width, height, style),
        metadata: RenderMetadata {
            original_points,
            simplified_points: shape.coordinates.len(),
            shape_type: shape.kind,
            degenerate: false,
        },
    })
}

/// Build the SVG document for already-mapped canvas points
pub fn polygon_svg(points: &[(f64, f64)], width: f64, height: f64, style: &SvgStyle) -> String {
    let points_attr = points
        .iter()
        .map(|(x, y)| format!("{},{}", x, y))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "<svg viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n  \
         <polygon points=\"{points}\" fill=\"{fill}\" \
         stroke=\"{stroke}\" stroke-width=\"{sw}\" />\n\
         </svg>",
        w = width,
        h = height,
        points = points_attr,
        fill = xml_escape(&style.fill),
        stroke = xml_escape(&style.stroke),
        sw = style.stroke_width,
    )
}

/// Write an SVG document to disk
pub fn write_svg(path: &Path, svg: &str) -> Result<()> {
    fs::write(path, svg).with_context(|| format!("Failed to write SVG file: {}", path.display()))
}

fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
