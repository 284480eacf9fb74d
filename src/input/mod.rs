//! JSON input for the pipeline
//!
//! Accepted documents:
//! - a bare ring: `[[lon, lat], ...]`
//! - a request: `{"coordinates": [...], "tolerance": .., "width": .., "height": ..}`
//! - a batch: `[{"coordinates": [...]}, ...]`
//!
//! Positions are `[lon, lat]` pairs or map-feature style `{"lat": .., "lon": ..}`
//! objects.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::pipeline::FootprintRequest;

/// A vertex as it appears in input JSON
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Position {
    Pair(f64, f64),
    Feature { lat: f64, lon: f64 },
}

impl Position {
    fn lon_lat(self) -> (f64, f64) {
        match self {
            Position::Pair(lon, lat) => (lon, lat),
            Position::Feature { lat, lon } => (lon, lat),
        }
    }
}

/// Request body as sent by the footprint lookup service
#[derive(Debug, Deserialize)]
struct RawRequest {
    coordinates: Vec<Position>,
    #[serde(default)]
    tolerance: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

impl From<RawRequest> for FootprintRequest {
    fn from(raw: RawRequest) -> Self {
        Self {
            coordinates: raw.coordinates.into_iter().map(Position::lon_lat).collect(),
            tolerance: raw.tolerance,
            width: raw.width,
            height: raw.height,
        }
    }
}

/// Parsed input, remembering whether it was a batch
/// Parsed input, remembering whether it was a batch.
///
/// Batch entries are parsed independently: a malformed entry keeps its
/// slot as an `Err` and does not affect its neighbours. A single document
/// always holds exactly one `Ok` request.
#[derive(Debug)]
pub struct InputDocument {
    pub requests: Vec<Result<FootprintRequest>>,
    pub batch: bool,
}

/// Parse an input document from a JSON string
pub fn parse_document(json: &str) -> Result<InputDocument> {
    let value: Value = serde_json::from_str(json).context("Input is not valid JSON")?;

    match value {
        Value::Array(items) if is_batch(&items) => {
            let requests = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| {
                    parse_request(item).with_context(|| format!("Invalid footprint #{}", i))
                })
                .collect();
            Ok(InputDocument {
                requests,
                batch: true,
            })
        }
        Value::Array(items) => {
            let ring = parse_ring(Value::Array(items))?;
            Ok(InputDocument {
                requests: vec![Ok(FootprintRequest::new(ring))],
                batch: false,
            })
        }
        object @ Value::Object(_) => Ok(InputDocument {
            requests: vec![Ok(parse_request(object)?)],
            batch: false,
        }),
        _ => bail!("Valid coordinates array is required"),
    }
}

/// Read and parse a document from a file, or stdin when `path` is `None`
pub fn read_document(path: Option<&Path>) -> Result<InputDocument> {
    let contents = match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file: {}", p.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read input from stdin")?;
            buf
        }
    };
    parse_document(&contents)
}

/// A non-empty array of objects that is not a ring of `{lat, lon}` positions
fn is_batch(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(Value::is_object)
        && !items.iter().all(is_feature_position)
}

fn is_feature_position(item: &Value) -> bool {
    item.as_object().is_some_and(|o| {
        o.contains_key("lat") && o.contains_key("lon") && !o.contains_key("coordinates")
    })
}

fn parse_request(value: Value) -> Result<FootprintRequest> {
    match value.get("coordinates") {
        Some(Value::Array(_)) => {}
        _ => bail!("Valid coordinates array is required"),
    }
    let raw: RawRequest =
        serde_json::from_value(value).context("Failed to parse footprint request")?;
    Ok(raw.into())
}

fn parse_ring(value: Value) -> Result<Vec<(f64, f64)>> {
    let positions: Vec<Position> = serde_json::from_value(value)
        .context("Coordinates must be [lon, lat] pairs or {lat, lon} objects")?;
    Ok(positions.into_iter().map(Position::lon_lat).collect())
}
