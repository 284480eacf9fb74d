//! footprint - Simplify, classify and render building footprints
//!
//! A raw `(lon, lat)` outline goes through four pure stages:
//! normalization into a unit frame, Douglas-Peucker simplification,
//! rule-based shape classification and SVG rendering.

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod input;
pub mod pipeline;
pub mod render;

pub use domain::{Point, ProcessedFootprint, ShapeKind, SimplifiedShape};
pub use error::FootprintError;
pub use pipeline::{
    FootprintRequest, PipelineOptions, process_batch, process_batch_with, process_footprint,
};
