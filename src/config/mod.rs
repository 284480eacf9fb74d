use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::geometry::DEFAULT_TOLERANCE;
use crate::pipeline::{DEFAULT_CANVAS_SIZE, PipelineOptions};
use crate::render::SvgStyle;

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_canvas() -> f64 {
    DEFAULT_CANVAS_SIZE
}
fn default_fill() -> String {
    SvgStyle::default().fill
}
fn default_stroke() -> String {
    SvgStyle::default().stroke
}
fn default_stroke_width() -> f64 {
    SvgStyle::default().stroke_width
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_canvas")]
    pub width: f64,
    #[serde(default = "default_canvas")]
    pub height: f64,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default)]
    pub pretty: bool,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            width: default_canvas(),
            height: default_canvas(),
            fill: default_fill(),
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
            pretty: false,
            verbose: false,
        }
    }
}

impl FileConfig {
    /// Load the first config file found on the search path.
    ///
    /// Files that fail to parse are reported on stderr and skipped.
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly named config file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        if !path.exists() {
            anyhow::bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }

    pub fn style(&self) -> SvgStyle {
        SvgStyle {
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            stroke_width: self.stroke_width,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions::default()
            .with_tolerance(self.tolerance)
            .with_canvas(self.width, self.height)
            .with_style(self.style())
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("footprint.toml"));
    paths.push(PathBuf::from(".footprint.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("footprint").join("config.toml"));
        paths.push(config_dir.join("footprint.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".footprint.toml"));
        paths.push(home.join(".config").join("footprint").join("config.toml"));
    }

    paths
}
