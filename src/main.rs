use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use footprint::ProcessedFootprint;
use footprint::config::FileConfig;
use footprint::input::read_document;
use footprint::pipeline::{FootprintRequest, process_batch_with, process_footprint};
use footprint::render::write_svg;

/// Simplify, classify and render building footprints
///
/// Examples:
///   # Process a single outline from a file
///   footprint building.json -o building.out.json --svg building.svg
///
///   # Pipe a request body through with a coarser tolerance
///   cat request.json | footprint -t 0.05 --pretty
///
///   # Batch file with per-footprint SVGs (block_0.svg, block_1.svg, ...)
///   footprint block.json --svg block.svg -v
#[derive(Parser, Debug)]
#[command(name = "footprint")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input JSON file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Path to config file (optional, auto-searches footprint.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON file (defaults to stdout)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Also write the rendered SVG here; batches get an index suffix
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Simplification tolerance in normalized units
    #[arg(short = 't', long)]
    tolerance: Option<f64>,

    /// Canvas width
    #[arg(long)]
    width: Option<f64>,

    /// Canvas height
    #[arg(long)]
    height: Option<f64>,

    /// Polygon fill color
    #[arg(long)]
    fill: Option<String>,

    /// Polygon border color
    #[arg(long)]
    stroke: Option<String>,

    /// Polygon border width
    #[arg(long)]
    stroke_width: Option<f64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// One slot of batch output: a result, or the reason it failed
#[derive(Serialize)]
#[serde(untagged)]
enum BatchEntry {
    Processed(Box<ProcessedFootprint>),
    Failed { error: String },
}

impl BatchEntry {
    fn failed(message: String) -> Self {
        BatchEntry::Failed { error: message }
    }

    fn is_failed(&self) -> bool {
        matches!(self, BatchEntry::Failed { .. })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = match args.config {
        Some(ref path) => FileConfig::from_path(path)?,
        None => FileConfig::load().unwrap_or_default(),
    };
    let config = merge_args(file_config, &args);

    let options = config.pipeline_options();
    options
        .validate()
        .context("Invalid pipeline configuration")?;

    if config.verbose {
        eprintln!("Configuration:");
        eprintln!(
            "  Input: {}",
            args.input
                .as_ref()
                .map_or("<stdin>".to_string(), |p| p.display().to_string())
        );
        eprintln!("  Tolerance: {}", options.tolerance);
        eprintln!("  Canvas: {}x{}", options.width, options.height);
        eprintln!(
            "  Style: fill {} / stroke {} ({})",
            options.style.fill, options.style.stroke, options.style.stroke_width
        );
        if let Some(ref svg) = args.svg {
            eprintln!("  SVG output: {}", svg.display());
        }
        eprintln!();
    }

    let document = read_document(args.input.as_deref())?;

    let json = if document.batch {
        let total = document.requests.len();
        let pb = create_progress_bar(total as u64);
        let start = Instant::now();

        // Entries that failed to parse keep their slot; the rest go
        // through the pipeline and are put back by original index.
        let mut slots: Vec<Option<BatchEntry>> = Vec::with_capacity(total);
        let mut positions = Vec::new();
        let mut requests: Vec<FootprintRequest> = Vec::new();
        for (i, parsed) in document.requests.into_iter().enumerate() {
            match parsed {
                Ok(request) => {
                    positions.push(i);
                    requests.push(request);
                    slots.push(None);
                }
                Err(e) => {
                    pb.println(format!("  #{}: failed: {:#}", i, e));
                    pb.inc(1);
                    slots.push(Some(BatchEntry::failed(format!("{:#}", e))));
                }
            }
        }

        let results = process_batch_with(&requests, &options, |k, result| {
            let i = positions[k];
            match result {
                Ok(processed) if config.verbose => {
                    pb.println(format!("  #{}: {}", i, summarize(processed)));
                }
                Ok(_) => {}
                Err(e) => pb.println(format!("  #{}: failed: {}", i, e)),
            }
            pb.inc(1);
        });

        for (k, result) in results.into_iter().enumerate() {
            let i = positions[k];
            let svg_path = args.svg.as_ref().map(|p| indexed_path(p, i));
            slots[i] = Some(finish_entry(result, svg_path.as_deref()));
        }

        let entries: Vec<BatchEntry> = slots.into_iter().flatten().collect();
        let failures = entries.iter().filter(|e| e.is_failed()).count();

        pb.finish_with_message(format!(
            "Processed {} footprints ({} failed) [{:.1}s]",
            total,
            failures,
            start.elapsed().as_secs_f32()
        ));

        to_json(&entries, config.pretty)?
    } else {
        let Some(Ok(request)) = document.requests.first() else {
            bail!("No footprint found in input");
        };
        let processed = process_footprint(&request.coordinates, &request.options(&options))
            .context("Failed to process building footprint")?;

        if let Some(ref svg_path) = args.svg {
            write_svg(svg_path, &processed.svg)?;
        }
        if config.verbose {
            eprintln!("{}", summarize(&processed));
        }

        to_json(&processed, config.pretty)?
    };

    match args.output {
        Some(ref path) => std::fs::write(path, &json)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write output")?;
        }
    }

    if config.verbose {
        eprintln!("Done! Total time: {:.3}s", total_start.elapsed().as_secs_f32());
    }

    Ok(())
}

/// Command-line flags win over the config file
fn merge_args(mut config: FileConfig, args: &Args) -> FileConfig {
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(ref fill) = args.fill {
        config.fill = fill.clone();
    }
    if let Some(ref stroke) = args.stroke {
        config.stroke = stroke.clone();
    }
    if let Some(stroke_width) = args.stroke_width {
        config.stroke_width = stroke_width;
    }
    config.pretty |= args.pretty;
    config.verbose |= args.verbose;
    config
}

/// Turn one batch result into its output slot, writing its SVG if asked.
///
/// A failed SVG write is reported in that slot and does not stop the batch.
fn finish_entry(
    result: footprint::error::Result<ProcessedFootprint>,
    svg_path: Option<&Path>,
) -> BatchEntry {
    match result {
        Ok(processed) => match svg_path.map(|path| write_svg(path, &processed.svg)) {
            Some(Err(e)) => BatchEntry::failed(format!("{:#}", e)),
            _ => BatchEntry::Processed(Box::new(processed)),
        },
        Err(e) => BatchEntry::failed(e.to_string()),
    }
}

fn summarize(processed: &ProcessedFootprint) -> String {
    let meta = &processed.metadata;
    let mut line = format!(
        "{} points -> {} points, {}",
        meta.original_points, meta.simplified_points, meta.shape_type
    );
    if meta.degenerate {
        line.push_str(" (degenerate input, fallback square)");
    }
    line
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}

/// `out/shape.svg` -> `out/shape_3.svg`
fn indexed_path(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "footprint".to_string(), |s| s.to_string_lossy().into_owned());
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    path.with_file_name(name)
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb.set_message("Processing footprints...");
    pb
}
