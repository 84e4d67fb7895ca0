//! BorderAlign CLI - Align administrative polygons to border outlines

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use borderalign_algorithms::pipeline::{align_to_borders, AlignParams, PipelineParams};
use borderalign_core::io::{read_geojson, write_geojson};
use borderalign_core::FeatureCollection;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "borderalign")]
#[command(author, version, about = "Align polygon layers to border outlines", long_about = None)]
struct Cli {
    /// Border layer (GeoJSON, polygon features)
    border: PathBuf,

    /// Sub-polygon layer to align (GeoJSON, polygon features)
    subpolys: PathBuf,

    /// Output path for the aligned layer (GeoJSON)
    output: PathBuf,

    /// Field holding a unique identifier per sub-polygon
    #[arg(short, long, default_value = "id")]
    dissolve_field: String,

    /// Treat border features as separate named regions
    #[arg(short, long)]
    multi_region: bool,

    /// Border field holding region names (multi-region mode)
    #[arg(long, default_value = "name")]
    border_field: String,

    /// Sub-polygon field rewritten with the matched region name
    /// (multi-region mode)
    #[arg(long, default_value = "region")]
    region_field: String,

    /// Raster cell size for the gap extension pass, in data units
    #[arg(short, long, default_value = "0.005")]
    cell_size: f64,

    /// Working-extent margin beyond the border, in data units
    #[arg(short, long, default_value = "20000")]
    buffer_distance: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_layer(path: &PathBuf, what: &str) -> Result<FeatureCollection> {
    let pb = spinner(&format!("Reading {what}..."));
    let layer =
        read_geojson(path).with_context(|| format!("Failed to read {}", path.display()))?;
    pb.finish_and_clear();
    info!("{}: {} features", what, layer.len());
    Ok(layer)
}

fn write_layer(features: &FeatureCollection, path: &PathBuf) -> Result<()> {
    let pb = spinner("Writing output...");
    write_geojson(path, features)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let border = read_layer(&cli.border, "border layer")?;
    let subpolys = read_layer(&cli.subpolys, "sub-polygon layer")?;

    let params = AlignParams {
        multi_region: cli.multi_region,
        border_name_field: cli.border_field,
        region_field: cli.region_field,
        dissolve_field: cli.dissolve_field,
        pipeline: PipelineParams {
            cell_size: cli.cell_size,
            buffer_distance: cli.buffer_distance,
            ..PipelineParams::default()
        },
    };

    let pb = spinner("Aligning polygons...");
    let start = Instant::now();
    let outcome =
        align_to_borders(&border, &subpolys, &params).context("Alignment failed")?;
    let elapsed = start.elapsed();
    pb.finish_and_clear();

    for notice in &outcome.notices {
        eprintln!("warning: {notice}");
    }
    for (region, error) in &outcome.failed_regions {
        eprintln!("error: region '{region}' failed: {error}");
    }

    write_layer(&outcome.features, &cli.output)?;
    println!(
        "Aligned layer saved to: {} ({} features)",
        cli.output.display(),
        outcome.features.len()
    );
    println!("  Processing time: {:.2?}", elapsed);

    if !outcome.failed_regions.is_empty() {
        anyhow::bail!("{} region(s) failed", outcome.failed_regions.len());
    }
    Ok(())
}
