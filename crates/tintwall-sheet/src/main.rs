//! Render a filter gallery contact sheet: one tile per preset filter
//! applied to the input image, plus an optional row of demo thumbnails
//! filtered with a group's assignment.

mod sheet;

use std::path::{Path, PathBuf};

use clap::Parser;
use image::imageops::{self, FilterType};
use serde::Serialize;
use tintwall_core::memory::ThumbnailId;
use tintwall_core::{
    DemoGroupFilterRunner, Dimensions, FilterAssignmentTable, Gallery, GalleryConfig, GroupId,
    GroupReport, MemoryPage, OrchestrationReport, PresetEngine, RgbaImage,
};

/// Size of the thumbnails on the documentation page.
const THUMBNAIL_SIZE: Dimensions = Dimensions::new(245, 158);

type GroupRun = (MemoryPage, Vec<ThumbnailId>, GroupReport);

/// Render the input image through every preset filter into a contact
/// sheet PNG.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input image path.
    input: PathBuf,

    /// Output image path (PNG recommended).
    #[arg(short, long)]
    output: PathBuf,

    /// Number of gallery tiles. Filters past the last tile are skipped.
    #[arg(long, default_value_t = 12)]
    tiles: usize,

    /// Tiles per row on the sheet.
    #[arg(long, default_value_t = 4)]
    columns: u32,

    /// Also filter a row of thumbnails with this group's assignment.
    #[arg(long, value_name = "daisy|city|fuji")]
    group: Option<GroupId>,

    /// Number of thumbnails in the group row. Defaults to the length of
    /// the group's assignment.
    #[arg(long, requires = "group")]
    thumbnails: Option<usize>,

    /// Gallery configuration JSON. Missing fields take their defaults.
    #[arg(long, value_name = "FILE.json")]
    config: Option<PathBuf>,

    /// Write a JSON manifest of labels, positions, and timings.
    #[arg(long, value_name = "FILE.json")]
    manifest: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct Manifest<'a> {
    input: &'a Path,
    output: &'a Path,
    config: &'a GalleryConfig,
    tiles: Vec<TileEntry>,
    orchestration: &'a OrchestrationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<&'a GroupReport>,
}

#[derive(Serialize)]
struct TileEntry {
    index: usize,
    labels: Vec<String>,
    x: u32,
    y: u32,
}

// ---------------------------------------------------------------------------
// Gallery runs
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<GalleryConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(GalleryConfig::default());
    };
    log::info!("reading config from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Thumbnails are the source image at the documentation page's
/// thumbnail size, filtered in place on a separate page.
fn run_group(
    source: &RgbaImage,
    group: GroupId,
    count: Option<usize>,
    config: &GalleryConfig,
) -> Result<GroupRun, Box<dyn std::error::Error>> {
    let count = count.unwrap_or_else(|| FilterAssignmentTable::BUILTIN.get(group).len());
    let thumbnail = imageops::resize(
        source,
        THUMBNAIL_SIZE.width,
        THUMBNAIL_SIZE.height,
        FilterType::Triangle,
    );

    let mut page = MemoryPage::new(config.surface, 0);
    let ids = (0..count)
        .map(|_| page.add_thumbnail(group, thumbnail.clone()))
        .collect();
    let report = DemoGroupFilterRunner::new(FilterAssignmentTable::BUILTIN, config.bounds)
        .run_group(&mut page, &PresetEngine, group)?;
    Ok((page, ids, report))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;

    log::info!("reading image from {}", args.input.display());
    let bytes = std::fs::read(&args.input)?;
    let source = tintwall_core::loader::decode(&bytes)?;

    let mut page = MemoryPage::new(config.surface, args.tiles);
    let mut gallery = Gallery::new(config.clone());
    gallery.page_ready(&mut page)?;
    let report = gallery
        .on_image_loaded(&mut page, &PresetEngine, &source)?
        .ok_or("source image was not captured")?;
    log::info!(
        "applied {} filters in {:.1} ms, skipped {}",
        report.applied.len(),
        report.total_duration.as_secs_f64() * 1000.0,
        report.skipped.len()
    );

    let group = args
        .group
        .map(|group| run_group(&source, group, args.thumbnails, &config))
        .transpose()?;

    let tiles: Vec<&RgbaImage> = gallery
        .surfaces()
        .iter()
        .filter_map(|surface| page.surface_pixels(*surface))
        .collect();
    let thumbnails: Vec<&RgbaImage> = group.as_ref().map_or_else(Vec::new, |(page, ids, _)| {
        ids.iter().filter_map(|id| page.thumbnail_pixels(*id)).collect()
    });

    let composed = sheet::compose(&tiles, args.columns, &thumbnails).ok_or("nothing to draw")?;
    log::info!(
        "saving {}x{} sheet to {}",
        composed.image.width(),
        composed.image.height(),
        args.output.display()
    );
    composed.image.save(&args.output)?;

    if let Some(path) = &args.manifest {
        let manifest = Manifest {
            input: &args.input,
            output: &args.output,
            config: &config,
            tiles: composed
                .tile_origins
                .iter()
                .enumerate()
                .map(|(index, &(x, y))| TileEntry {
                    index,
                    labels: page.labels(index).into_iter().map(str::to_owned).collect(),
                    x,
                    y,
                })
                .collect(),
            orchestration: &report,
            group: group.as_ref().map(|(_, _, report)| report),
        };
        log::info!("writing manifest to {}", path.display());
        std::fs::write(path, serde_json::to_string_pretty(&manifest)?)?;
    }

    Ok(())
}
