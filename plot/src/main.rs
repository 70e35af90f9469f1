mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use options::{Cli, Command as CliCmd};
use ridges::{
    descending_latitudes, list_tiles, survey_tiles_with, trace_ridge, write_svg, Border, Coverage,
    RidgePlot, Survey, TileCache, TileDir, DEFAULT_STYLE,
};
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};
use textplots::{Chart, Plot, Shape};

fn main() -> Result<(), AnyError> {
    let Cli { cmd } = Cli::parse();

    env_logger::init();

    match cmd {
        CliCmd::Survey {
            tile_dir,
            boundary,
            name,
            out,
        } => survey(&tile_dir, &boundary, name.as_deref(), &out),
        CliCmd::Render {
            tile_dir,
            survey,
            north,
            south,
            step,
            factor,
            strict,
            out,
        } => {
            let coverage = if strict {
                Coverage::Strict
            } else {
                Coverage::Degrade
            };
            let latitudes = descending_latitudes(north, south, step);
            render(tile_dir, &survey, latitudes, factor, coverage, &out)
        }
        CliCmd::Preview {
            tile_dir,
            survey,
            latitude,
            factor,
        } => preview(tile_dir, &survey, latitude, factor),
    }
}

fn survey(
    tile_dir: &Path,
    boundary: &Path,
    name: Option<&str>,
    out: &Path,
) -> Result<(), AnyError> {
    let border = Border::load(boundary, name)?;
    info!("border has {} vertices", border.vertices().0.len());

    let pb = progress_bar("Surveying tiles".to_string(), list_tiles(tile_dir)?.len());
    let grid = survey_tiles_with(tile_dir, |_| pb.inc(1))?;
    pb.finish();

    Survey { grid, border }.save(out)?;
    info!("wrote {out:?}");
    Ok(())
}

fn render(
    tile_dir: PathBuf,
    survey: &Path,
    latitudes: Vec<f64>,
    factor: usize,
    coverage: Coverage,
    out: &Path,
) -> Result<(), AnyError> {
    let Survey { grid, border } = Survey::load(survey)?;
    let mut cache = TileCache::new(TileDir::new(tile_dir)?);

    let pb = progress_bar("Plotting latitudes".to_string(), latitudes.len());
    let plot = RidgePlot::builder()
        .latitudes(latitudes)
        .factor(factor)
        .coverage(coverage)
        .build_with(&mut cache, &grid, &border, |_| pb.inc(1))?;
    pb.finish();

    write_svg(&plot, DEFAULT_STYLE, BufWriter::new(File::create(out)?))?;
    info!("wrote {} paths to {out:?}", plot.paths.len());
    Ok(())
}

fn preview(tile_dir: PathBuf, survey: &Path, latitude: f64, factor: usize) -> Result<(), AnyError> {
    let Survey { grid, border } = Survey::load(survey)?;
    let mut cache = TileCache::new(TileDir::new(tile_dir)?);
    let span = border.intersections(&[latitude])[0];
    let path = trace_ridge(
        latitude,
        span,
        &mut cache,
        &grid,
        factor,
        Coverage::Degrade,
    )?;

    #[allow(clippy::cast_possible_truncation)]
    let plot_data: Vec<(f32, f32)> = path
        .points
        .iter()
        .map(|p| (p.x as f32, p.y as f32))
        .collect();
    #[allow(clippy::cast_possible_truncation)]
    Chart::new(300, 150, grid.lon_min as f32, grid.lon_max as f32)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
    Ok(())
}

fn progress_bar(prefix: String, len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_prefix(prefix);
    if let Ok(style) = ProgressStyle::with_template("{prefix}...\n[{wide_bar:.cyan/blue}]") {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
