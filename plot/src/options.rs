use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Draw ridge plots of elevation along lines of latitude.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Scan a tile set and its border once, writing a survey file.
    Survey {
        /// Directory of GeoTIFF elevation tiles.
        #[arg(short, long)]
        tile_dir: PathBuf,

        /// KML (`.kml`) or GeoJSON file containing the border polygon.
        #[arg(short, long)]
        boundary: PathBuf,

        /// Only consider boundary features with this `NAME` property.
        #[arg(short, long)]
        name: Option<String>,

        /// Survey file path.
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Render the full plot as SVG.
    Render {
        /// Directory of GeoTIFF elevation tiles.
        #[arg(short, long)]
        tile_dir: PathBuf,

        /// Survey file written by `survey`.
        #[arg(short, long)]
        survey: PathBuf,

        /// First (top) latitude.
        #[arg(long, default_value_t = 41.9)]
        north: f64,

        /// Latitudes stop before reaching this one.
        #[arg(long, default_value_t = 32.5)]
        south: f64,

        /// Degrees between rows.
        #[arg(long, default_value_t = 0.2)]
        step: f64,

        /// Samples averaged into each plotted point.
        #[arg(short, long, default_value_t = ridges::DEFAULT_FACTOR)]
        factor: usize,

        /// Fail on rows not fully covered by tiles instead of
        /// flattening the gaps.
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// SVG file path.
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Draw a single row in the terminal.
    Preview {
        /// Directory of GeoTIFF elevation tiles.
        #[arg(short, long)]
        tile_dir: PathBuf,

        /// Survey file written by `survey`.
        #[arg(short, long)]
        survey: PathBuf,

        #[arg(short, long)]
        latitude: f64,

        /// Samples averaged into each plotted point.
        #[arg(short, long, default_value_t = ridges::DEFAULT_FACTOR)]
        factor: usize,
    },
}
