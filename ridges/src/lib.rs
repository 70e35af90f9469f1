//! Ridge plots of elevation along lines of latitude.
//!
//! Each requested latitude becomes one path: the DEM row nearest that
//! latitude is stitched across tiles, scaled so a full elevation range
//! spans one degree, stacked on the latitude itself, masked to the
//! border, downsampled and Mercator projected.

mod border;
mod error;
mod gaps;
mod grid;
pub mod math;
mod plot;
mod profile;
mod survey;
mod svg;
mod tile_cache;
mod tiles;

pub use crate::{
    border::{apply_mask, Border, Span},
    error::RidgeError,
    gaps::repair_gaps,
    grid::Grid,
    plot::{
        descending_latitudes, trace_ridge, Path, RidgePlot, RidgePlotBuilder, DEFAULT_FACTOR,
        DEFAULT_PADDING,
    },
    profile::{extract_row, Coverage, Profile},
    survey::{survey_tiles, survey_tiles_with, Survey},
    svg::{write_svg, DEFAULT_STYLE},
    tile_cache::TileCache,
    tiles::{find_tiles, lat_band, list_tiles, TileDir, TileRef, TileStore},
};
pub use demtile;
pub use geo;

/// Two 3×2 tile columns (w123, w122) in band n38, elevation 0..100.
#[cfg(test)]
pub(crate) fn test_grid() -> Grid {
    Grid {
        elev_min: 0.0,
        elev_max: 100.0,
        lon_min: -123.0,
        lon_max: -121.0,
        lat_min: 37.0,
        lat_max: 38.0,
        frame_width: 3,
        frame_height: 2,
        frames_lon_min: -123,
        frames_lon_max: -122,
        frames_lat_min: 38,
        frames_lat_max: 38,
    }
}

/// Returns a one degree 3×2 tile named `name`, rows north first.
#[cfg(test)]
pub(crate) fn test_tile(name: &str, rows: [[f32; 3]; 2]) -> demtile::Tile {
    use demtile::{parse_band, GeoTransform, Tile, DEFAULT_NODATA};
    let band = parse_band(name).unwrap();
    let transform = GeoTransform {
        origin_x: f64::from(band.lon),
        origin_y: f64::from(band.lat),
        pixel_width: 1.0 / 3.0,
        pixel_height: -0.5,
    };
    Tile::from_samples(name, transform, (3, 2), DEFAULT_NODATA, rows.concat()).unwrap()
}
