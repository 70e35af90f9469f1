//! Tile discovery.

use crate::RidgeError;
use demtile::{parse_band, Band, Tile};
use log::debug;
use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

/// A tile file found on disk but not yet loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRef {
    pub path: PathBuf,
    pub band: Band,
}

/// Where [`TileCache`](crate::TileCache) gets its tiles from.
pub trait TileStore {
    /// Returns the tiles in latitude band `lat_band`, in the order
    /// their rows should be written.
    fn scan(&self, lat_band: i16) -> Result<Vec<TileRef>, RidgeError>;

    /// Loads a tile previously returned by [`scan`](Self::scan).
    fn open(&self, tile: &TileRef) -> Result<Tile, RidgeError>;
}

/// A directory of GeoTIFF tiles.
#[derive(Debug, Clone)]
pub struct TileDir {
    tile_dir: PathBuf,
}

impl TileDir {
    pub fn new(tile_dir: PathBuf) -> Result<Self, RidgeError> {
        // Fail early if there's nothing to plot.
        if list_tiles(&tile_dir)?.is_empty() {
            Err(RidgeError::NoTiles(tile_dir))
        } else {
            Ok(Self { tile_dir })
        }
    }

    pub fn path(&self) -> &Path {
        &self.tile_dir
    }
}

impl TileStore for TileDir {
    fn scan(&self, lat_band: i16) -> Result<Vec<TileRef>, RidgeError> {
        debug!("scanning {:?} for latitude band {lat_band}", self.tile_dir);
        scan_band(&self.tile_dir, lat_band)
    }

    fn open(&self, tile: &TileRef) -> Result<Tile, RidgeError> {
        debug!("loading {:?}", tile.path);
        Ok(Tile::load(&tile.path)?)
    }
}

/// Returns the latitude band of the tiles containing `latitude`.
///
/// Tiles are named after their northern edge, so this is one above
/// the latitude's floor.
#[allow(clippy::cast_possible_truncation)]
pub fn lat_band(latitude: f64) -> i16 {
    latitude.floor() as i16 + 1
}

/// Returns the tiles in `tile_dir` covering `latitude`, ordered by
/// encoded longitude, largest first.
///
/// For the western hemisphere that means west to east. No matching
/// tiles is not an error.
pub fn find_tiles(latitude: f64, tile_dir: &Path) -> Result<Vec<TileRef>, RidgeError> {
    scan_band(tile_dir, lat_band(latitude))
}

/// Returns every tile in `tile_dir`, sorted by path.
pub fn list_tiles(tile_dir: &Path) -> Result<Vec<TileRef>, RidgeError> {
    let mk_err = |e| RidgeError::TileDir(tile_dir.to_owned(), e);
    let mut tiles = Vec::new();
    for entry in fs::read_dir(tile_dir).map_err(mk_err)? {
        let path = entry.map_err(mk_err)?.path();
        if is_tiff(&path) {
            let band = parse_band(&path)?;
            tiles.push(TileRef { path, band });
        }
    }
    tiles.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(tiles)
}

fn scan_band(tile_dir: &Path, lat_band: i16) -> Result<Vec<TileRef>, RidgeError> {
    let mut tiles = list_tiles(tile_dir)?;
    tiles.retain(|tile| tile.band.lat == lat_band);
    tiles.sort_by_key(|tile| Reverse(tile.band.lon.unsigned_abs()));
    Ok(tiles)
}

fn is_tiff(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map_or(false, |ext| {
                ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff")
            })
}
