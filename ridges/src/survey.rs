//! One-time pass over a tile set.

use crate::{
    tiles::{list_tiles, TileRef},
    Border, Grid, RidgeError,
};
use demtile::Tile;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Everything a render needs to know about the tile set up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub grid: Grid,
    pub border: Border,
}

impl Survey {
    pub fn load(path: &Path) -> Result<Self, RidgeError> {
        let survey = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        debug!("loaded survey from {path:?}");
        Ok(survey)
    }

    pub fn save(&self, path: &Path) -> Result<(), RidgeError> {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, self)?;
        out.flush()?;
        debug!("saved survey to {path:?}");
        Ok(())
    }
}

/// Loads every tile in `tile_dir` and derives the [`Grid`] describing
/// them.
pub fn survey_tiles(tile_dir: &Path) -> Result<Grid, RidgeError> {
    survey_tiles_with(tile_dir, |_| ())
}

/// Like [`survey_tiles`], calling `on_tile` after each tile is
/// processed.
pub fn survey_tiles_with<F>(tile_dir: &Path, mut on_tile: F) -> Result<Grid, RidgeError>
where
    F: FnMut(&TileRef),
{
    let tiles = list_tiles(tile_dir)?;
    info!("surveying {} tiles in {tile_dir:?}", tiles.len());

    let mut acc: Option<Acc> = None;
    for tile_ref in &tiles {
        let tile = Tile::load(&tile_ref.path)?;
        match acc.as_mut() {
            None => acc = Some(Acc::new(&tile)),
            Some(acc) => acc.add(&tile)?,
        }
        debug!(
            "{:?}: {}x{}, elevation {:?}",
            tile_ref.path,
            tile.width(),
            tile.height(),
            tile.elevation_range()
        );
        on_tile(tile_ref);
    }

    acc.ok_or_else(|| RidgeError::NoTiles(tile_dir.to_owned()))?
        .finish()
}

/// Running extents over surveyed tiles.
struct Acc {
    shape: (usize, usize),
    elevation: Option<(f32, f32)>,
    lon: (f64, f64),
    lat: (f64, f64),
    lon_bands: (i16, i16),
    lat_bands: (i16, i16),
}

impl Acc {
    fn new(tile: &Tile) -> Self {
        let bounds = tile.bounds();
        let band = tile.band();
        Self {
            shape: (tile.width(), tile.height()),
            elevation: tile.elevation_range(),
            lon: (bounds.min().x, bounds.max().x),
            lat: (bounds.min().y, bounds.max().y),
            lon_bands: (band.lon, band.lon),
            lat_bands: (band.lat, band.lat),
        }
    }

    fn add(&mut self, tile: &Tile) -> Result<(), RidgeError> {
        let shape = (tile.width(), tile.height());
        if shape != self.shape {
            return Err(RidgeError::TileShape {
                path: tile.path().to_owned(),
                found: shape,
                expected: self.shape,
            });
        }
        self.elevation = match (self.elevation, tile.elevation_range()) {
            (Some((lo, hi)), Some((tlo, thi))) => Some((lo.min(tlo), hi.max(thi))),
            (range, None) | (None, range) => range,
        };
        let bounds = tile.bounds();
        self.lon = (self.lon.0.min(bounds.min().x), self.lon.1.max(bounds.max().x));
        self.lat = (self.lat.0.min(bounds.min().y), self.lat.1.max(bounds.max().y));
        let band = tile.band();
        self.lon_bands = (self.lon_bands.0.min(band.lon), self.lon_bands.1.max(band.lon));
        self.lat_bands = (self.lat_bands.0.min(band.lat), self.lat_bands.1.max(band.lat));
        Ok(())
    }

    fn finish(self) -> Result<Grid, RidgeError> {
        let (elev_min, elev_max) = self.elevation.ok_or(RidgeError::NoValidData)?;
        // Rescaling divides by the range.
        if elev_max <= elev_min {
            return Err(RidgeError::FlatElevation(f64::from(elev_min)));
        }
        Ok(Grid {
            elev_min: f64::from(elev_min),
            elev_max: f64::from(elev_max),
            lon_min: self.lon.0,
            lon_max: self.lon.1,
            lat_min: self.lat.0,
            lat_max: self.lat.1,
            frame_width: self.shape.0,
            frame_height: self.shape.1,
            frames_lon_min: self.lon_bands.0,
            frames_lon_max: self.lon_bands.1,
            frames_lat_min: self.lat_bands.0,
            frames_lat_max: self.lat_bands.1,
        })
    }
}
