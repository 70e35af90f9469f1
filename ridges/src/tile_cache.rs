use crate::{
    tiles::{lat_band, TileDir, TileStore},
    RidgeError,
};
use demtile::Tile;
use log::debug;

/// Single-slot cache holding every tile of one latitude band.
///
/// Ridge plots walk latitudes in order, so consecutive rows almost
/// always share a band. Moving to a new band drops the old tiles
/// before loading the new ones, which bounds memory to one band.
pub struct TileCache<S = TileDir> {
    store: S,

    /// Band the cached tiles belong to, if any.
    band: Option<i16>,

    /// Tiles in write order.
    tiles: Vec<Tile>,
}

impl<S: TileStore> TileCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            band: None,
            tiles: Vec::new(),
        }
    }

    /// Returns the tiles covering `latitude`, loading them if
    /// `latitude` is outside the cached band.
    pub fn get(&mut self, latitude: f64) -> Result<&[Tile], RidgeError> {
        let band = lat_band(latitude);
        if self.band != Some(band) {
            self.invalidate();
            let tiles = self
                .store
                .scan(band)?
                .iter()
                .map(|tile| self.store.open(tile))
                .collect::<Result<Vec<Tile>, RidgeError>>()?;
            debug!("cached {} tiles for latitude band {band}", tiles.len());
            self.tiles = tiles;
            self.band = Some(band);
        }
        Ok(&self.tiles)
    }

    /// Drops all cached tiles.
    pub fn invalidate(&mut self) {
        if let Some(band) = self.band.take() {
            debug!("evicting {} tiles of latitude band {band}", self.tiles.len());
        }
        self.tiles.clear();
    }

    /// Returns the currently cached band.
    pub fn band(&self) -> Option<i16> {
        self.band
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
