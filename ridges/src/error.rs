use demtile::DemTileError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RidgeError {
    #[error("missing required parameters")]
    Builder,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("can't read tile directory {0}: {1}")]
    TileDir(PathBuf, #[source] std::io::Error),

    #[error("no tiles in {0}")]
    NoTiles(PathBuf),

    #[error("tile name {0} doesn't encode a latitude/longitude band")]
    MalformedTileName(PathBuf),

    #[error("{0}")]
    DemTile(DemTileError),

    #[error("row has no valid samples")]
    NoValidData,

    #[error("latitude {latitude}: {missing} samples not covered by any tile")]
    IncompleteCoverage { latitude: f64, missing: usize },

    #[error("tile {path} is {width} pixels wide, grid expects {expected}")]
    TileWidth {
        path: PathBuf,
        width: usize,
        expected: usize,
    },

    #[error("tiles differ in shape: {path} is {found:?}, expected {expected:?}")]
    TileShape {
        path: PathBuf,
        found: (usize, usize),
        expected: (usize, usize),
    },

    #[error("tile {path} longitude band {lon} is outside the grid")]
    OutOfGrid { path: PathBuf, lon: i16 },

    #[error("latitude {latitude} maps to row {row} outside {path}")]
    RowOutOfBounds {
        path: PathBuf,
        latitude: f64,
        row: isize,
    },

    #[error("no latitude produced any plot points")]
    EmptyPlot,

    #[error("tiles have a flat elevation range at {0}")]
    FlatElevation(f64),

    #[error("downsample factor must be non-zero")]
    ZeroFactor,

    #[error("border has {lon} longitudes but {lat} latitudes")]
    BorderLength { lon: usize, lat: usize },

    #[error("no border polygon found in {0}")]
    NoBorder(PathBuf),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    GeoJson(#[from] geojson::Error),

    #[error("{0}")]
    Kml(#[from] kml::Error),
}

impl From<DemTileError> for RidgeError {
    fn from(err: DemTileError) -> Self {
        match err {
            DemTileError::TileName(path) => Self::MalformedTileName(path),
            err => Self::DemTile(err),
        }
    }
}
