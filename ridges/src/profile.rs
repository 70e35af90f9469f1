use crate::{gaps::repair_gaps, Grid, RidgeError};
use demtile::Tile;
use geo::geometry::Coord;
use log::{debug, warn};

/// Elevation along one latitude, across the full width of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub latitude: f64,

    /// Longitude of each sample, west to east.
    pub longitude: Vec<f64>,

    /// Elevation of each sample.
    ///
    /// Samples no tile covered hold zero.
    pub elevation: Vec<f64>,

    /// Whether some tile wrote each sample.
    pub covered: Vec<bool>,
}

/// What to do when tiles don't cover a whole profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coverage {
    /// Fail with [`RidgeError::IncompleteCoverage`].
    Strict,

    /// Log a warning and keep the zero-elevation baseline.
    #[default]
    Degrade,
}

impl Profile {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.elevation.len()
    }

    /// Returns how many samples no tile covered.
    pub fn missing(&self) -> usize {
        self.covered.iter().filter(|covered| !**covered).count()
    }

    /// Applies `policy` to samples no tile covered.
    pub fn check_coverage(&self, policy: Coverage) -> Result<(), RidgeError> {
        let missing = self.missing();
        match (missing, policy) {
            (0, _) => Ok(()),
            (missing, Coverage::Strict) => Err(RidgeError::IncompleteCoverage {
                latitude: self.latitude,
                missing,
            }),
            (missing, Coverage::Degrade) => {
                warn!(
                    "latitude {}: {missing} of {} samples not covered by any tile, using baseline",
                    self.latitude,
                    self.len()
                );
                Ok(())
            }
        }
    }
}

/// Stitches the row nearest `latitude` from each of `tiles` into a
/// full-width profile.
///
/// Each tile row has its no-data samples repaired before it is
/// written. Tiles are written in order, so a later tile wins where
/// two claim the same samples.
pub fn extract_row(latitude: f64, tiles: &[Tile], grid: &Grid) -> Result<Profile, RidgeError> {
    let len = grid.line_len();
    let mut elevation = vec![0.0; len];
    let mut covered = vec![false; len];

    for tile in tiles {
        if tile.width() != grid.frame_width {
            return Err(RidgeError::TileWidth {
                path: tile.path().to_owned(),
                width: tile.width(),
                expected: grid.frame_width,
            });
        }
        let offset = grid
            .offset(tile.band().lon)
            .ok_or_else(|| RidgeError::OutOfGrid {
                path: tile.path().to_owned(),
                lon: tile.band().lon,
            })?;

        let bounds = tile.bounds();
        let mid_x = (bounds.min().x + bounds.max().x) / 2.0;
        let (row_idx, _) = tile.index(Coord {
            x: mid_x,
            y: latitude,
        });
        let row = usize::try_from(row_idx)
            .ok()
            .and_then(|row_idx| tile.row(row_idx))
            .ok_or_else(|| RidgeError::RowOutOfBounds {
                path: tile.path().to_owned(),
                latitude,
                row: row_idx,
            })?;

        let nodata = f64::from(tile.nodata());
        let samples: Vec<f64> = row.iter().copied().map(f64::from).collect();
        let repaired = repair_gaps(&samples, |sample| sample.is_nan() || sample == nodata)?;

        let span = offset..offset + grid.frame_width;
        elevation[span.clone()].copy_from_slice(&repaired);
        covered[span].fill(true);
        debug!(
            "latitude {latitude}: row {row_idx} of {:?} at offset {offset}",
            tile.path()
        );
    }

    Ok(Profile {
        latitude,
        longitude: grid.longitudes(),
        elevation,
        covered,
    })
}
