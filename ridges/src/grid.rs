use crate::math::linspace;
use serde::{Deserialize, Serialize};

/// Global constants of a tile set.
///
/// Produced once by [`survey_tiles`](crate::survey_tiles) and loaded
/// from the survey artifact at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Lowest valid elevation across all tiles.
    pub elev_min: f64,

    /// Highest valid elevation across all tiles.
    pub elev_max: f64,

    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,

    /// Pixel columns per tile.
    pub frame_width: usize,

    /// Pixel rows per tile.
    pub frame_height: usize,

    /// Westernmost tile longitude band.
    pub frames_lon_min: i16,

    /// Easternmost tile longitude band.
    pub frames_lon_max: i16,

    /// Southernmost tile latitude band.
    pub frames_lat_min: i16,

    /// Northernmost tile latitude band.
    pub frames_lat_max: i16,
}

impl Grid {
    /// Number of tile columns.
    #[allow(clippy::cast_sign_loss)]
    pub fn lon_bands(&self) -> usize {
        (i32::from(self.frames_lon_max) - i32::from(self.frames_lon_min) + 1).max(0) as usize
    }

    /// Length of a full-width elevation profile.
    pub fn line_len(&self) -> usize {
        self.frame_width * self.lon_bands()
    }

    /// Factor mapping the grid's elevation range onto one degree.
    pub fn elevation_scale(&self) -> f64 {
        1.0 / (self.elev_max - self.elev_min)
    }

    /// Returns where a tile in longitude band `lon` starts within a
    /// full-width profile.
    #[allow(clippy::cast_sign_loss)]
    pub fn offset(&self, lon: i16) -> Option<usize> {
        (self.frames_lon_min..=self.frames_lon_max)
            .contains(&lon)
            .then(|| (i32::from(lon) - i32::from(self.frames_lon_min)) as usize * self.frame_width)
    }

    /// Longitude axis of a full-width profile.
    ///
    /// Evenly spaced from the western edge of the westernmost band to
    /// the eastern edge of the easternmost band, inclusive.
    pub fn longitudes(&self) -> Vec<f64> {
        linspace(
            f64::from(self.frames_lon_min),
            f64::from(self.frames_lon_max) + 1.0,
            self.line_len(),
        )
        .collect()
    }
}
