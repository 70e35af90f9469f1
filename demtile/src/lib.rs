//! GeoTIFF DEM elevation tiles.
//!
//! Tiles cover one degree of latitude by one degree of longitude and
//! are named after their northwest corner: `USGS_13_n38w123.tif`
//! spans 37°N..38°N and 123°W..122°W (plus whatever overlap margin
//! the producer adds).
//!
//! # References
//!
//! 1. [GeoTIFF format specification](https://docs.ogc.org/is/19-008r4/19-008r4.html)
//! 1. [GDAL_NODATA tag](https://gdal.org/drivers/raster/gtiff.html#nodata-value)
//! 1. [USGS 3DEP product naming](https://www.usgs.gov/3d-elevation-program)

mod error;

pub use crate::error::DemTileError;
use geo::geometry::{Coord, Rect};
use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
};
use tiff::{
    decoder::{Decoder, DecodingResult, Limits},
    tags::Tag,
};

/// Base floating point type used for all coordinates.
pub type C = f64;

/// No-data sentinel used by the California tile set when a tile
/// doesn't carry a `GDAL_NODATA` tag.
pub const DEFAULT_NODATA: f32 = -999_999.0;

/// GeoTIFF `ModelPixelScaleTag`.
pub const MODEL_PIXEL_SCALE: u16 = 33550;

/// GeoTIFF `ModelTiepointTag`.
pub const MODEL_TIEPOINT: u16 = 33922;

/// GDAL's private no-data tag (ASCII).
pub const GDAL_NODATA: u16 = 42113;

/// Integer (latitude, longitude) band of a tile, as encoded in its
/// file name.
///
/// `lat` is the tile's northern edge and `lon` its western edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Band {
    pub lat: i16,
    pub lon: i16,
}

/// North-up affine mapping between pixel and geographic space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// Longitude of the upper-left corner of the upper-left pixel.
    pub origin_x: C,

    /// Latitude of the upper-left corner of the upper-left pixel.
    pub origin_y: C,

    /// Pixel width in degrees.
    pub pixel_width: C,

    /// Pixel height in degrees (negative for north-up rasters).
    pub pixel_height: C,
}

impl GeoTransform {
    /// Returns the geographic coordinate of the pixel-space point
    /// `(col, row)`.
    pub fn pixel_to_geo(&self, col: C, row: C) -> Coord<C> {
        Coord {
            x: self.origin_x + col * self.pixel_width,
            y: self.origin_y + row * self.pixel_height,
        }
    }

    /// Returns fractional `(col, row)` for `coord`.
    pub fn geo_to_pixel(&self, coord: Coord<C>) -> (C, C) {
        let col = (coord.x - self.origin_x) / self.pixel_width;
        let row = (coord.y - self.origin_y) / self.pixel_height;
        (col, row)
    }
}

pub struct Tile {
    /// Where this tile came from. Also the source of `band`.
    path: PathBuf,

    /// Band parsed from the file name.
    band: Band,

    /// Number of (columns, rows) in this tile.
    dimensions: (usize, usize),

    transform: GeoTransform,

    /// Value marking missing samples.
    nodata: f32,

    /// Elevation samples, row-major with the northernmost row first.
    samples: Box<[f32]>,
}

impl Tile {
    /// Returns a Tile decoded into memory from the GeoTIFF at `path`.
    ///
    /// The file is closed before this returns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DemTileError> {
        let path = path.as_ref();
        let band = parse_band(path)?;
        let mut decoder =
            Decoder::new(BufReader::new(File::open(path)?))?.with_limits(Limits::unlimited());
        let (cols, rows) = decoder.dimensions()?;
        let transform =
            read_transform(&mut decoder)?.ok_or_else(|| DemTileError::Georef(path.to_owned()))?;
        let nodata = read_nodata(&mut decoder)?.unwrap_or(DEFAULT_NODATA);
        let samples = widen(path, decoder.read_image()?)?;
        Self::build(
            path.to_owned(),
            band,
            transform,
            (cols as usize, rows as usize),
            nodata,
            samples,
        )
    }

    /// Returns a Tile backed by `samples`, which must be row-major,
    /// north row first.
    ///
    /// `path` only needs to carry a valid tile name; nothing is read
    /// from disk.
    pub fn from_samples<P: Into<PathBuf>>(
        path: P,
        transform: GeoTransform,
        dimensions: (usize, usize),
        nodata: f32,
        samples: Vec<f32>,
    ) -> Result<Self, DemTileError> {
        let path = path.into();
        let band = parse_band(&path)?;
        Self::build(path, band, transform, dimensions, nodata, samples)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn width(&self) -> usize {
        self.dimensions.0
    }

    pub fn height(&self) -> usize {
        self.dimensions.1
    }

    /// Returns the number of samples in this tile.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn transform(&self) -> GeoTransform {
        self.transform
    }

    pub fn nodata(&self) -> f32 {
        self.nodata
    }

    /// Returns true if `sample` marks missing data.
    pub fn is_nodata(&self, sample: f32) -> bool {
        sample.is_nan() || sample == self.nodata
    }

    /// Returns the geographic extent covered by this tile's pixels.
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self) -> Rect<C> {
        let (cols, rows) = self.dimensions;
        Rect::new(
            self.transform.pixel_to_geo(0.0, 0.0),
            self.transform.pixel_to_geo(cols as C, rows as C),
        )
    }

    /// Returns the `(row, col)` of the pixel containing `coord`.
    ///
    /// Like a raster library's `index`, the result may lie outside
    /// the tile.
    #[allow(clippy::cast_possible_truncation)]
    pub fn index(&self, coord: Coord<C>) -> (isize, isize) {
        let (col, row) = self.transform.geo_to_pixel(coord);
        (row.floor() as isize, col.floor() as isize)
    }

    /// Returns pixel row `row`, west to east.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        let (cols, rows) = self.dimensions;
        (row < rows).then(|| &self.samples[row * cols..(row + 1) * cols])
    }

    /// Returns the sample at the given geo coordinates.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn get(&self, coord: Coord<C>) -> Option<f32> {
        let (row, col) = self.index(coord);
        if 0 <= col && col < self.dimensions.0 as isize && 0 <= row {
            self.row(row as usize).map(|samples| samples[col as usize])
        } else {
            None
        }
    }

    /// Returns the lowest and highest valid samples in this tile.
    pub fn elevation_range(&self) -> Option<(f32, f32)> {
        self.samples
            .iter()
            .copied()
            .filter(|sample| !self.is_nodata(*sample))
            .fold(None, |range, sample| match range {
                None => Some((sample, sample)),
                Some((lo, hi)) => Some((lo.min(sample), hi.max(sample))),
            })
    }
}

/// Private API
impl Tile {
    fn build(
        path: PathBuf,
        band: Band,
        transform: GeoTransform,
        dimensions @ (cols, rows): (usize, usize),
        nodata: f32,
        samples: Vec<f32>,
    ) -> Result<Self, DemTileError> {
        if samples.len() != cols * rows {
            return Err(DemTileError::Shape {
                path,
                len: samples.len(),
                expected: cols * rows,
            });
        }
        Ok(Self {
            path,
            band,
            dimensions,
            transform,
            nodata,
            samples: samples.into_boxed_slice(),
        })
    }
}

/// Parses the `[ns]<lat>[ew]<lon>` band out of a tile's file name.
///
/// Matching is case-insensitive and, when a name contains several
/// candidates, the last one wins.
pub fn parse_band<P: AsRef<Path>>(path: P) -> Result<Band, DemTileError> {
    let mk_err = || DemTileError::TileName(path.as_ref().to_owned());
    let name = path
        .as_ref()
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?
        .to_ascii_lowercase();
    let name = name.as_bytes();
    (0..name.len())
        .rev()
        .find_map(|start| band_at(name, start))
        .ok_or_else(mk_err)
}

/// Returns the band whose latitude marker sits at `name[start]`, if
/// any.
fn band_at(name: &[u8], start: usize) -> Option<Band> {
    let digits = |from: usize| {
        name[from.min(name.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };
    let lat_sign = match name[start] {
        b'n' => 1,
        b's' => -1,
        _ => return None,
    };
    let lat_len = digits(start + 1);
    if !(1..=2).contains(&lat_len) {
        return None;
    }
    let lon_marker = start + 1 + lat_len;
    let lon_sign = match name.get(lon_marker)? {
        b'e' => 1,
        b'w' => -1,
        _ => return None,
    };
    let lon_len = digits(lon_marker + 1).min(3);
    if lon_len == 0 {
        return None;
    }
    let parse = |from: usize, len: usize| {
        std::str::from_utf8(&name[from..from + len])
            .ok()?
            .parse::<i16>()
            .ok()
    };
    Some(Band {
        lat: lat_sign * parse(start + 1, lat_len)?,
        lon: lon_sign * parse(lon_marker + 1, lon_len)?,
    })
}

fn read_transform<R: Read + Seek>(
    decoder: &mut Decoder<R>,
) -> Result<Option<GeoTransform>, DemTileError> {
    let scale = match decoder.find_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))? {
        Some(value) => value.into_f64_vec()?,
        None => return Ok(None),
    };
    let tiepoint = match decoder.find_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT))? {
        Some(value) => value.into_f64_vec()?,
        None => return Ok(None),
    };
    match (scale.as_slice(), tiepoint.as_slice()) {
        ([scale_x, scale_y, ..], [i, j, _, x, y, ..]) => Ok(Some(GeoTransform {
            origin_x: x - i * scale_x,
            origin_y: y + j * scale_y,
            pixel_width: *scale_x,
            pixel_height: -scale_y,
        })),
        _ => Ok(None),
    }
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<f32>, DemTileError> {
    match decoder.find_tag(Tag::from_u16_exhaustive(GDAL_NODATA))? {
        Some(value) => {
            let text = value.into_string()?;
            Ok(text.trim_matches(char::from(0)).trim().parse::<f32>().ok())
        }
        None => Ok(None),
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn widen(path: &Path, image: DecodingResult) -> Result<Vec<f32>, DemTileError> {
    Ok(match image {
        DecodingResult::F32(samples) => samples,
        DecodingResult::F64(samples) => samples.into_iter().map(|s| s as f32).collect(),
        DecodingResult::I16(samples) => samples.into_iter().map(f32::from).collect(),
        DecodingResult::I32(samples) => samples.into_iter().map(|s| s as f32).collect(),
        DecodingResult::U8(samples) => samples.into_iter().map(f32::from).collect(),
        DecodingResult::U16(samples) => samples.into_iter().map(f32::from).collect(),
        DecodingResult::U32(samples) => samples.into_iter().map(|s| s as f32).collect(),
        DecodingResult::I8(samples) => samples.into_iter().map(f32::from).collect(),
        DecodingResult::I64(samples) => samples.into_iter().map(|s| s as f32).collect(),
        DecodingResult::U64(samples) => samples.into_iter().map(|s| s as f32).collect(),
        #[allow(unreachable_patterns)]
        _ => return Err(DemTileError::SampleFormat(path.to_owned())),
    })
}
