use ridges::{
    demtile::{GDAL_NODATA, MODEL_PIXEL_SCALE, MODEL_TIEPOINT},
    geo::line_string,
    Border, Grid,
};
use std::{fs::File, path::Path};
use tiff::{
    encoder::{colortype, TiffEncoder},
    tags::Tag,
};

pub const NODATA: f32 = -999_999.0;

/// Writes a one degree 3×2 float GeoTIFF whose NW corner is encoded
/// in `name`.
pub fn write_tile(dir: &Path, name: &str, (west, north): (f64, f64), rows: [[f32; 3]; 2]) {
    let mut tiff = TiffEncoder::new(File::create(dir.join(name)).unwrap()).unwrap();
    let mut image = tiff.new_image::<colortype::Gray32Float>(3, 2).unwrap();
    let scale = [1.0 / 3.0, 0.5, 0.0];
    let tiepoint = [0.0, 0.0, 0.0, west, north, 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &scale[..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT), &tiepoint[..])
        .unwrap();
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(GDAL_NODATA), "-999999")
        .unwrap();
    image.write_data(&rows.concat()).unwrap();
}

/// Populates `dir` with two adjacent tiles in band n38, the eastern
/// one carrying a no-data cell in its southern row.
pub fn write_tile_set(dir: &Path) {
    write_tile(
        dir,
        "USGS_13_n38w123_20210301.tif",
        (-123.0, 38.0),
        [[1.0, 2.0, 3.0], [10.0, 20.0, 30.0]],
    );
    write_tile(
        dir,
        "USGS_13_n38w122_20210301.tif",
        (-122.0, 38.0),
        [[4.0, 5.0, 6.0], [70.0, NODATA, 90.0]],
    );
}

pub fn grid() -> Grid {
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

/// Rectangle spanning -122.7..-121.5 and 37..38.
pub fn border() -> Border {
    Border::new(line_string![
        (x: -122.7, y: 37.0),
        (x: -122.7, y: 38.0),
        (x: -121.5, y: 38.0),
        (x: -121.5, y: 37.0),
        (x: -122.7, y: 37.0),
    ])
}
