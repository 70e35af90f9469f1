use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemTileError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("invalid tile name {0}")]
    TileName(PathBuf),

    #[error("unsupported sample format in {0}")]
    SampleFormat(PathBuf),

    #[error("missing georeferencing tags in {0}")]
    Georef(PathBuf),

    #[error("tile {path} has {len} samples, expected {expected}")]
    Shape {
        path: PathBuf,
        len: usize,
        expected: usize,
    },
}
