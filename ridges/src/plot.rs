use crate::{
    border::{apply_mask, Border, Span},
    extract_row,
    math::{downsample, project, rescale},
    tiles::TileStore,
    Coverage, Grid, RidgeError, TileCache,
};
use geo::geometry::{Coord, Rect};
use log::{debug, info};

/// Points per output vertex when none is configured.
pub const DEFAULT_FACTOR: usize = 100;

/// Space added around the plotted paths, in plot units.
pub const DEFAULT_PADDING: f64 = 0.5;

/// One plotted latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Unique identifier, `lat_<latitude>`.
    pub id: String,

    pub latitude: f64,

    /// Plot-space vertices, west to east.
    pub points: Vec<Coord<f64>>,
}

impl Path {
    pub fn new(latitude: f64, points: Vec<Coord<f64>>) -> Self {
        Self {
            id: format!("lat_{latitude:.3}"),
            latitude,
            points,
        }
    }

    /// Returns the smallest rectangle containing every point.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold(Rect::new(first, first), |rect, p| {
            Rect::new(
                Coord {
                    x: rect.min().x.min(p.x),
                    y: rect.min().y.min(p.y),
                },
                Coord {
                    x: rect.max().x.max(p.x),
                    y: rect.max().y.max(p.y),
                },
            )
        }))
    }
}

/// Stacked latitude profiles, ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgePlot {
    /// Paths in the order latitudes were requested.
    pub paths: Vec<Path>,

    /// Padded extent of all paths.
    pub bounds: Rect<f64>,
}

impl RidgePlot {
    pub fn builder() -> RidgePlotBuilder {
        RidgePlotBuilder {
            latitudes: None,
            factor: DEFAULT_FACTOR,
            coverage: Coverage::default(),
            padding: DEFAULT_PADDING,
        }
    }
}

pub struct RidgePlotBuilder {
    /// Latitudes to plot, top row first.
    latitudes: Option<Vec<f64>>,

    /// Downsampling block size.
    factor: usize,

    /// What to do with samples no tile covers.
    coverage: Coverage,

    padding: f64,
}

impl RidgePlotBuilder {
    pub fn latitudes(mut self, latitudes: Vec<f64>) -> Self {
        self.latitudes = Some(latitudes);
        self
    }

    pub fn factor(mut self, factor: usize) -> Self {
        self.factor = factor;
        self
    }

    pub fn coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn build<S: TileStore>(
        &self,
        cache: &mut TileCache<S>,
        grid: &Grid,
        border: &Border,
    ) -> Result<RidgePlot, RidgeError> {
        self.build_with(cache, grid, border, |_| ())
    }

    /// Like [`build`](Self::build), calling `on_path` as each row
    /// completes.
    pub fn build_with<S, F>(
        &self,
        cache: &mut TileCache<S>,
        grid: &Grid,
        border: &Border,
        mut on_path: F,
    ) -> Result<RidgePlot, RidgeError>
    where
        S: TileStore,
        F: FnMut(&Path),
    {
        let latitudes = match &self.latitudes {
            Some(latitudes) if !latitudes.is_empty() => latitudes,
            _ => return Err(RidgeError::Builder),
        };
        let spans = border.intersections(latitudes);
        info!("plotting {} latitudes", latitudes.len());

        let mut paths = Vec::with_capacity(latitudes.len());
        let mut extent: Option<Rect<f64>> = None;
        for (&latitude, span) in latitudes.iter().zip(spans) {
            let path = trace_ridge(latitude, span, cache, grid, self.factor, self.coverage)?;
            if let Some(bounds) = path.bounds() {
                extent = Some(extent.map_or(bounds, |extent| union(extent, bounds)));
            }
            on_path(&path);
            paths.push(path);
        }

        let extent = extent.ok_or(RidgeError::EmptyPlot)?;
        let pad = Coord {
            x: self.padding,
            y: self.padding,
        };
        Ok(RidgePlot {
            paths,
            bounds: Rect::new(extent.min() - pad, extent.max() + pad),
        })
    }
}

/// Turns the elevation along `latitude` into a plot-space path.
///
/// Elevation is stitched from `cache`, rescaled onto the latitude,
/// flattened outside `span` (left as is when `None`), downsampled by
/// `factor` and Mercator projected.
pub fn trace_ridge<S: TileStore>(
    latitude: f64,
    span: Option<Span>,
    cache: &mut TileCache<S>,
    grid: &Grid,
    factor: usize,
    coverage: Coverage,
) -> Result<Path, RidgeError> {
    let tiles = cache.get(latitude)?;
    let mut profile = extract_row(latitude, tiles, grid)?;
    profile.check_coverage(coverage)?;

    rescale(&mut profile.elevation, grid.elevation_scale(), latitude);
    match span {
        Some(span) => apply_mask(&mut profile.elevation, &profile.longitude, span, latitude),
        None => debug!("latitude {latitude}: border not crossed, leaving unmasked"),
    }

    let x = downsample(&profile.longitude, factor)?;
    let mut y = downsample(&profile.elevation, factor)?;
    project(&mut y);

    Ok(Path::new(
        latitude,
        x.into_iter().zip(y).map(|(x, y)| Coord { x, y }).collect(),
    ))
}

/// Returns `n` latitudes stepping south from `north` by `step`,
/// stopping before `south`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn descending_latitudes(north: f64, south: f64, step: f64) -> Vec<f64> {
    let n = ((north - south) / step).ceil();
    if !n.is_finite() || n <= 0.0 {
        return Vec::new();
    }
    (0..n as usize).map(|k| north - k as f64 * step).collect()
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{descending_latitudes, Path, RidgePlot};
    use crate::{
        test_grid, test_tile,
        tiles::{TileRef, TileStore},
        Border, RidgeError, TileCache,
    };
    use approx::assert_relative_eq;
    use demtile::{Band, Tile};
    use geo::{geometry::Coord, line_string};

    /// Serves the same pair of tiles for every band.
    struct FlatStore;

    impl TileStore for FlatStore {
        fn scan(&self, lat_band: i16) -> Result<Vec<TileRef>, RidgeError> {
            Ok([-123, -122]
                .into_iter()
                .map(|lon: i16| TileRef {
                    path: format!("n{lat_band}w{}.tif", -lon).into(),
                    band: Band { lat: lat_band, lon },
                })
                .collect())
        }

        fn open(&self, tile: &TileRef) -> Result<Tile, RidgeError> {
            Ok(test_tile(
                tile.path.to_str().unwrap(),
                [[0.0, 100.0, 0.0], [50.0, 50.0, 50.0]],
            ))
        }
    }

    fn wide_border() -> Border {
        Border::new(line_string![
            (x: -130.0, y: 30.0),
            (x: -130.0, y: 45.0),
            (x: -110.0, y: 45.0),
            (x: -110.0, y: 30.0),
            (x: -130.0, y: 30.0),
        ])
    }

    #[test]
    fn test_descending_latitudes() {
        let lats = descending_latitudes(41.9, 32.5, 0.2);
        assert_eq!(lats.len(), 47);
        assert_relative_eq!(lats[0], 41.9);
        assert_relative_eq!(lats[46], 32.7, epsilon = 1e-9);
        assert!(lats.windows(2).all(|w| w[0] > w[1]));
        assert!(descending_latitudes(32.5, 41.9, 0.2).is_empty());
        assert!(descending_latitudes(41.9, 32.5, 0.0).is_empty());
    }

    #[test]
    fn test_path_id_and_bounds() {
        let path = Path::new(
            37.5,
            vec![Coord { x: -2.0, y: 1.0 }, Coord { x: 3.0, y: -4.0 }],
        );
        assert_eq!(path.id, "lat_37.500");
        let bounds = path.bounds().unwrap();
        assert_eq!(bounds.min(), Coord { x: -2.0, y: -4.0 });
        assert_eq!(bounds.max(), Coord { x: 3.0, y: 1.0 });
        assert!(Path::new(1.0, vec![]).bounds().is_none());
    }

    #[test]
    fn test_build_stacks_rows() {
        let grid = test_grid();
        let mut cache = TileCache::new(FlatStore);
        let plot = RidgePlot::builder()
            .latitudes(vec![37.9, 37.5, 37.1])
            .factor(3)
            .build(&mut cache, &grid, &wide_border())
            .unwrap();

        assert_eq!(plot.paths.len(), 3);
        let ids: Vec<&str> = plot.paths.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["lat_37.900", "lat_37.500", "lat_37.100"]);
        for path in &plot.paths {
            assert_eq!(path.points.len(), 2);
        }
        // Three rows share one band.
        assert_eq!(cache.band(), Some(38));

        // Northern row samples [0, 100, 0] per tile: mean 1/3 of a degree.
        let top = &plot.paths[0];
        assert_relative_eq!(top.points[0].x, -122.6, epsilon = 1e-9);
        assert_relative_eq!(
            top.points[0].y,
            crate::math::mercator(37.9 + 1.0 / 3.0),
            epsilon = 1e-9
        );

        let min_x = plot.paths.iter().flat_map(|p| &p.points).map(|p| p.x);
        assert_relative_eq!(
            plot.bounds.min().x,
            min_x.fold(f64::INFINITY, f64::min) - 0.5
        );
        assert_relative_eq!(
            plot.bounds.max().y,
            crate::math::mercator(37.9 + 1.0 / 3.0) + 0.5,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_build_requires_latitudes() {
        let mut cache = TileCache::new(FlatStore);
        assert!(matches!(
            RidgePlot::builder().build(&mut cache, &test_grid(), &wide_border()),
            Err(RidgeError::Builder)
        ));
    }

    #[test]
    fn test_build_with_reports_each_path() {
        let mut cache = TileCache::new(FlatStore);
        let mut seen = Vec::new();
        RidgePlot::builder()
            .latitudes(vec![37.9, 36.5])
            .factor(2)
            .build_with(&mut cache, &test_grid(), &wide_border(), |path| {
                seen.push(path.id.clone())
            })
            .unwrap();
        assert_eq!(seen, vec!["lat_37.900", "lat_36.500"]);
    }
}
