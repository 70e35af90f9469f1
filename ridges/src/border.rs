//! Border polygon and per-latitude land masks.

use crate::RidgeError;
use geo::geometry::{Coord, Geometry, GeometryCollection, LineString, Polygon};
use geojson::{quick_collection, Feature, GeoJson};
use kml::{types::Placemark, Kml};
use serde::{Deserialize, Serialize};
use std::{fs, fs::File, io::BufReader, path::Path};

/// Closed outline of the region, as (longitude, latitude) vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BorderVertices", into = "BorderVertices")]
pub struct Border(LineString<f64>);

/// Longitudes at which a latitude line enters and leaves the border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    fn point(lon: f64) -> Self {
        Self { min: lon, max: lon }
    }

    fn extend(self, lon: f64) -> Self {
        Self {
            min: self.min.min(lon),
            max: self.max.max(lon),
        }
    }

    pub fn contains(&self, lon: f64) -> bool {
        self.min <= lon && lon <= self.max
    }
}

impl Border {
    pub fn new(vertices: LineString<f64>) -> Self {
        Self(vertices)
    }

    pub fn vertices(&self) -> &LineString<f64> {
        &self.0
    }

    /// Returns, for each of `latitudes`, the span between the
    /// westernmost and easternmost border crossings, or `None` when
    /// the border never crosses that latitude.
    ///
    /// A segment crosses a latitude strictly between its endpoints'
    /// latitudes, and contributes its starting vertex's longitude.
    pub fn intersections(&self, latitudes: &[f64]) -> Vec<Option<Span>> {
        let mut spans = vec![None; latitudes.len()];
        for segment in self.0.lines() {
            let (start, end) = (segment.start, segment.end);
            for (span, &lat) in spans.iter_mut().zip(latitudes) {
                if (start.y < lat && lat < end.y) || (end.y < lat && lat < start.y) {
                    *span = Some(span.map_or(Span::point(start.x), |s: Span| s.extend(start.x)));
                }
            }
        }
        spans
    }

    /// Reads the border from a boundary file, KML when its extension
    /// is `.kml` and GeoJSON otherwise.
    pub fn load(path: &Path, name: Option<&str>) -> Result<Self, RidgeError> {
        let is_kml = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map_or(false, |ext| ext.eq_ignore_ascii_case("kml"));
        if is_kml {
            Self::from_kml(path, name)
        } else {
            Self::from_geojson(path, name)
        }
    }

    /// Reads the border from a KML boundary file.
    ///
    /// When `name` is given, only placemarks with that `<name>` are
    /// considered. As with GeoJSON, the ring with the most vertices
    /// wins.
    pub fn from_kml(path: &Path, name: Option<&str>) -> Result<Self, RidgeError> {
        let kml: Kml<f64> = fs::read_to_string(path)?.parse()?;
        let collection = match name {
            None => kml::quick_collection(kml)?,
            Some(name) => {
                let mut placemarks = Vec::new();
                collect_placemarks(kml, name, &mut placemarks);
                let mut geometries = Vec::new();
                for placemark in placemarks {
                    geometries.extend(kml::quick_collection(Kml::Placemark(placemark))?.0);
                }
                GeometryCollection(geometries)
            }
        };
        largest_ring(&collection, path)
    }

    /// Reads the border from a GeoJSON boundary file.
    ///
    /// When `name` is given and the file is a feature collection, only
    /// features whose `NAME` (or `name`) property equals it are
    /// considered. The polygon ring with the most vertices wins, which
    /// drops islands.
    pub fn from_geojson(path: &Path, name: Option<&str>) -> Result<Self, RidgeError> {
        let geojson = GeoJson::from_reader(BufReader::new(File::open(path)?))?;
        let geojson = match (geojson, name) {
            (GeoJson::FeatureCollection(mut collection), Some(name)) => {
                collection
                    .features
                    .retain(|feature| feature_name(feature) == Some(name));
                GeoJson::FeatureCollection(collection)
            }
            (geojson, _) => geojson,
        };
        let collection: GeometryCollection<f64> = quick_collection(&geojson)?;
        largest_ring(&collection, path)
    }
}

/// Picks the polygon exterior with the most vertices, which drops
/// islands.
fn largest_ring(collection: &GeometryCollection<f64>, path: &Path) -> Result<Border, RidgeError> {
    let mut polygons = Vec::new();
    collect_polygons(collection, &mut polygons);
    polygons
        .into_iter()
        .map(Polygon::exterior)
        .max_by_key(|ring| ring.0.len())
        .map(|ring| Border(ring.clone()))
        .ok_or_else(|| RidgeError::NoBorder(path.to_owned()))
}

fn collect_placemarks(kml: Kml<f64>, name: &str, out: &mut Vec<Placemark<f64>>) {
    match kml {
        Kml::KmlDocument(doc) => {
            for element in doc.elements {
                collect_placemarks(element, name, out);
            }
        }
        Kml::Document { elements, .. } | Kml::Folder { elements, .. } => {
            for element in elements {
                collect_placemarks(element, name, out);
            }
        }
        Kml::Placemark(placemark) => {
            if placemark.name.as_deref().map(str::trim) == Some(name) {
                out.push(placemark);
            }
        }
        _ => {}
    }
}

/// Flattens `elevation` to `baseline` wherever the matching
/// `longitude` falls outside `span`.
pub fn apply_mask(elevation: &mut [f64], longitude: &[f64], span: Span, baseline: f64) {
    for (elev, &lon) in elevation.iter_mut().zip(longitude) {
        if !span.contains(lon) {
            *elev = baseline;
        }
    }
}

fn feature_name(feature: &Feature) -> Option<&str> {
    let properties = feature.properties.as_ref()?;
    properties
        .get("NAME")
        .or_else(|| properties.get("name"))
        .and_then(serde_json::Value::as_str)
}

fn collect_polygons<'a>(collection: &'a GeometryCollection<f64>, out: &mut Vec<&'a Polygon<f64>>) {
    for geometry in collection.iter() {
        match geometry {
            Geometry::Polygon(polygon) => out.push(polygon),
            Geometry::MultiPolygon(multi) => out.extend(multi.iter()),
            Geometry::GeometryCollection(nested) => collect_polygons(nested, out),
            _ => {}
        }
    }
}

/// On-disk form of [`Border`]: parallel coordinate arrays.
#[derive(Serialize, Deserialize)]
struct BorderVertices {
    lon: Vec<f64>,
    lat: Vec<f64>,
}

impl TryFrom<BorderVertices> for Border {
    type Error = RidgeError;

    fn try_from(BorderVertices { lon, lat }: BorderVertices) -> Result<Self, RidgeError> {
        if lon.len() != lat.len() {
            return Err(RidgeError::BorderLength {
                lon: lon.len(),
                lat: lat.len(),
            });
        }
        Ok(Self(
            lon.into_iter()
                .zip(lat)
                .map(|(x, y)| Coord { x, y })
                .collect(),
        ))
    }
}

impl From<Border> for BorderVertices {
    fn from(border: Border) -> Self {
        let (lon, lat) = border.0.coords().map(|c| (c.x, c.y)).unzip();
        Self { lon, lat }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_mask, Border, Span};
    use crate::RidgeError;
    use approx::assert_relative_eq;
    use geo::line_string;
    use std::io::Write;

    fn rectangle(west: f64, east: f64, south: f64, north: f64) -> Border {
        Border::new(line_string![
            (x: west, y: south),
            (x: west, y: north),
            (x: east, y: north),
            (x: east, y: south),
            (x: west, y: south),
        ])
    }

    #[test]
    fn test_intersections() {
        let border = rectangle(-122.0, -119.5, 36.5, 37.5);
        assert_eq!(
            border.intersections(&[37.0]),
            vec![Some(Span {
                min: -122.0,
                max: -119.5
            })]
        );
    }

    #[test]
    fn test_intersections_outside_border() {
        let border = rectangle(-122.0, -119.5, 36.5, 37.5);
        // Vertex latitudes themselves are not strictly between endpoints.
        let spans = border.intersections(&[38.0, 37.5, 36.0]);
        assert_eq!(spans, vec![None, None, None]);
    }

    #[test]
    fn test_intersections_use_segment_start() {
        // A slanted eastern edge contributes its starting vertex.
        let border = Border::new(line_string![
            (x: -124.0, y: 40.0),
            (x: -120.0, y: 42.0),
            (x: -114.0, y: 35.0),
            (x: -124.0, y: 40.0),
        ]);
        let spans = border.intersections(&[41.0, 38.0]);
        assert_eq!(
            spans,
            vec![
                Some(Span {
                    min: -124.0,
                    max: -120.0
                }),
                Some(Span {
                    min: -120.0,
                    max: -114.0
                }),
            ]
        );
    }

    #[test]
    fn test_apply_mask() {
        let lon = [-123.0, -122.5, -122.0, -121.5, -121.0];
        let mut elev = [1.0, 2.0, 3.0, 4.0, 5.0];
        let span = Span {
            min: -122.5,
            max: -121.6,
        };
        apply_mask(&mut elev, &lon, span, 37.5);
        assert_eq!(elev, [37.5, 2.0, 3.0, 37.5, 37.5]);
    }

    #[test]
    fn test_border_json_shape() {
        let border = rectangle(-122.0, -119.5, 36.5, 37.5);
        let json = serde_json::to_value(&border).unwrap();
        assert_eq!(json["lon"].as_array().unwrap().len(), 5);
        assert_relative_eq!(json["lat"][1].as_f64().unwrap(), 37.5);
        let back: Border = serde_json::from_value(json).unwrap();
        assert_eq!(back, border);
    }

    #[test]
    fn test_border_length_mismatch() {
        let err = serde_json::from_str::<Border>(r#"{"lon": [1.0, 2.0], "lat": [1.0]}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("2 longitudes but 1 latitudes"), "{err}");
    }

    #[test]
    fn test_from_geojson_filters_by_name_and_keeps_largest_ring() {
        let geojson = r#"{
          "type": "FeatureCollection",
          "features": [
            {
              "type": "Feature",
              "properties": { "NAME": "Nevada" },
              "geometry": {
                "type": "Polygon",
                "coordinates": [[[-120, 39], [-114, 39], [-114, 36], [-120, 39]]]
              }
            },
            {
              "type": "Feature",
              "properties": { "NAME": "California" },
              "geometry": {
                "type": "MultiPolygon",
                "coordinates": [
                  [[[-119.5, 33.4], [-119.4, 33.5], [-119.3, 33.4], [-119.5, 33.4]]],
                  [[[-124, 42], [-120, 42], [-120, 39], [-114, 35], [-117, 32.5], [-124, 42]]]
                ]
              }
            }
          ]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(geojson.as_bytes()).unwrap();

        let border = Border::from_geojson(file.path(), Some("California")).unwrap();
        assert_eq!(border.vertices().0.len(), 6);
        assert_relative_eq!(border.vertices().0[3].x, -114.0);

        let err = Border::from_geojson(file.path(), Some("Oregon")).unwrap_err();
        assert!(matches!(err, RidgeError::NoBorder(_)));
    }

    const BOUNDARIES_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Folder>
      <Placemark>
        <name>Nevada</name>
        <Polygon>
          <outerBoundaryIs><LinearRing>
            <coordinates>-120,39 -114,39 -114,36 -120,39</coordinates>
          </LinearRing></outerBoundaryIs>
        </Polygon>
      </Placemark>
      <Placemark>
        <name>California</name>
        <MultiGeometry>
          <Polygon>
            <outerBoundaryIs><LinearRing>
              <coordinates>-119.5,33.4 -119.4,33.5 -119.3,33.4 -119.5,33.4</coordinates>
            </LinearRing></outerBoundaryIs>
          </Polygon>
          <Polygon>
            <outerBoundaryIs><LinearRing>
              <coordinates>-124,42 -120,42 -120,39 -114,35 -117,32.5 -124,42</coordinates>
            </LinearRing></outerBoundaryIs>
          </Polygon>
        </MultiGeometry>
      </Placemark>
    </Folder>
  </Document>
</kml>
"#;

    #[test]
    fn test_from_kml_filters_by_name_and_keeps_largest_ring() {
        let mut file = tempfile::Builder::new().suffix(".kml").tempfile().unwrap();
        file.write_all(BOUNDARIES_KML.as_bytes()).unwrap();

        let border = Border::from_kml(file.path(), Some("California")).unwrap();
        assert_eq!(border.vertices().0.len(), 6);
        assert_relative_eq!(border.vertices().0[3].x, -114.0);
        assert_relative_eq!(border.vertices().0[4].y, 32.5);

        // Extension picks the reader.
        assert_eq!(Border::load(file.path(), Some("California")).unwrap(), border);

        let nevada = Border::from_kml(file.path(), Some("Nevada")).unwrap();
        assert_eq!(nevada.vertices().0.len(), 4);

        let err = Border::from_kml(file.path(), Some("Oregon")).unwrap_err();
        assert!(matches!(err, RidgeError::NoBorder(_)));
    }
}
