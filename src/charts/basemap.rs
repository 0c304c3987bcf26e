//! State outlines drawn under the accident points.
//! Loaded from a GeoJSON FeatureCollection of Polygon / MultiPolygon features.

use crate::charts::MapBounds;
use crate::error::{FarsError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

type Position = Vec<f64>;

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

/// Outline rings in (longitude, latitude).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseMap {
    rings: Vec<Vec<(f64, f64)>>,
}

impl BaseMap {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rings(rings: Vec<Vec<(f64, f64)>>) -> Self {
        Self { rings }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FarsError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let map = Self::from_geojson_str(&text)?;
        debug!(path = %path.display(), rings = map.rings.len(), "loaded base map");
        Ok(map)
    }

    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let collection: FeatureCollection =
            serde_json::from_str(text).map_err(|e| FarsError::BaseMap(e.to_string()))?;

        let mut rings = Vec::new();
        for geometry in collection.features.into_iter().filter_map(|f| f.geometry) {
            match geometry {
                Geometry::Polygon { coordinates } => {
                    rings.extend(coordinates.iter().map(|r| Self::ring(r)))
                }
                Geometry::MultiPolygon { coordinates } => rings.extend(
                    coordinates
                        .iter()
                        .flat_map(|polygon| polygon.iter().map(|r| Self::ring(r))),
                ),
                Geometry::Unsupported => {}
            }
        }

        Ok(Self { rings })
    }

    fn ring(positions: &[Position]) -> Vec<(f64, f64)> {
        positions
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| (p[0], p[1]))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Outline edges cut to `bounds`; edges entirely outside are dropped.
    pub fn clipped_segments(&self, bounds: &MapBounds) -> Vec<[(f64, f64); 2]> {
        self.rings
            .iter()
            .flat_map(|ring| ring.windows(2))
            .filter_map(|edge| clip_segment(edge[0], edge[1], bounds))
            .collect()
    }
}

/// Liang-Barsky line clipping.
fn clip_segment(a: (f64, f64), b: (f64, f64), bounds: &MapBounds) -> Option<[(f64, f64); 2]> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let checks = [
        (-dx, a.0 - bounds.lon_min),
        (dx, bounds.lon_max - a.0),
        (-dy, a.1 - bounds.lat_min),
        (dy, bounds.lat_max - a.1),
    ];

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some([
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ])
}
