use std::sync::OnceLock;

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::geom::Shape;

/// A parsed GeoJSON FeatureCollection restricted to areal features.
#[derive(Debug, Clone)]
pub(crate) struct FeatureCollection {
    /// Source CRS detected from the legacy `crs` member (4326 when absent).
    pub epsg: u32,
    pub features: Vec<Feature>,
}

/// A single feature; `shape` is `None` for missing, non-areal or malformed geometry.
#[derive(Debug, Clone)]
pub(crate) struct Feature {
    pub shape: Option<Shape>,
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Read a property as a string; numbers are rendered without quotes.
    pub(crate) fn property_string(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Read a property as a finite number; numeric strings are parsed.
    pub(crate) fn property_f64(&self, key: &str) -> Option<f64> {
        let value = match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }
}

/// Parse a FeatureCollection from bytes. Only a document that is not JSON or has no
/// `features` array is an error; individual bad features are logged and kept without geometry.
pub(crate) fn read_feature_collection(bytes: &[u8]) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_slice(bytes).context("Failed to parse GeoJSON bytes")?;
    let raw_features = value["features"].as_array()
        .ok_or_else(|| anyhow!("GeoJSON document has no `features` array"))?;

    let features = raw_features.iter().enumerate()
        .map(|(i, feature)| {
            let properties = feature["properties"].as_object().cloned().unwrap_or_default();
            let shape = match parse_shape(&feature["geometry"]) {
                Ok(shape) => shape,
                Err(e) => {
                    warn!(feature = i, error = %e, "skipping malformed feature geometry");
                    None
                }
            };
            Feature { shape, properties }
        })
        .collect();

    Ok(FeatureCollection { epsg: detect_epsg(&value), features })
}

/// Best-effort EPSG code from a FeatureCollection's `crs.properties.name`.
/// Handles `urn:ogc:def:crs:EPSG::4283`, versioned URNs such as
/// `urn:ogc:def:crs:EPSG:6.18:3:3857` (the code is the last number), `EPSG:7844`,
/// `urn:ogc:def:crs:OGC:1.3:CRS84` and the GDA94/GDA2020 aliases; defaults to 4326.
pub(crate) fn detect_epsg(collection: &Value) -> u32 {
    static EPSG_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = EPSG_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)EPSG:.*?(\d+)$").expect("valid EPSG regex")
    });

    let name = collection["crs"]["properties"]["name"].as_str().unwrap_or_default().trim();
    if let Some(code) = pattern.captures(name).and_then(|c| c[1].parse::<u32>().ok()) {
        return code;
    }

    let upper = name.to_ascii_uppercase();
    if upper.contains("CRS84") { return 4326 }
    if upper.contains("GDA2020") { return 7844 }
    if upper.contains("GDA94") { return 4283 }
    4326
}

/// Parse a GeoJSON geometry object. `Ok(None)` for null or non-areal geometry.
pub(crate) fn parse_shape(geometry: &Value) -> Result<Option<Shape>> {
    if geometry.is_null() { return Ok(None) }

    let coords = geometry["coordinates"].as_array();
    match (geometry["type"].as_str(), coords) {
        (Some("Polygon"), Some(rings)) => Ok(Some(Shape::Polygon(parse_polygon_coords(rings)?))),
        (Some("MultiPolygon"), Some(polygons)) => {
            let parts = polygons.iter()
                .map(|polygon| {
                    let rings = polygon.as_array()
                        .ok_or_else(|| anyhow!("Invalid MultiPolygon: part is not an array"))?;
                    parse_polygon_coords(rings)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(Shape::MultiPolygon(MultiPolygon(parts))))
        }
        (Some("Polygon" | "MultiPolygon"), None) => bail!("geometry has no coordinates array"),
        (other, _) => {
            debug!(geometry_type = other.unwrap_or("<missing>"), "ignoring non-areal geometry");
            Ok(None)
        }
    }
}

/// Parse polygon coordinates `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        let ring = ring.as_array().ok_or_else(|| anyhow!("Invalid Polygon: ring is not an array"))?;
        parse_ring_coords(ring)
    });

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring `[[x, y], [x, y], ...]`; extra ordinates (z, m) are ignored.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let points = coords.iter()
        .map(|pair| {
            let pair = pair.as_array().filter(|p| p.len() >= 2)
                .ok_or_else(|| anyhow!("Invalid coordinate: expected [x, y]"))?;
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LineString(points))
}
