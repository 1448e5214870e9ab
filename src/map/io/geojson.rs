use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    common::read_feature_collection,
    geom::Projection,
    map::{Precinct, PrecinctSet, Zone, ZoneLayer},
};

/// Property holding the precinct name.
const PRECINCT_NAME_FIELD: &str = "name";

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read GeoJSON file {}", path.display()))
}

impl ZoneLayer {
    /// Build a zone layer from a GeoJSON FeatureCollection.
    ///
    /// Features without areal geometry are skipped. A missing code is stored as an
    /// empty string; a missing or non-numeric value is stored as `None`.
    pub fn from_geojson(bytes: &[u8], year: u16, code_field: &str, value_field: &str) -> Result<Self> {
        let collection = read_feature_collection(bytes)
            .with_context(|| format!("Failed to read zone layer for {year}"))?;
        let projection = Projection::to_web_mercator(collection.epsg)?;

        let total = collection.features.len();
        let zones = collection.features.into_iter()
            .filter_map(|feature| {
                let code = feature.property_string(code_field).unwrap_or_default();
                let value = feature.property_f64(value_field);
                let shape = feature.shape?;
                Some(Zone::new(code, value, shape, &projection))
            })
            .collect::<Vec<_>>();

        if zones.len() < total {
            warn!(year, skipped = total - zones.len(), "zone features without areal geometry were skipped");
        }
        info!(year, zones = zones.len(), epsg = projection.epsg(), "loaded zone layer");

        Ok(Self::new(year, code_field, value_field, zones))
    }

    /// Read a zone layer from a GeoJSON file at `path`.
    pub fn read_from_geojson(path: &Path, year: u16, code_field: &str, value_field: &str) -> Result<Self> {
        Self::from_geojson(&read_file(path)?, year, code_field, value_field)
    }
}

impl PrecinctSet {
    /// Build the precinct set from a GeoJSON FeatureCollection named by `properties.name`.
    pub fn from_geojson(bytes: &[u8]) -> Result<Self> {
        let collection = read_feature_collection(bytes).context("Failed to read precinct boundaries")?;
        let projection = Projection::to_web_mercator(collection.epsg)?;

        let precincts = collection.features.into_iter()
            .filter_map(|feature| {
                let Some(name) = feature.property_string(PRECINCT_NAME_FIELD) else {
                    warn!("skipping precinct feature without a name");
                    return None
                };
                let Some(shape) = feature.shape else {
                    warn!(precinct = name, "skipping precinct feature without areal geometry");
                    return None
                };
                Some(Precinct::new(name, shape, &projection))
            })
            .collect::<Vec<_>>();

        let set = Self::new(precincts);
        info!(precincts = set.len(), epsg = projection.epsg(), "loaded precinct boundaries");
        Ok(set)
    }

    /// Read the precinct set from a GeoJSON file at `path`.
    pub fn read_from_geojson(path: &Path) -> Result<Self> {
        Self::from_geojson(&read_file(path)?)
    }
}
