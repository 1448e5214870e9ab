use std::fmt;

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::geom::Shape;

/// EPSG codes whose coordinates are already spherical Web Mercator metres.
const WEB_MERCATOR_CODES: [u32; 4] = [3857, 3785, 900913, 102100];

/// EPSG codes understood as geographic lon/lat in degrees.
const GEOGRAPHIC_CODES: [u32; 4] = [4326, 4283, 7844, 4269];

/// Web Mercator latitude limit; the projection diverges at the poles.
const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Both ends share the 6378137 m sphere, so no datum shift is applied and the target
/// is exactly EPSG:3857. GDA94/GDA2020 differ from WGS84 by well under the sizes
/// that matter for area shares.
const SOURCE_GEOG_PROJ4: &str = "+proj=longlat +a=6378137 +b=6378137 +no_defs";
const TARGET_MERC_PROJ4: &str = "+proj=merc +a=6378137 +b=6378137 +lon_0=0 +x_0=0 +y_0=0 +units=m +no_defs";

/// Projection from a GeoJSON source CRS into planar metres (spherical Web Mercator).
/// Sources that are already Web Mercator pass through unchanged.
pub struct Projection {
    epsg: u32,
    transform: Option<(Proj4, Proj4)>,
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projection")
            .field("epsg", &self.epsg)
            .field("identity", &self.transform.is_none())
            .finish()
    }
}

impl Projection {
    /// Build the projection for a source EPSG code. Unknown codes are treated as
    /// geographic lon/lat, which is what GeoJSON mandates.
    pub fn to_web_mercator(epsg: u32) -> Result<Self> {
        if WEB_MERCATOR_CODES.contains(&epsg) { return Ok(Self::identity(epsg)) }
        if !GEOGRAPHIC_CODES.contains(&epsg) {
            tracing::warn!(epsg, "unrecognised source CRS, assuming geographic lon/lat");
        }

        let from = Proj4::from_proj_string(SOURCE_GEOG_PROJ4)
            .with_context(|| anyhow!("failed to build source PROJ.4: {SOURCE_GEOG_PROJ4}"))?;
        let to = Proj4::from_proj_string(TARGET_MERC_PROJ4)
            .with_context(|| anyhow!("failed to build target PROJ.4: {TARGET_MERC_PROJ4}"))?;

        Ok(Self { epsg, transform: Some((from, to)) })
    }

    /// A projection that leaves coordinates untouched (input is already planar).
    pub fn identity(epsg: u32) -> Self { Self { epsg, transform: None } }

    /// Get the source EPSG code.
    #[inline] pub fn epsg(&self) -> u32 { self.epsg }

    /// Project a single lon/lat coordinate (degrees) to metres.
    pub fn project_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let Some((from, to)) = &self.transform else { return Ok(coord) };

        if !coord.x.is_finite() || !coord.y.is_finite() {
            bail!("non-finite coordinate ({}, {})", coord.x, coord.y);
        }
        if coord.y.abs() > MAX_LATITUDE {
            bail!("latitude {} outside the Web Mercator range", coord.y);
        }

        // Map coords -> radians in, meters out.
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(from, to, &mut point)
            .map_err(|e| anyhow!("CRS transform failed for ({}, {}): {e:?}", coord.x, coord.y))?;
        Ok(Coord { x: point.0, y: point.1 })
    }

    /// Project every coordinate of a shape, failing on the first coordinate that cannot be projected.
    pub fn project(&self, shape: &Shape) -> Result<Shape> {
        if self.transform.is_none() { return Ok(shape.clone()) }

        let project = |coord: Coord<f64>| self.project_coord(coord);
        Ok(match shape {
            Shape::Polygon(polygon) => Shape::Polygon(polygon.try_map_coords(project)?),
            Shape::MultiPolygon(multi) => Shape::MultiPolygon(multi.try_map_coords(project)?),
        })
    }
}
