use geo::{BooleanOps, BoundingRect, Coord, MultiPolygon, Polygon, Rect};
use tracing::warn;

use crate::geom::{clean, polygon_area, Projection};

/// An areal geometry as read from GeoJSON: a single polygon or a set of polygons.
/// Every other GeoJSON geometry type is rejected at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl Shape {
    /// Get the polygon parts of the shape (a single part for `Polygon`).
    pub fn parts(&self) -> &[Polygon<f64>] {
        match self {
            Shape::Polygon(polygon) => std::slice::from_ref(polygon),
            Shape::MultiPolygon(multi) => &multi.0,
        }
    }

    /// Check if the shape has no parts, or only parts with empty outer rings.
    pub fn is_empty(&self) -> bool {
        self.parts().iter().all(|part| part.exterior().0.is_empty())
    }

    /// Compute the bounding rectangle of all parts.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        match self {
            Shape::Polygon(polygon) => polygon.bounding_rect(),
            Shape::MultiPolygon(multi) => multi.bounding_rect(),
        }
    }

    /// Flatten into a MultiPolygon.
    pub fn to_multipolygon(&self) -> MultiPolygon<f64> {
        MultiPolygon(self.parts().to_vec())
    }

    /// Merge two shapes into a MultiPolygon holding the parts of both.
    pub fn merge(&self, other: &Shape) -> Shape {
        let mut parts = self.parts().to_vec();
        parts.extend_from_slice(other.parts());
        Shape::MultiPolygon(MultiPolygon(parts))
    }
}

impl From<Polygon<f64>> for Shape {
    fn from(polygon: Polygon<f64>) -> Self { Shape::Polygon(polygon) }
}

impl From<MultiPolygon<f64>> for Shape {
    fn from(multi: MultiPolygon<f64>) -> Self { Shape::MultiPolygon(multi) }
}

/// A shape projected to planar metres and cleaned into simple parts, ready for overlay.
///
/// Part bounding boxes and the total area are cached, since every zone is tested
/// against every precinct part.
#[derive(Debug, Clone, Default)]
pub struct PreparedShape {
    parts: Vec<Polygon<f64>>,
    bounds: Vec<Rect<f64>>,
    area: f64,
}

impl PreparedShape {
    /// Project a geographic shape and clean it. Projection failures yield an empty
    /// prepared shape (zero area), never an error.
    pub fn new(shape: &Shape, projection: &Projection) -> Self {
        match projection.project(shape) {
            Ok(projected) => Self::from_projected(&projected),
            Err(e) => {
                warn!(error = %e, "failed to project geometry, treating it as empty");
                Self::default()
            }
        }
    }

    /// Clean an already projected shape.
    pub fn from_projected(shape: &Shape) -> Self {
        Self::from_parts(clean(shape))
    }

    /// Build from simple, projected parts. Parts without a bounding box or positive area are dropped.
    pub(crate) fn from_parts(parts: Vec<Polygon<f64>>) -> Self {
        let (parts, bounds): (Vec<_>, Vec<_>) = parts.into_iter()
            .filter(|part| polygon_area(part) > 0.0)
            .filter_map(|part| part.bounding_rect().map(|rect| (part, rect)))
            .unzip();
        let area = parts.iter().map(polygon_area).sum();
        Self { parts, bounds, area }
    }

    /// Union two prepared shapes, so that overlapping parts are only counted once.
    pub fn union(&self, other: &PreparedShape) -> PreparedShape {
        if self.parts.is_empty() { return other.clone() }
        if other.parts.is_empty() { return self.clone() }
        let merged = MultiPolygon(self.parts.clone()).union(&MultiPolygon(other.parts.clone()));
        Self::from_projected(&Shape::MultiPolygon(merged))
    }

    /// Get the simple projected parts.
    #[inline] pub fn parts(&self) -> &[Polygon<f64>] { &self.parts }

    /// Iterate over parts together with their bounding rectangles.
    #[inline]
    pub(crate) fn parts_with_bounds(&self) -> impl Iterator<Item = (&Polygon<f64>, &Rect<f64>)> {
        self.parts.iter().zip(self.bounds.iter())
    }

    /// Get the planar area in projected units (sum of part areas).
    #[inline] pub fn area(&self) -> f64 { self.area }

    /// Check if no part survived projection and cleaning.
    #[inline] pub fn is_empty(&self) -> bool { self.parts.is_empty() }

    /// Compute the bounding rectangle of all parts.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds.iter().copied().reduce(|a, b| Rect::new(
            Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
            Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
        ))
    }
}
