use geo::{BooleanOps, BoundingRect, Intersects, MultiPolygon, Polygon};

use crate::geom::{multipolygon_area, rects_overlap};

/// Planar intersection of two simple polygons in the same projected coordinate system.
///
/// Rejects on bounding boxes first, then on a boolean intersects test, and only then
/// computes the clip. Returns `None` when the polygons are disjoint or when the clipped
/// area is not positive (shared edges and corners are not an intersection).
pub fn intersect(a: &Polygon<f64>, b: &Polygon<f64>) -> Option<MultiPolygon<f64>> {
    let (bbox_a, bbox_b) = (a.bounding_rect()?, b.bounding_rect()?);
    if !rects_overlap(&bbox_a, &bbox_b) { return None }
    if !a.intersects(b) { return None }

    let clipped = a.intersection(b);
    let area = multipolygon_area(&clipped);
    (area.is_finite() && area > 0.0).then_some(clipped)
}
