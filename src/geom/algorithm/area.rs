use geo::{LineString, MultiPolygon, Polygon};

use crate::geom::Shape;

/// Signed shoelace area of a ring; positive when the ring is counter-clockwise.
/// Vertices are taken relative to the first vertex, which keeps the sum stable
/// for rings far from the origin (projected metres are in the millions).
/// Open rings are closed implicitly.
pub fn ring_area(ring: &LineString<f64>) -> f64 {
    let coords = &ring.0;
    if coords.len() < 3 { return 0.0 }

    let origin = coords[0];
    let n = coords.len();
    let twice = (0..n)
        .map(|i| {
            let a = coords[i] - origin;
            let b = coords[(i + 1) % n] - origin;
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>();
    twice / 2.0
}

/// Area of a polygon: absolute outer ring area minus absolute hole areas, floored at zero.
/// Non-finite results count as zero.
pub fn polygon_area(polygon: &Polygon<f64>) -> f64 {
    let holes = polygon.interiors().iter().map(|ring| ring_area(ring).abs()).sum::<f64>();
    let area = ring_area(polygon.exterior()).abs() - holes;
    if area.is_finite() { area.max(0.0) } else { 0.0 }
}

/// Sum of polygon areas over all parts.
pub fn multipolygon_area(multi: &MultiPolygon<f64>) -> f64 {
    multi.0.iter().map(polygon_area).sum()
}

/// Planar area of a shape in squared coordinate units.
///
/// Only meaningful for projected shapes (see [`crate::Projection`]): shoelace area in raw
/// degrees is not a physical area and is not comparable across latitudes.
pub fn planar_area(shape: &Shape) -> f64 {
    shape.parts().iter().map(polygon_area).sum()
}
