use geo::{Coord, LineString, Polygon};

use crate::geom::Shape;

/// Even-odd ray casting against a single ring. Open rings are closed implicitly.
fn ring_contains(ring: &LineString<f64>, point: Coord<f64>) -> bool {
    let coords = &ring.0;
    let n = coords.len();
    if n < 3 { return false }

    let mut inside = false;
    for i in 0..n {
        let (a, b) = (coords[i], coords[(i + 1) % n]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
    }
    inside
}

/// Inside the outer ring and outside every hole.
fn polygon_contains(polygon: &Polygon<f64>, point: Coord<f64>) -> bool {
    ring_contains(polygon.exterior(), point)
        && !polygon.interiors().iter().any(|hole| ring_contains(hole, point))
}

/// Point-in-polygon test by ray casting. A multipolygon contains the point if any
/// of its parts does. Points exactly on a boundary may resolve either way.
pub fn contains_point(shape: &Shape, point: Coord<f64>) -> bool {
    if !point.x.is_finite() || !point.y.is_finite() { return false }
    shape.parts().iter().any(|part| polygon_contains(part, point))
}
