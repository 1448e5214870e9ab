use geo::{Coord, LineString, Point};

use crate::geom::{ring_area, Shape};

/// Signed-area-weighted centroid of a ring. `None` for rings without area.
fn ring_centroid(ring: &LineString<f64>) -> Option<Coord<f64>> {
    let coords = &ring.0;
    let n = coords.len();
    if n < 3 { return None }

    let origin = coords[0];
    let (mut twice_area, mut cx, mut cy) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let a = coords[i] - origin;
        let b = coords[(i + 1) % n] - origin;
        let cross = a.x * b.y - b.x * a.y;
        twice_area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    if twice_area == 0.0 || !twice_area.is_finite() { return None }
    let centroid = Coord {
        x: origin.x + cx / (3.0 * twice_area),
        y: origin.y + cy / (3.0 * twice_area),
    };
    (centroid.x.is_finite() && centroid.y.is_finite()).then_some(centroid)
}

/// Representative point of a shape: the centroid of the outer ring for a polygon, or of the
/// outer ring of the part with the largest absolute area for a multipolygon (not a combined
/// centroid). Holes are ignored. `None` for empty or degenerate geometry.
pub fn centroid(shape: &Shape) -> Option<Point<f64>> {
    let largest = shape.parts().iter()
        .map(|part| (part, ring_area(part.exterior()).abs()))
        .filter(|(_, area)| area.is_finite() && *area > 0.0)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(part, _)| part)?;

    ring_centroid(largest.exterior()).map(Point::from)
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;

    #[test]
    fn centroid_of_rectangle() {
        let rect = Shape::Polygon(polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 2.0), (x: 0.0, y: 2.0)]);
        let c = centroid(&rect).unwrap();
        assert!((c.x() - 2.0).abs() < 1e-12);
        assert!((c.y() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_triangle_either_orientation() {
        let ccw = Shape::Polygon(polygon![(x: 0.0, y: 0.0), (x: 3.0, y: 0.0), (x: 0.0, y: 3.0)]);
        let cw = Shape::Polygon(polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 3.0), (x: 3.0, y: 0.0)]);
        for shape in [ccw, cw] {
            let c = centroid(&shape).unwrap();
            assert!((c.x() - 1.0).abs() < 1e-12);
            assert!((c.y() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn multipolygon_uses_largest_part() {
        let small = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let large = polygon![(x: 10.0, y: 10.0), (x: 14.0, y: 10.0), (x: 14.0, y: 14.0), (x: 10.0, y: 14.0)];
        let shape = Shape::MultiPolygon(MultiPolygon(vec![small, large]));
        let c = centroid(&shape).unwrap();
        assert!((c.x() - 12.0).abs() < 1e-12);
        assert!((c.y() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_shapes_have_no_centroid() {
        let flat = Shape::Polygon(polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 2.0)]);
        assert!(centroid(&flat).is_none());
        assert!(centroid(&Shape::MultiPolygon(MultiPolygon(vec![]))).is_none());
    }
}
