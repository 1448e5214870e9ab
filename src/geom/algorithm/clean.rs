use geo::{orient::Direction, BooleanOps, Coord, LineString, MultiPolygon, Orient, Polygon};
use tracing::warn;

use crate::geom::{polygon_area, Shape};

/// Drop non-finite and consecutive duplicate vertices and close the ring.
/// `None` when fewer than three distinct vertices remain.
fn sanitize_ring(ring: &LineString<f64>) -> Option<LineString<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(ring.0.len() + 1);
    for &coord in ring.0.iter().filter(|c| c.x.is_finite() && c.y.is_finite()) {
        if coords.last() != Some(&coord) { coords.push(coord) }
    }
    while coords.len() > 1 && coords.first() == coords.last() { coords.pop(); }
    if coords.len() < 3 { return None }

    coords.push(coords[0]);
    Some(LineString(coords))
}

/// Clean a single polygon into zero or more simple parts.
fn clean_polygon(polygon: &Polygon<f64>) -> Vec<Polygon<f64>> {
    let Some(exterior) = sanitize_ring(polygon.exterior()) else {
        warn!("dropping polygon part with a degenerate outer ring");
        return Vec::new();
    };
    let interiors = polygon.interiors().iter().filter_map(sanitize_ring).collect::<Vec<_>>();
    let candidate = Polygon::new(exterior, interiors);

    // Re-noding through the overlay splits self-intersecting rings at their crossings
    // (even-odd fill), so a bow-tie becomes two triangles.
    let resolved = candidate.union(&MultiPolygon::<f64>(Vec::new()));

    let parts = resolved.0.into_iter()
        .map(|part| part.orient(Direction::Default))
        .filter(|part| polygon_area(part) > 0.0)
        .collect::<Vec<_>>();

    let before = polygon_area(&candidate);
    let after = parts.iter().map(polygon_area).sum::<f64>();
    if parts.len() != 1 || (before - after).abs() > 1e-9 * before.max(1.0) {
        warn!(parts = parts.len(), area_before = before, area_after = after, "repaired invalid polygon");
    }
    parts
}

/// Normalise a shape into independent simple polygons: ring winding fixed (outer rings
/// counter-clockwise, holes clockwise), self-intersections split, multipolygons flattened,
/// and parts with zero or invalid area discarded.
///
/// Source boundaries are hand digitised, so defects are repaired or skipped, never raised.
pub fn clean(shape: &Shape) -> Vec<Polygon<f64>> {
    shape.parts().iter().flat_map(clean_polygon).collect()
}

#[cfg(test)]
mod tests {
    use geo::{coord, polygon, LineString, MultiPolygon};

    use super::*;
    use crate::geom::ring_area;

    #[test]
    fn clockwise_square_is_reoriented() {
        let cw = Shape::Polygon(polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 2.0), (x: 2.0, y: 2.0), (x: 2.0, y: 0.0)]);
        let parts = clean(&cw);
        assert_eq!(parts.len(), 1);
        assert!(ring_area(parts[0].exterior()) > 0.0);
        assert!((polygon_area(&parts[0]) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn bow_tie_is_split_into_two_triangles() {
        // Crosses itself at (1, 1): two triangles of area 1 each.
        let bow_tie = Shape::Polygon(Polygon::new(
            LineString(vec![
                coord! { x: 0.0, y: 0.0 },
                coord! { x: 2.0, y: 2.0 },
                coord! { x: 2.0, y: 0.0 },
                coord! { x: 0.0, y: 2.0 },
                coord! { x: 0.0, y: 0.0 },
            ]),
            vec![],
        ));
        let parts = clean(&bow_tie);
        assert_eq!(parts.len(), 2);
        let total = parts.iter().map(polygon_area).sum::<f64>();
        assert!((total - 2.0).abs() < 1e-6, "total area {total}");
    }

    #[test]
    fn multipolygon_is_flattened_and_degenerate_parts_dropped() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let other = polygon![(x: 5.0, y: 0.0), (x: 7.0, y: 0.0), (x: 7.0, y: 2.0), (x: 5.0, y: 2.0)];
        let sliver = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0), (x: 2.0, y: 2.0)];
        let point = polygon![(x: 3.0, y: 3.0), (x: 3.0, y: 3.0), (x: 3.0, y: 3.0)];
        let shape = Shape::MultiPolygon(MultiPolygon(vec![square, other, sliver, point]));

        let parts = clean(&shape);
        assert_eq!(parts.len(), 2);
        let total = parts.iter().map(polygon_area).sum::<f64>();
        assert!((total - 5.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_vertices_are_dropped() {
        let ring = LineString(vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: f64::NAN, y: 1.0 },
            coord! { x: 3.0, y: 0.0 },
            coord! { x: 3.0, y: 3.0 },
            coord! { x: 0.0, y: 3.0 },
            coord! { x: 0.0, y: 0.0 },
        ]);
        let parts = clean(&Shape::Polygon(Polygon::new(ring, vec![])));
        assert_eq!(parts.len(), 1);
        assert!((polygon_area(&parts[0]) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn holes_survive_cleaning() {
        let donut = Shape::Polygon(polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 4.0, y: 4.0), (x: 6.0, y: 4.0), (x: 6.0, y: 6.0), (x: 4.0, y: 6.0)]],
        ));
        let parts = clean(&donut);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].interiors().len(), 1);
        assert!((polygon_area(&parts[0]) - 96.0).abs() < 1e-9);
    }
}
