use tracing::{debug, info};

use crate::{
    classify::ClassBreakpoints,
    common::OverlayError,
    geom::{intersect, multipolygon_area, rects_overlap, PreparedShape},
    map::{Precinct, ZoneLayer},
    overlay::{OverlayResult, ZoneArea},
};

/// Intersect a precinct with every zone of a layer and classify the overlapping zone values.
///
/// Zones are found through the layer's R-tree, then each (precinct part, zone part) pair
/// is rejected by bounding box before being clipped. A zone with no positive overlap is
/// not recorded.
pub fn compute_overlay(
    precinct: &Precinct,
    layer: &ZoneLayer,
    breakpoints: &ClassBreakpoints,
) -> Result<OverlayResult, OverlayError> {
    let prepared = precinct.prepared();
    let precinct_area = prepared.area();
    let bounds = match prepared.bounds() {
        Some(bounds) if precinct_area > 0.0 => bounds,
        _ => return Err(OverlayError::ZeroAreaPrecinct(precinct.name().to_owned())),
    };
    info!(precinct = precinct.name(), year = layer.year(), precinct_area, "computing precinct overlay");

    let mut candidates = 0usize;
    let areas = layer.candidates(&bounds)
        .inspect(|_| candidates += 1)
        .filter_map(|zone| {
            let area = intersection_area(prepared, zone.prepared());
            (area > 0.0).then(|| ZoneArea {
                code: zone.code().to_owned(),
                value: zone.value_or_zero(),
                area,
            })
        })
        .collect::<Vec<_>>();

    debug!(precinct = precinct.name(), candidates, zones = layer.len(), "zone candidates from index");
    let result = OverlayResult::new(precinct.name(), layer.year(), precinct_area, areas, breakpoints);
    info!(precinct = precinct.name(), year = layer.year(), intersections = result.dzn_intersect_count(), "overlay complete");
    Ok(result)
}

/// Total clipped area between two prepared shapes. Parts within each shape are disjoint,
/// so pairwise areas add up.
fn intersection_area(a: &PreparedShape, b: &PreparedShape) -> f64 {
    let mut total = 0.0;
    for (a_part, a_rect) in a.parts_with_bounds() {
        for (b_part, b_rect) in b.parts_with_bounds() {
            if !rects_overlap(a_rect, b_rect) { continue }
            if let Some(clipped) = intersect(a_part, b_part) {
                total += multipolygon_area(&clipped);
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use geo::{coord, MultiPolygon, Rect};

    use super::*;
    use crate::{
        classify::ValueClass,
        geom::{Projection, Shape},
        map::Zone,
    };

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> geo::Polygon<f64> {
        Rect::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 }).to_polygon()
    }

    fn planar() -> Projection { Projection::identity(3857) }

    #[test]
    fn shares_follow_overlap_area() {
        let precinct = Precinct::new("P", Shape::Polygon(rect(0.0, 0.0, 10.0, 10.0)), &planar());
        let layer = ZoneLayer::new(2011, "code", "value", vec![
            Zone::new("left", Some(600.0), Shape::Polygon(rect(-5.0, 0.0, 3.0, 10.0)), &planar()),
            Zone::new("right", Some(3000.0), Shape::Polygon(rect(3.0, 0.0, 20.0, 10.0)), &planar()),
            Zone::new("away", Some(3000.0), Shape::Polygon(rect(30.0, 0.0, 40.0, 10.0)), &planar()),
        ]);

        let result = compute_overlay(&precinct, &layer, &ClassBreakpoints::DEFAULT).unwrap();
        assert_eq!(result.dzn_intersect_count(), 2);
        assert!((result.precinct_area() - 100.0).abs() < 1e-9);

        let top = &result.intersections()[0];
        assert_eq!(top.code, "right");
        assert!((top.area_share - 0.7).abs() < 1e-9);
        assert_eq!(result.classes()[0].class, ValueClass::VeryHigh);
        assert_eq!(result.classes()[1].class, ValueClass::Low);
    }

    #[test]
    fn multipart_zones_are_summed_once() {
        let precinct = Precinct::new("P", Shape::Polygon(rect(0.0, 0.0, 10.0, 10.0)), &planar());
        let sides = MultiPolygon(vec![rect(0.0, 0.0, 2.0, 10.0), rect(8.0, 0.0, 10.0, 10.0)]);
        let layer = ZoneLayer::new(2016, "code", "value", vec![
            Zone::new("sides", None, Shape::MultiPolygon(sides), &planar()),
        ]);

        let result = compute_overlay(&precinct, &layer, &ClassBreakpoints::DEFAULT).unwrap();
        assert_eq!(result.dzn_intersect_count(), 1);
        assert!((result.intersections()[0].area_share - 0.4).abs() < 1e-9);
        assert_eq!(result.intersections()[0].value, 0.0);
    }

    #[test]
    fn touching_zones_do_not_intersect() {
        let precinct = Precinct::new("P", Shape::Polygon(rect(0.0, 0.0, 10.0, 10.0)), &planar());
        let layer = ZoneLayer::new(2011, "code", "value", vec![
            Zone::new("edge", Some(1.0), Shape::Polygon(rect(10.0, 0.0, 20.0, 10.0)), &planar()),
        ]);
        let result = compute_overlay(&precinct, &layer, &ClassBreakpoints::DEFAULT).unwrap();
        assert!(result.is_empty());
        assert!(result.classes().is_empty());
    }

    #[test]
    fn degenerate_precinct_is_an_error() {
        let line = rect(0.0, 0.0, 10.0, 0.0);
        let precinct = Precinct::new("Flat", Shape::Polygon(line), &planar());
        let layer = ZoneLayer::new(2011, "code", "value", Vec::new());
        assert_eq!(
            compute_overlay(&precinct, &layer, &ClassBreakpoints::DEFAULT),
            Err(OverlayError::ZeroAreaPrecinct("Flat".into())),
        );
    }
}
