use geo::{Coord, Rect};
use rstar::{RTree, AABB};

use crate::{geom::{contains_point, BoundingBox}, map::Zone};

/// All zones of one census year, with the property names they were read with.
///
/// Zone geometry and codes may differ between years, so each year is its own layer.
#[derive(Debug)]
pub struct ZoneLayer {
    year: u16,
    code_field: String,
    value_field: String,
    zones: Vec<Zone>,
    rtree: RTree<BoundingBox>, // Projected part bounds, indexed by zone
}

impl ZoneLayer {
    /// Construct a layer from zones in load order.
    pub fn new(year: u16, code_field: impl Into<String>, value_field: impl Into<String>, zones: Vec<Zone>) -> Self {
        let boxes = zones.iter().enumerate()
            .filter_map(|(i, zone)| zone.prepared().bounds().map(|rect| BoundingBox::new(i, rect)))
            .collect();

        Self {
            year,
            code_field: code_field.into(),
            value_field: value_field.into(),
            rtree: RTree::bulk_load(boxes),
            zones,
        }
    }

    #[inline] pub fn year(&self) -> u16 { self.year }

    #[inline] pub fn code_field(&self) -> &str { &self.code_field }

    #[inline] pub fn value_field(&self) -> &str { &self.value_field }

    #[inline] pub fn zones(&self) -> &[Zone] { &self.zones }

    #[inline] pub fn len(&self) -> usize { self.zones.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.zones.is_empty() }

    /// Defined attribute values of all zones.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.zones.iter().filter_map(Zone::value)
    }

    /// First zone, in load order, whose geographic shape contains `point`.
    /// Zones within a year are assumed not to overlap.
    pub fn zone_at(&self, point: Coord<f64>) -> Option<&Zone> {
        self.zones.iter().find(|zone| contains_point(zone.shape(), point))
    }

    /// Zones whose projected bounds overlap `rect`, in load order.
    pub(crate) fn candidates(&self, rect: &Rect<f64>) -> impl Iterator<Item = &Zone> {
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
        let mut indices = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(BoundingBox::idx)
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices.into_iter().map(|i| &self.zones[i])
    }
}

#[cfg(test)]
mod tests {
    use geo::{coord, polygon, Rect};

    use super::*;
    use crate::geom::{Projection, Shape};

    fn layer() -> ZoneLayer {
        let projection = Projection::identity(3857);
        let zones = vec![
            Zone::new("west", Some(10.0), Shape::Polygon(polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)]), &projection),
            Zone::new("east", None, Shape::Polygon(polygon![(x: 10.0, y: 0.0), (x: 20.0, y: 0.0), (x: 20.0, y: 10.0), (x: 10.0, y: 10.0)]), &projection),
            Zone::new("far", Some(99.0), Shape::Polygon(polygon![(x: 100.0, y: 100.0), (x: 110.0, y: 100.0), (x: 110.0, y: 110.0), (x: 100.0, y: 110.0)]), &projection),
        ];
        ZoneLayer::new(2011, "DZN_CODE11", "TotJob_11", zones)
    }

    #[test]
    fn zone_lookup_by_point() {
        let layer = layer();
        assert_eq!(layer.zone_at(coord! { x: 5.0, y: 5.0 }).map(Zone::code), Some("west"));
        assert_eq!(layer.zone_at(coord! { x: 15.0, y: 5.0 }).map(Zone::code), Some("east"));
        assert!(layer.zone_at(coord! { x: 50.0, y: 50.0 }).is_none());
    }

    #[test]
    fn candidates_come_from_the_rtree_in_load_order() {
        let layer = layer();
        let rect = Rect::new(coord! { x: 5.0, y: 5.0 }, coord! { x: 15.0, y: 6.0 });
        let codes = layer.candidates(&rect).map(Zone::code).collect::<Vec<_>>();
        assert_eq!(codes, ["west", "east"]);
    }

    #[test]
    fn values_skip_missing() {
        let values = layer().values().collect::<Vec<_>>();
        assert_eq!(values, [10.0, 99.0]);
    }
}
