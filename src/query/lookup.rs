use std::collections::BTreeMap;

use geo::Coord;

use crate::map::{Zone, ZoneLayer};

/// Value of the zone containing `point` (lon/lat) in each layer, keyed by year.
///
/// The first zone in load order wins. Years where no zone contains the point, or the
/// zone has no value, report 0.
pub fn lookup_value_at_point<'a>(
    point: Coord<f64>,
    layers: impl IntoIterator<Item = &'a ZoneLayer>,
) -> BTreeMap<u16, f64> {
    layers.into_iter()
        .map(|layer| (layer.year(), layer.zone_at(point).map_or(0.0, Zone::value_or_zero)))
        .collect()
}
