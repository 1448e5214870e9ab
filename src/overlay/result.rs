use std::collections::BTreeMap;

use serde::Serialize;

use crate::classify::{ClassBreakpoints, ValueClass};

/// Raw intersection area of one zone with a precinct, before classification.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ZoneArea {
    pub code: String,
    pub value: f64,
    pub area: f64,
}

/// One zone's contribution to a precinct.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneIntersection {
    pub code: String,
    /// Zone value, with missing values counted as 0.
    pub value: f64,
    pub class: ValueClass,
    /// Intersection area in projected Web Mercator units, which overstate ground area
    /// by sec²(latitude).
    pub area: f64,
    /// Fraction of the precinct area, in `[0, 1]`.
    pub area_share: f64,
}

/// Aggregate coverage of one class within a precinct.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassShare {
    pub class: ValueClass,
    pub area: f64,
    pub share: f64,
    pub zone_count: usize,
}

/// The area-weighted class distribution of zone values within one precinct for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayResult {
    precinct: String,
    year: u16,
    precinct_area: f64,
    dzn_intersect_count: usize,
    intersections: Vec<ZoneIntersection>,
    classes: Vec<ClassShare>,
}

impl OverlayResult {
    /// Classify raw intersection areas and aggregate them by class.
    ///
    /// Areas are clamped to the precinct area and records without positive area are dropped.
    pub(crate) fn new(
        precinct: impl Into<String>,
        year: u16,
        precinct_area: f64,
        areas: Vec<ZoneArea>,
        breakpoints: &ClassBreakpoints,
    ) -> Self {
        let mut intersections = areas.into_iter()
            .filter(|zone| zone.area.is_finite() && zone.area > 0.0)
            .map(|zone| {
                let value = if zone.value.is_finite() { zone.value } else { 0.0 };
                let area = zone.area.min(precinct_area);
                ZoneIntersection {
                    code: zone.code,
                    value,
                    class: breakpoints.classify(value),
                    area,
                    area_share: area / precinct_area,
                }
            })
            .collect::<Vec<_>>();

        // Stable, so equal shares keep zone load order.
        intersections.sort_by(|a, b| b.area_share.total_cmp(&a.area_share));

        let classes = aggregate_classes(&intersections, precinct_area);
        Self {
            precinct: precinct.into(),
            year,
            precinct_area,
            dzn_intersect_count: intersections.len(),
            intersections,
            classes,
        }
    }

    /// A result with no intersections, used for unknown or degenerate precincts.
    pub fn empty(precinct: impl Into<String>, year: u16) -> Self {
        Self {
            precinct: precinct.into(),
            year,
            precinct_area: 0.0,
            dzn_intersect_count: 0,
            intersections: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Re-assign classes under new breakpoints from the stored intersections.
    pub fn reclassify(&mut self, breakpoints: &ClassBreakpoints) {
        for zone in &mut self.intersections {
            zone.class = breakpoints.classify(zone.value);
        }
        self.classes = aggregate_classes(&self.intersections, self.precinct_area);
    }

    #[inline] pub fn precinct(&self) -> &str { &self.precinct }

    #[inline] pub fn year(&self) -> u16 { self.year }

    /// Planar precinct area in projected Web Mercator units (about 1.6 times the ground
    /// area at Melbourne's latitude). Only ratios against it are meaningful.
    #[inline] pub fn precinct_area(&self) -> f64 { self.precinct_area }

    /// Number of zones with a positive intersection.
    #[inline] pub fn dzn_intersect_count(&self) -> usize { self.dzn_intersect_count }

    /// Per-zone records, largest share first.
    #[inline] pub fn intersections(&self) -> &[ZoneIntersection] { &self.intersections }

    /// Classes present, largest share first.
    #[inline] pub fn classes(&self) -> &[ClassShare] { &self.classes }

    /// The class covering the largest share, if any zone intersects.
    pub fn dominant(&self) -> Option<&ClassShare> { self.classes.first() }

    /// Check if no zone intersects the precinct.
    #[inline] pub fn is_empty(&self) -> bool { self.intersections.is_empty() }
}

/// Sum intersection areas by class. Classes with zero share are omitted; the rest are
/// ordered by share descending, then by class ascending.
///
/// Clipping snaps to a grid, so zones that tile the precinct can sum to slightly more
/// than its area. Class areas are then scaled down proportionally so shares total at most 1.
fn aggregate_classes(intersections: &[ZoneIntersection], precinct_area: f64) -> Vec<ClassShare> {
    let mut totals = BTreeMap::<ValueClass, (f64, usize)>::new();
    for zone in intersections {
        let entry = totals.entry(zone.class).or_default();
        entry.0 += zone.area;
        entry.1 += 1;
    }

    let covered: f64 = totals.values().map(|(area, _)| area).sum();
    let scale = if covered > precinct_area && covered > 0.0 { precinct_area / covered } else { 1.0 };

    let mut classes = totals.into_iter()
        .map(|(class, (area, zone_count))| {
            let area = area * scale;
            ClassShare {
                class,
                area,
                share: if precinct_area > 0.0 { (area / precinct_area).min(1.0) } else { 0.0 },
                zone_count,
            }
        })
        .filter(|class| class.share > 0.0)
        .collect::<Vec<_>>();

    // Stable over the BTreeMap's class order.
    classes.sort_by(|a, b| b.share.total_cmp(&a.share));
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(code: &str, value: f64, area: f64) -> ZoneArea {
        ZoneArea { code: code.into(), value, area }
    }

    #[test]
    fn intersections_sorted_by_share_and_classified() {
        let result = OverlayResult::new("Montague", 2011, 100.0, vec![
            zone("a", 100.0, 10.0),
            zone("b", 1356.0, 40.0),
            zone("c", 600.0, 50.0),
        ], &ClassBreakpoints::DEFAULT);

        let codes = result.intersections().iter().map(|z| z.code.as_str()).collect::<Vec<_>>();
        assert_eq!(codes, ["c", "b", "a"]);
        assert_eq!(result.dzn_intersect_count(), 3);
        assert_eq!(result.intersections()[1].class, ValueClass::High);

        let classes = result.classes().iter().map(|c| c.class).collect::<Vec<_>>();
        assert_eq!(classes, [ValueClass::Low, ValueClass::High, ValueClass::VeryLow]);
        assert!((result.dominant().unwrap().share - 0.5).abs() < 1e-12);
    }

    #[test]
    fn class_ties_break_by_class_order() {
        let result = OverlayResult::new("P", 2016, 10.0, vec![
            zone("hi", 5000.0, 3.0),
            zone("lo", 0.0, 3.0),
        ], &ClassBreakpoints::DEFAULT);
        assert_eq!(result.classes()[0].class, ValueClass::VeryLow);
        assert_eq!(result.classes()[1].class, ValueClass::VeryHigh);
        // Zone order keeps load order on equal shares.
        assert_eq!(result.intersections()[0].code, "hi");
    }

    #[test]
    fn zones_in_one_class_are_summed() {
        let result = OverlayResult::new("P", 2021, 10.0, vec![
            zone("a", 700.0, 2.0),
            zone("b", 800.0, 3.0),
        ], &ClassBreakpoints::DEFAULT);
        assert_eq!(result.classes().len(), 1);
        assert_eq!(result.classes()[0].zone_count, 2);
        assert!((result.classes()[0].share - 0.5).abs() < 1e-12);
    }

    #[test]
    fn non_positive_areas_and_bad_values_are_handled() {
        let result = OverlayResult::new("P", 2011, 10.0, vec![
            zone("gone", 10.0, 0.0),
            zone("neg", 10.0, -1.0),
            zone("nan", f64::NAN, 2.0),
            zone("huge", 10.0, 50.0),
        ], &ClassBreakpoints::DEFAULT);
        assert_eq!(result.dzn_intersect_count(), 2);
        assert_eq!(result.intersections()[0].area, 10.0);
        assert_eq!(result.intersections()[1].value, 0.0);
    }

    #[test]
    fn class_shares_are_scaled_when_zones_overcover() {
        let result = OverlayResult::new("P", 2011, 100.0, vec![
            zone("a", 700.0, 60.0),
            zone("b", 5000.0, 40.000_001),
            zone("c", 1356.0, 0.000_5),
        ], &ClassBreakpoints::DEFAULT);

        let total: f64 = result.classes().iter().map(|c| c.share).sum();
        assert!(total <= 1.0 + 1e-12, "class shares sum to {total}");
        let area: f64 = result.classes().iter().map(|c| c.area).sum();
        assert!(area <= 100.0 * (1.0 + 1e-12));
        // Proportions survive the scaling.
        let ratio = result.classes()[0].area / result.classes()[1].area;
        assert!((ratio - 60.0 / 40.000_001).abs() < 1e-9);
    }

    #[test]
    fn reclassify_matches_fresh_result() {
        let areas = vec![zone("a", 700.0, 2.0), zone("b", 3000.0, 5.0), zone("c", 50.0, 1.0)];
        let dynamic = ClassBreakpoints::new([100.0, 200.0, 300.0, 400.0]).unwrap();

        let mut reclassified = OverlayResult::new("P", 2011, 10.0, areas.clone(), &ClassBreakpoints::DEFAULT);
        reclassified.reclassify(&dynamic);
        let fresh = OverlayResult::new("P", 2011, 10.0, areas, &dynamic);
        assert_eq!(reclassified, fresh);
    }

    #[test]
    fn serializes_with_wire_names() {
        let result = OverlayResult::new("P", 2011, 10.0, vec![zone("a", 700.0, 2.0)], &ClassBreakpoints::DEFAULT);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["dznIntersectCount"], 1);
        assert_eq!(json["intersections"][0]["class"], "low");
        assert!(json["intersections"][0]["areaShare"].is_number());
    }
}
