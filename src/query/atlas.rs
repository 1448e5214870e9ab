use std::{collections::BTreeMap, path::Path, sync::Arc};

use anyhow::{Context, Result};
use geo::Coord;
use tracing::{debug, info, warn};

use crate::{
    classify::{ClassBreakpoints, LegendEntry},
    common::{AtlasConfig, BreakpointConfig, OverlayError, DEFAULT_INDICATOR, DEFAULT_SCALE_LABEL},
    map::{PrecinctSet, ZoneLayer},
    narrative::generate_narrative,
    overlay::{compute_overlay, OverlayResult},
    query::{lookup_value_at_point, OverlayService, SessionCache},
};

/// Session facade over the loaded precincts and zone layers.
///
/// Overlays are resolved from the session cache, then the remote service when one is
/// configured, then the local engine. Nothing here panics or returns an error for an
/// unknown precinct or year; those resolve to an empty overlay and the no-data narrative.
pub struct Atlas {
    precincts: PrecinctSet,
    layers: BTreeMap<u16, ZoneLayer>,
    breakpoints: ClassBreakpoints,
    scale_label: String,
    indicator: String,
    service: Option<Box<dyn OverlayService>>,
    selected_year: Option<u16>,
    cache: SessionCache,
}

impl std::fmt::Debug for Atlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Atlas")
            .field("precincts", &self.precincts.len())
            .field("years", &self.layers.keys().collect::<Vec<_>>())
            .field("breakpoints", &self.breakpoints)
            .field("remote", &self.service.is_some())
            .field("selected_year", &self.selected_year)
            .finish()
    }
}

impl Atlas {
    /// Build an atlas with the default breakpoints and labels and no remote service.
    /// A later layer for an already present year replaces the earlier one.
    pub fn new(precincts: PrecinctSet, layers: impl IntoIterator<Item = ZoneLayer>) -> Self {
        Self {
            precincts,
            layers: layers.into_iter().map(|layer| (layer.year(), layer)).collect(),
            breakpoints: ClassBreakpoints::DEFAULT,
            scale_label: DEFAULT_SCALE_LABEL.to_owned(),
            indicator: DEFAULT_INDICATOR.to_owned(),
            service: None,
            selected_year: None,
            cache: SessionCache::new(),
        }
    }

    /// Set the spatial scale label and indicator name used in narratives.
    pub fn with_labels(mut self, scale_label: impl Into<String>, indicator: impl Into<String>) -> Self {
        self.scale_label = scale_label.into();
        self.indicator = indicator.into();
        self
    }

    pub fn with_breakpoints(mut self, breakpoints: ClassBreakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Use a remote overlay service before the local engine.
    pub fn with_service(mut self, service: impl OverlayService + 'static) -> Self {
        self.service = Some(Box::new(service));
        self
    }

    /// Load precincts and every configured year from the data directory.
    pub fn load(config: &AtlasConfig, data_dir: Option<&Path>) -> Result<Self> {
        config.validate().context("Invalid atlas config")?;
        let dir = config.resolve_data_dir(data_dir);
        info!(data_dir = %dir.display(), years = config.years.len(), "loading atlas");

        let precincts = PrecinctSet::read_from_geojson(&dir.join(&config.precincts))?;
        let layers = config.years.iter()
            .map(|source| ZoneLayer::read_from_geojson(&dir.join(&source.file), source.year, &source.code_field, &source.value_field))
            .collect::<Result<Vec<_>>>()?;

        let breakpoints = match &config.breakpoints {
            BreakpointConfig::Fixed { values } => ClassBreakpoints::from_slice(values)?,
            BreakpointConfig::Dynamic => ClassBreakpoints::dynamic(&layers),
        };
        debug!(breakpoints = ?breakpoints.values(), "class breakpoints");

        let atlas = Self::new(precincts, layers)
            .with_labels(&config.scale_label, &config.indicator)
            .with_breakpoints(breakpoints);

        #[cfg(feature = "remote")]
        if !config.remote.endpoints.is_empty() {
            let service = super::HttpOverlayService::new(config.remote.endpoints.clone(), config.remote.timeout())?;
            return Ok(atlas.with_service(service));
        }
        #[cfg(not(feature = "remote"))]
        if !config.remote.endpoints.is_empty() {
            warn!("built without the `remote` feature, ignoring configured endpoints");
        }

        Ok(atlas)
    }

    #[inline] pub fn precincts(&self) -> &PrecinctSet { &self.precincts }

    /// Loaded census years, ascending.
    pub fn years(&self) -> impl Iterator<Item = u16> + '_ { self.layers.keys().copied() }

    pub fn layer(&self, year: u16) -> Option<&ZoneLayer> { self.layers.get(&year) }

    #[inline] pub fn breakpoints(&self) -> &ClassBreakpoints { &self.breakpoints }

    #[inline] pub fn scale_label(&self) -> &str { &self.scale_label }

    #[inline] pub fn indicator(&self) -> &str { &self.indicator }

    #[inline] pub fn selected_year(&self) -> Option<u16> { self.selected_year }

    #[inline] pub fn cache(&self) -> &SessionCache { &self.cache }

    /// Switch the active year. Cached entries of the previously active year are dropped.
    /// Returns false, leaving the selection unchanged, for a year with no layer.
    pub fn select_year(&mut self, year: u16) -> bool {
        if !self.layers.contains_key(&year) {
            warn!(year, "no zone layer for year");
            return false;
        }
        if let Some(previous) = self.selected_year.filter(|&previous| previous != year) {
            self.cache.invalidate_year(previous);
        }
        self.selected_year = Some(year);
        true
    }

    /// Replace the breakpoints; cached overlays are reclassified without recomputing geometry.
    pub fn set_breakpoints(&mut self, breakpoints: ClassBreakpoints) {
        if breakpoints == self.breakpoints { return }
        self.breakpoints = breakpoints;
        self.cache.reclassify(&breakpoints);
    }

    /// Legend rows for the active breakpoints.
    pub fn legend(&self) -> Vec<LegendEntry> { self.breakpoints.legend() }

    /// Value of the zone containing `point` for every loaded year (0 where none does).
    pub fn time_series(&self, point: Coord<f64>) -> BTreeMap<u16, f64> {
        lookup_value_at_point(point, self.layers.values())
    }

    /// Overlay of a precinct with one year's zones. Unknown names and years, and
    /// precincts with no area, give an empty result.
    ///
    /// On a cache miss with a remote service configured, this blocks on the network for
    /// up to one timeout per endpoint before the local fallback runs. Call it off any UI
    /// or async executor thread.
    pub fn resolve_overlay(&self, precinct: &str, year: u16) -> Arc<OverlayResult> {
        if let Some(cached) = self.cache.overlay(precinct, year) {
            return cached;
        }

        let result = Arc::new(self.resolve_uncached(precinct, year));
        self.cache.insert_overlay(precinct, year, result.clone());
        result
    }

    fn resolve_uncached(&self, precinct: &str, year: u16) -> OverlayResult {
        if self.precincts.get(precinct).is_none() || !self.layers.contains_key(&year) {
            warn!(precinct, year, "unknown precinct or year");
            return OverlayResult::empty(precinct, year);
        }

        if let Some(service) = &self.service {
            let remote = service.precinct_overlay(precinct, year)
                .and_then(|response| Ok(response.into_result(precinct, year, &self.breakpoints)?));
            match remote {
                Ok(result) => {
                    debug!(precinct, year, intersections = result.dzn_intersect_count(), "overlay from remote service");
                    return result;
                }
                Err(e) => warn!(precinct, year, error = %format!("{e:#}"), "remote overlay failed, computing locally"),
            }
        }

        match self.compute_local(precinct, year) {
            Ok(result) => result,
            Err(e) => {
                warn!(precinct, year, error = %e, "overlay unavailable");
                OverlayResult::empty(precinct, year)
            }
        }
    }

    /// Compute an overlay with the local engine only, bypassing the cache and the remote service.
    pub fn compute_local(&self, precinct: &str, year: u16) -> Result<OverlayResult, OverlayError> {
        match (self.precincts.get(precinct), self.layers.get(&year)) {
            (Some(p), Some(layer)) => compute_overlay(p, layer, &self.breakpoints),
            _ => Ok(OverlayResult::empty(precinct, year)),
        }
    }

    /// Narrative for a precinct and year, built from the resolved overlay.
    /// Blocks like [`Atlas::resolve_overlay`] on a cache miss.
    pub fn narrative(&self, precinct: &str, year: u16) -> Arc<str> {
        if let Some(cached) = self.cache.narrative(precinct, year) {
            return cached;
        }

        let overlay = self.resolve_overlay(precinct, year);
        let text: Arc<str> = generate_narrative(&overlay, precinct, year, &self.scale_label, &self.indicator).into();
        self.cache.insert_narrative(precinct, year, text.clone());
        text
    }
}
