use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ahash::AHashMap;
use tracing::debug;

use crate::{classify::ClassBreakpoints, overlay::OverlayResult};

/// What a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Overlay,
    Narrative,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: CacheKind,
    pub precinct: String,
    pub year: u16,
}

impl CacheKey {
    pub fn new(kind: CacheKind, precinct: &str, year: u16) -> Self {
        Self { kind, precinct: precinct.to_owned(), year }
    }
}

#[derive(Debug, Clone)]
enum Cached {
    Overlay(Arc<OverlayResult>),
    Narrative(Arc<str>),
}

/// Per-session memo of overlay results and narratives.
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: Mutex<AHashMap<CacheKey, Cached>>,
}

impl SessionCache {
    pub fn new() -> Self { Self::default() }

    fn entries(&self) -> MutexGuard<'_, AHashMap<CacheKey, Cached>> {
        // Entries are plain values, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn overlay(&self, precinct: &str, year: u16) -> Option<Arc<OverlayResult>> {
        match self.entries().get(&CacheKey::new(CacheKind::Overlay, precinct, year))? {
            Cached::Overlay(result) => Some(result.clone()),
            Cached::Narrative(_) => None,
        }
    }

    pub fn insert_overlay(&self, precinct: &str, year: u16, result: Arc<OverlayResult>) {
        self.entries().insert(CacheKey::new(CacheKind::Overlay, precinct, year), Cached::Overlay(result));
    }

    pub fn narrative(&self, precinct: &str, year: u16) -> Option<Arc<str>> {
        match self.entries().get(&CacheKey::new(CacheKind::Narrative, precinct, year))? {
            Cached::Narrative(text) => Some(text.clone()),
            Cached::Overlay(_) => None,
        }
    }

    pub fn insert_narrative(&self, precinct: &str, year: u16, text: Arc<str>) {
        self.entries().insert(CacheKey::new(CacheKind::Narrative, precinct, year), Cached::Narrative(text));
    }

    /// Drop every entry computed for `year`.
    pub fn invalidate_year(&self, year: u16) {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| key.year != year);
        debug!(year, dropped = before - entries.len(), "invalidated cached overlays for year");
    }

    /// Reclassify cached overlays under new breakpoints and drop narratives built on the old ones.
    pub fn reclassify(&self, breakpoints: &ClassBreakpoints) {
        let mut entries = self.entries();
        entries.retain(|_, cached| match cached {
            Cached::Overlay(result) => {
                Arc::make_mut(result).reclassify(breakpoints);
                true
            }
            Cached::Narrative(_) => false,
        });
        debug!(overlays = entries.len(), "reclassified cached overlays");
    }

    pub fn clear(&self) { self.entries().clear() }

    pub fn len(&self) -> usize { self.entries().len() }

    pub fn is_empty(&self) -> bool { self.entries().is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ValueClass;
    use crate::overlay::ZoneArea;

    fn overlay(year: u16) -> Arc<OverlayResult> {
        let areas = vec![ZoneArea { code: "a".into(), value: 700.0, area: 5.0 }];
        Arc::new(OverlayResult::new("P", year, 10.0, areas, &ClassBreakpoints::DEFAULT))
    }

    #[test]
    fn kinds_do_not_collide() {
        let cache = SessionCache::new();
        cache.insert_overlay("P", 2011, overlay(2011));
        assert!(cache.narrative("P", 2011).is_none());
        cache.insert_narrative("P", 2011, Arc::from("text"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.overlay("P", 2011).unwrap().year(), 2011);
        assert_eq!(cache.narrative("P", 2011).as_deref(), Some("text"));
    }

    #[test]
    fn year_invalidation_only_touches_that_year() {
        let cache = SessionCache::new();
        cache.insert_overlay("P", 2011, overlay(2011));
        cache.insert_overlay("P", 2016, overlay(2016));
        cache.insert_narrative("P", 2011, Arc::from("old"));

        cache.invalidate_year(2011);
        assert!(cache.overlay("P", 2011).is_none());
        assert!(cache.narrative("P", 2011).is_none());
        assert!(cache.overlay("P", 2016).is_some());
    }

    #[test]
    fn breakpoint_change_reclassifies_and_drops_narratives() {
        let cache = SessionCache::new();
        let shared = overlay(2011);
        cache.insert_overlay("P", 2011, shared.clone());
        cache.insert_narrative("P", 2011, Arc::from("low"));

        cache.reclassify(&ClassBreakpoints::new([1.0, 2.0, 3.0, 4.0]).unwrap());
        assert!(cache.narrative("P", 2011).is_none());
        assert_eq!(cache.overlay("P", 2011).unwrap().classes()[0].class, ValueClass::VeryHigh);
        // Handles given out earlier keep their snapshot.
        assert_eq!(shared.classes()[0].class, ValueClass::Low);

        cache.clear();
        assert!(cache.is_empty());
    }
}
