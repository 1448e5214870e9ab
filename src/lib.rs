#![doc = "Precinct/zone spatial overlay, value classification and narrative engine"]
mod classify;
mod common;
mod geom;
mod map;
mod narrative;
mod overlay;
mod query;

#[doc(inline)]
pub use geom::{
    centroid, clean, contains_point, intersect, multipolygon_area, planar_area, polygon_area,
    ring_area, PreparedShape, Projection, Shape,
};

#[doc(inline)]
pub use map::{Precinct, PrecinctSet, Zone, ZoneLayer};

#[doc(inline)]
pub use classify::{classify, ClassBreakpoints, LegendEntry, ValueClass};

#[doc(inline)]
pub use overlay::{
    compute_overlay, ClassShare, OverlayRequest, OverlayResponse, OverlayResult,
    ResponseIntersection, ZoneIntersection,
};

#[doc(inline)]
pub use narrative::{format_percent, generate_narrative, join_list};

#[doc(inline)]
pub use query::{lookup_value_at_point, Atlas, CacheKey, CacheKind, OverlayService, SessionCache};

#[cfg(feature = "remote")]
#[doc(inline)]
pub use query::HttpOverlayService;

#[doc(inline)]
pub use common::{
    attempt_with_fallback, AtlasConfig, BreakpointConfig, ClassifyError, ConfigError,
    FallbackError, OverlayError, RemoteConfig, YearSource, DATA_DIR_ENV,
};
