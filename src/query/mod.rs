mod atlas;
mod cache;
mod lookup;
mod remote;

pub use atlas::Atlas;
pub use cache::{CacheKey, CacheKind, SessionCache};
pub use lookup::lookup_value_at_point;
pub use remote::OverlayService;
#[cfg(feature = "remote")]
pub use remote::HttpOverlayService;
