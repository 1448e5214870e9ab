mod overlay;
mod response;
mod result;

pub use overlay::compute_overlay;
pub use response::{OverlayRequest, OverlayResponse, ResponseIntersection};
pub use result::{ClassShare, OverlayResult, ZoneIntersection};
pub(crate) use result::ZoneArea;
