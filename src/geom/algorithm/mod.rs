mod area;
mod centroid;
mod clean;
mod clip;
mod contains;
mod proj;

pub use area::{multipolygon_area, planar_area, polygon_area, ring_area};
pub use centroid::centroid;
pub use clean::clean;
pub use clip::intersect;
pub use contains::contains_point;
pub use proj::Projection;
