mod algorithm;
mod bbox;
mod geom;

pub(crate) use bbox::{rects_overlap, BoundingBox};
pub use algorithm::{
    centroid, clean, contains_point, intersect, multipolygon_area, planar_area, polygon_area,
    ring_area, Projection,
};
pub use geom::{PreparedShape, Shape};
