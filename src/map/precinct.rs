use std::sync::Arc;

use ahash::AHashMap;
use geo::Point;
use tracing::debug;

use crate::geom::{centroid, PreparedShape, Projection, Shape};

/// A named planning precinct.
#[derive(Debug, Clone)]
pub struct Precinct {
    name: Arc<str>,
    shape: Shape,
    prepared: PreparedShape,
}

impl Precinct {
    /// Build a precinct, projecting and cleaning its geometry once.
    pub fn new(name: impl Into<Arc<str>>, shape: Shape, projection: &Projection) -> Self {
        let prepared = PreparedShape::new(&shape, projection);
        Self { name: name.into(), shape, prepared }
    }

    #[inline] pub fn name(&self) -> &str { &self.name }

    /// Get the geographic shape.
    #[inline] pub fn shape(&self) -> &Shape { &self.shape }

    /// Get the projected, cleaned shape used for overlay.
    #[inline] pub fn prepared(&self) -> &PreparedShape { &self.prepared }

    /// Planar area in projected Web Mercator units.
    #[inline] pub fn area(&self) -> f64 { self.prepared.area() }

    /// Geographic centroid of the largest part.
    pub fn centroid(&self) -> Option<Point<f64>> { centroid(&self.shape) }

    /// Absorb another feature of the same precinct.
    fn merge(&mut self, other: Precinct) {
        self.shape = self.shape.merge(&other.shape);
        self.prepared = self.prepared.union(&other.prepared);
    }
}

/// The fixed set of precincts, in load order, addressable by name.
#[derive(Debug, Default)]
pub struct PrecinctSet {
    precincts: Vec<Precinct>,
    index: AHashMap<Arc<str>, usize>,
}

impl PrecinctSet {
    /// Collect precincts, merging those that share a name into the first occurrence.
    pub fn new(precincts: impl IntoIterator<Item = Precinct>) -> Self {
        let mut set = Self::default();
        for precinct in precincts {
            set.insert(precinct);
        }
        set
    }

    fn insert(&mut self, precinct: Precinct) {
        match self.index.get(precinct.name()) {
            Some(&i) => {
                debug!(precinct = precinct.name(), "merging repeated precinct feature");
                self.precincts[i].merge(precinct);
            }
            None => {
                self.index.insert(precinct.name.clone(), self.precincts.len());
                self.precincts.push(precinct);
            }
        }
    }

    /// Look up a precinct by exact name.
    pub fn get(&self, name: &str) -> Option<&Precinct> {
        self.index.get(name).map(|&i| &self.precincts[i])
    }

    /// Precinct names in load order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.precincts.iter().map(Precinct::name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Precinct> { self.precincts.iter() }

    #[inline] pub fn len(&self) -> usize { self.precincts.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.precincts.is_empty() }
}

impl<'a> IntoIterator for &'a PrecinctSet {
    type Item = &'a Precinct;
    type IntoIter = std::slice::Iter<'a, Precinct>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}
